//! Viewer configuration types.
//!
//! `otlog-tui` reads `otlog.toml` into these types. Every field has a serde
//! default, so partial or empty files are valid.

use serde::{Deserialize, Serialize};

/// Canonical config file name.
pub const CONFIG_FILE_NAME: &str = "otlog.toml";

/// Top-level configuration (persisted as `otlog.toml`).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ViewerConfig {
    #[serde(default)]
    pub viewer: ViewerSettings,
    #[serde(default)]
    pub palette: PaletteSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewerSettings {
    /// Track mouse motion so hovering a marker opens its tooltip.
    #[serde(default = "default_true")]
    pub mouse_capture: bool,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_tooltip_max_width")]
    pub tooltip_max_width: u16,
    /// Show diagram invariant violations in the header.
    #[serde(default = "default_true")]
    pub show_validation: bool,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            mouse_capture: true,
            poll_interval_ms: default_poll_interval_ms(),
            tooltip_max_width: default_tooltip_max_width(),
            show_validation: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PaletteSettings {
    /// `#rrggbb` colors assigned to authors. Empty selects the built-in palette.
    #[serde(default)]
    pub author_colors: Vec<String>,
}

impl PaletteSettings {
    /// Parsed palette entries; malformed entries are skipped.
    pub fn parsed_colors(&self) -> Vec<(u8, u8, u8)> {
        self.author_colors
            .iter()
            .filter_map(|raw| parse_hex_color(raw))
            .collect()
    }
}

/// Parse `#rrggbb` (leading `#` optional).
pub fn parse_hex_color(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

fn default_true() -> bool {
    true
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_tooltip_max_width() -> u16 {
    48
}
