use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Padding};

pub struct Theme;

impl Theme {
    // ── Background ───────────────────────────────────────────────────
    pub const BG_SURFACE: Color = Color::Rgb(30, 35, 50);
    pub const BG_STATE: Color = Color::Rgb(40, 44, 58);

    // ── Border ───────────────────────────────────────────────────────
    pub const BORDER_NORMAL: Color = Color::Rgb(60, 65, 80);
    pub const BORDER_ACCENT: Color = Color::Rgb(100, 180, 240);

    // ── Text hierarchy ───────────────────────────────────────────────
    pub const TEXT_PRIMARY: Color = Color::White;
    pub const TEXT_SECONDARY: Color = Color::Rgb(140, 145, 160);
    pub const TEXT_MUTED: Color = Color::Rgb(80, 85, 100);
    pub const TEXT_CONTENT: Color = Color::Rgb(170, 175, 190);

    // ── Key style (for footer hints) ─────────────────────────────────
    pub const TEXT_KEY: Color = Color::Rgb(140, 145, 160);
    pub const TEXT_KEY_DESC: Color = Color::DarkGray;

    // ── Accent ───────────────────────────────────────────────────────
    pub const ACCENT_ORANGE: Color = Color::Rgb(217, 119, 80);
    pub const ACCENT_YELLOW: Color = Color::Rgb(220, 180, 60);
    pub const ACCENT_RED: Color = Color::Rgb(220, 80, 80);
    pub const ACCENT_GREEN: Color = Color::Rgb(80, 200, 120);

    // ── Trace colors ─────────────────────────────────────────────────
    pub const GUTTER: Color = Color::Rgb(55, 60, 75);
    pub const DIAGRAM_EDGE: Color = Color::Rgb(90, 95, 110);
    pub const DIAGRAM_CORNER: Color = Color::Rgb(120, 125, 140);

    // ── Padding ──────────────────────────────────────────────────────
    pub const PADDING_COMPACT: Padding = Padding::new(1, 1, 0, 0);

    // ── Block helpers ────────────────────────────────────────────────

    pub fn block() -> Block<'static> {
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(Self::BORDER_NORMAL))
    }

    pub fn block_accent() -> Block<'static> {
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(Self::BORDER_ACCENT))
    }
}

// ── Author color palette ──────────────────────────────────────────────

const AUTHOR_PALETTE: [Color; 8] = [
    Color::Rgb(100, 180, 240), // blue
    Color::Rgb(80, 200, 120),  // green
    Color::Rgb(220, 180, 60),  // yellow
    Color::Rgb(180, 140, 220), // purple
    Color::Rgb(220, 130, 80),  // orange
    Color::Rgb(80, 200, 200),  // teal
    Color::Rgb(220, 100, 160), // pink
    Color::Rgb(160, 200, 80),  // lime
];

/// Colors assigned to operation authors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorPalette {
    colors: Vec<Color>,
}

impl Default for AuthorPalette {
    fn default() -> Self {
        Self {
            colors: AUTHOR_PALETTE.to_vec(),
        }
    }
}

impl AuthorPalette {
    /// Palette from `(r, g, b)` triples; empty input keeps the built-in one.
    pub fn from_rgb(colors: &[(u8, u8, u8)]) -> Self {
        if colors.is_empty() {
            return Self::default();
        }
        Self {
            colors: colors
                .iter()
                .map(|&(r, g, b)| Color::Rgb(r, g, b))
                .collect(),
        }
    }

    /// Stable color for an author, independent of hover state.
    pub fn color(&self, author: &str) -> Color {
        let hash = author
            .bytes()
            .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
        self.colors[(hash as usize) % self.colors.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_color_is_stable_for_same_author() {
        let palette = AuthorPalette::default();
        assert_eq!(palette.color("alice"), palette.color("alice"));
    }

    #[test]
    fn author_color_uses_multiple_palette_slots() {
        let palette = AuthorPalette::default();
        let a = palette.color("alice");
        let b = palette.color("bob");
        let c = palette.color("carol");
        assert!(a != b || b != c || a != c);
    }

    #[test]
    fn configured_palette_replaces_builtin() {
        let palette = AuthorPalette::from_rgb(&[(1, 2, 3)]);
        assert_eq!(palette.color("anyone"), Color::Rgb(1, 2, 3));
        assert_eq!(AuthorPalette::from_rgb(&[]), AuthorPalette::default());
    }
}
