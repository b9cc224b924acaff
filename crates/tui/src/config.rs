use anyhow::{Context, Result};
use otlog_runtime_config::{ViewerConfig, CONFIG_FILE_NAME};
use std::path::{Path, PathBuf};

const LOG_FILE_NAME: &str = "otlog-tui.log";

// ── File I/O ────────────────────────────────────────────────────────────

pub fn config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Could not determine home directory")?;
    Ok(PathBuf::from(home).join(".config").join("otlog"))
}

/// Log file written by the binary; the terminal belongs to the UI.
pub fn log_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(LOG_FILE_NAME))
}

/// Load viewer config.
///
/// An explicit `path` must exist and parse. Without one, the default file is
/// optional and a broken default file falls back to defaults with a warning.
pub fn load_config(path: Option<&Path>) -> Result<ViewerConfig> {
    let default_path = config_dir().ok().map(|dir| dir.join(CONFIG_FILE_NAME));
    load_config_from(path, default_path.as_deref())
}

fn load_config_from(path: Option<&Path>, default_path: Option<&Path>) -> Result<ViewerConfig> {
    if let Some(path) = path {
        return read_config(path);
    }

    let Some(default_path) = default_path.filter(|p| p.exists()) else {
        return Ok(ViewerConfig::default());
    };
    match read_config(default_path) {
        Ok(config) => Ok(config),
        Err(err) => {
            tracing::warn!("ignoring config {}: {err:#}", default_path.display());
            Ok(ViewerConfig::default())
        }
    }
}

fn read_config(path: &Path) -> Result<ViewerConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_config_is_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("otlog.toml");
        std::fs::write(
            &path,
            "[viewer]\nmouse_capture = false\n\n[palette]\nauthor_colors = [\"#102030\"]\n",
        )
        .expect("write");

        let config = load_config(Some(&path)).expect("load");
        assert!(!config.viewer.mouse_capture);
        assert_eq!(config.viewer.poll_interval_ms, 100);
        assert_eq!(config.palette.parsed_colors(), vec![(0x10, 0x20, 0x30)]);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_config(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read"));
    }

    #[test]
    fn malformed_explicit_config_names_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[viewer\n").expect("write");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("bad.toml"));
    }

    #[test]
    fn default_config_is_read_when_present() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("otlog.toml");
        std::fs::write(&path, "[viewer]\ntooltip_max_width = 30\n").expect("write");

        let config = load_config_from(None, Some(&path)).expect("load");
        assert_eq!(config.viewer.tooltip_max_width, 30);
    }

    #[test]
    fn missing_default_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("otlog.toml");
        let config = load_config_from(None, Some(&path)).expect("load");
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(
            load_config_from(None, None).expect("load"),
            ViewerConfig::default()
        );
    }

    #[test]
    fn broken_default_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("otlog.toml");
        std::fs::write(&path, "[viewer\nmouse_capture = \"yes\"\n").expect("write");

        let config = load_config_from(None, Some(&path)).expect("fallback");
        assert_eq!(config, ViewerConfig::default());
        // The same file named explicitly is an error.
        assert!(load_config_from(Some(&path), None).is_err());
    }
}
