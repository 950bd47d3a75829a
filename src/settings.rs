use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ViradaError};
use crate::exporter::ExportFormat;

/// Preferences for where and how `analyze` writes its spreadsheets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    #[serde(default)]
    pub default_format: ExportFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            export_dir: default_export_dir(),
            default_format: ExportFormat::default(),
        }
    }
}

fn home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn default_export_dir() -> PathBuf {
    home().join("Documents").join("virada")
}

impl Settings {
    /// `~/.config/virada/settings.json`, or `$VIRADA_CONFIG_DIR/settings.json`.
    pub fn path() -> PathBuf {
        std::env::var_os("VIRADA_CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| home().join(".config").join("virada"))
            .join("settings.json")
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    /// A missing file yields defaults; an unreadable or malformed one is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| ViradaError::Settings(format!("{}: {e}", path.display())))
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path();
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ViradaError::Settings(e.to_string()))?;
        std::fs::write(path, format!("{json}\n"))?;
        Ok(())
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix('~') {
        Some(rest) => home().join(rest.trim_start_matches(['/', '\\'])),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings::load_from(&dir.path().join("settings.json")).unwrap();
        assert_eq!(s, Settings::default());
        assert!(s.export_dir.ends_with("virada"));
    }

    #[test]
    fn test_save_then_load_in_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("settings.json");
        let settings = Settings {
            export_dir: PathBuf::from("/tmp/exports"),
            default_format: ExportFormat::Csv,
        };
        settings.save_to(&path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains(r#""default_format": "csv""#));
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"export_dir": "/srv/out"}"#).unwrap();
        let s = Settings::load_from(&path).unwrap();
        assert_eq!(s.export_dir, PathBuf::from("/srv/out"));
        assert_eq!(s.default_format, ExportFormat::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"default_format": "pdf"}"#).unwrap();
        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, ViradaError::Settings(msg) if msg.contains("settings.json")));
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde("~/out"), home().join("out"));
        assert_eq!(expand_tilde("/abs/out"), PathBuf::from("/abs/out"));
        assert_eq!(expand_tilde("rel"), PathBuf::from("rel"));
    }
}
