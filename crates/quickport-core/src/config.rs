//! Toolbox configuration.
//!
//! Configuration is a small TOML document. Every field has a default, so an
//! empty document (or no file at all) is a valid configuration:
//!
//! ```toml
//! debug_key = 63247          # F12
//! log_filter = "quickport=debug"
//! display_fallback = [1024, 768]
//!
//! [default_font]
//! family = "Geneva"
//! size = 12
//!
//! [[fonts]]
//! id = 1601
//! family = "Black Chancery"
//! path = "fonts/BlackChancery.ttf"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::event::KeyCode;

/// Font used when the port names no known font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSettings {
    /// Family name; empty selects the system sans-serif family.
    pub family: String,
    pub size: u16,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            family: String::new(),
            size: 12,
        }
    }
}

/// Maps a legacy font id to a font family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontMapping {
    pub id: i16,
    pub family: String,
    /// Font file to load for this family, if it is not installed.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolboxConfig {
    /// Key that dumps the dialog items under the pointer to the log.
    /// `None` disables the dump.
    pub debug_key: Option<KeyCode>,
    /// `tracing` filter directive; `RUST_LOG` overrides it.
    pub log_filter: String,
    pub default_font: FontSettings,
    pub fonts: Vec<FontMapping>,
    /// Display size reported when the platform cannot provide one.
    pub display_fallback: Option<(u32, u32)>,
}

impl Default for ToolboxConfig {
    fn default() -> Self {
        Self {
            debug_key: Some(KeyCode::F12),
            log_filter: "quickport=info".to_string(),
            default_font: FontSettings::default(),
            fonts: Vec::new(),
            display_fallback: None,
        }
    }
}

impl ToolboxConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }

    /// Load from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Whether `key` is the configured diagnostic key.
    pub fn is_debug_key(&self, key: KeyCode) -> bool {
        self.debug_key.is_some_and(|k| k == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = ToolboxConfig::from_toml_str("").unwrap();
        assert_eq!(config, ToolboxConfig::default());
        assert!(config.is_debug_key(KeyCode::F12));
        assert_eq!(config.default_font.size, 12);
    }

    #[test]
    fn test_full_document() {
        let config = ToolboxConfig::from_toml_str(
            r#"
            debug_key = 63236
            log_filter = "quickport=trace"
            display_fallback = [800, 600]

            [default_font]
            family = "Geneva"

            [[fonts]]
            id = 1601
            family = "Black Chancery"
            path = "fonts/chancery.ttf"
            "#,
        )
        .unwrap();
        assert_eq!(config.debug_key, Some(KeyCode::F1));
        assert_eq!(config.log_filter, "quickport=trace");
        assert_eq!(config.display_fallback, Some((800, 600)));
        assert_eq!(config.default_font.family, "Geneva");
        assert_eq!(config.default_font.size, 12);
        assert_eq!(config.fonts[0].id, 1601);
        assert_eq!(config.fonts[0].path.as_deref(), Some(Path::new("fonts/chancery.ttf")));
    }

    #[test]
    fn test_invalid_document() {
        assert!(matches!(
            ToolboxConfig::from_toml_str("debug_key = \"F12\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = ToolboxConfig::load("/nonexistent/quickport.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
