//! Configuration management for blackout.
//!
//! Configuration is loaded in layers, later layers overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. TOML file (`~/.config/blackout/config.toml` or `--config` path)
//! 3. Environment variables prefixed with `BLACKOUT_`
//!
//! Example environment override: `BLACKOUT_REDACTION__PLACEHOLDER="[HIDDEN]"`.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Input limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Redaction output settings.
    #[serde(default)]
    pub redaction: RedactionConfig,
    /// Default branding for header/footer decoration.
    #[serde(default)]
    pub branding: BrandingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limits: LimitsConfig::default(),
            redaction: RedactionConfig::default(),
            branding: BrandingConfig::default(),
        }
    }
}

/// Input size limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LimitsConfig {
    /// Maximum accepted input size in bytes.
    pub max_input_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Settings controlling how redacted content is rendered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RedactionConfig {
    /// Replacement text used in flow-based documents.
    pub placeholder: String,
    /// Fill color for page-based redaction boxes, RGB in 0.0..=1.0.
    pub fill_color: [f32; 3],
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            placeholder: "[REDACTED]".to_string(),
            fill_color: [0.0, 0.0, 0.0],
        }
    }
}

/// Default branding applied when a caller asks for the built-in decoration
/// preset without overriding the individual fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BrandingConfig {
    /// Footer line stamped on every page.
    pub footer_text: String,
    /// Footer font size in points.
    pub footer_font_size: u32,
    /// Footer alignment: `left`, `center`, or `right`.
    pub footer_align: String,
    /// Header font size in points.
    pub header_font_size: u32,
    /// Logo placement: `left`, `center`, or `right`.
    pub logo_position: String,
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            footer_text: crate::decorate::DEFAULT_FOOTER_TEXT.to_string(),
            footer_font_size: crate::decorate::DEFAULT_FOOTER_FONT_SIZE,
            footer_align: "center".to_string(),
            header_font_size: crate::decorate::DEFAULT_HEADER_FONT_SIZE,
            logo_position: "left".to_string(),
        }
    }
}

const ALLOWED_POSITIONS: &[&str] = &["left", "center", "right"];

impl Config {
    /// Load configuration from the default locations.
    pub fn load() -> Result<Self> {
        Self::load_from(None::<&Path>)
    }

    /// Load configuration, optionally from an explicit TOML file.
    pub fn load_from(path: Option<impl AsRef<Path>>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        match path {
            Some(p) => {
                figment = figment.merge(Toml::file(p.as_ref()));
            }
            None => {
                if let Some(default_path) = Self::default_config_path() {
                    figment = figment.merge(Toml::file(default_path));
                }
            }
        }

        let config: Config = figment
            .merge(Env::prefixed("BLACKOUT_").split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// The default configuration file path (`~/.config/blackout/config.toml`).
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("blackout").join("config.toml"))
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.limits.max_input_bytes == 0 {
            return Err(Error::ConfigValidation {
                message: "limits.max_input_bytes must be greater than zero".to_string(),
            });
        }

        if self.redaction.placeholder.is_empty() {
            return Err(Error::ConfigValidation {
                message: "redaction.placeholder must not be empty".to_string(),
            });
        }

        for component in self.redaction.fill_color {
            if !(0.0..=1.0).contains(&component) {
                return Err(Error::ConfigValidation {
                    message: format!(
                        "redaction.fill_color components must be within 0.0..=1.0, got {component}"
                    ),
                });
            }
        }

        if !ALLOWED_POSITIONS.contains(&self.branding.footer_align.as_str()) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "branding.footer_align must be one of left, center, right; got '{}'",
                    self.branding.footer_align
                ),
            });
        }

        if !ALLOWED_POSITIONS.contains(&self.branding.logo_position.as_str()) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "branding.logo_position must be one of left, center, right; got '{}'",
                    self.branding.logo_position
                ),
            });
        }

        if self.branding.footer_font_size == 0 || self.branding.header_font_size == 0 {
            return Err(Error::ConfigValidation {
                message: "branding font sizes must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.limits.max_input_bytes, 16 * 1024 * 1024);
        assert_eq!(config.redaction.placeholder, "[REDACTED]");
        assert_eq!(config.redaction.fill_color, [0.0, 0.0, 0.0]);
        assert_eq!(config.branding.footer_align, "center");
        assert_eq!(config.branding.logo_position, "left");
    }

    #[test]
    fn test_default_config_validates() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_limit() {
        let mut config = Config::default();
        config.limits.max_input_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_placeholder() {
        let mut config = Config::default();
        config.redaction.placeholder = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_color() {
        let mut config = Config::default();
        config.redaction.fill_color = [0.0, 1.5, 0.0];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_alignment() {
        let mut config = Config::default();
        config.branding.footer_align = "justified".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("footer_align"));
    }

    #[test]
    fn test_validate_rejects_bad_logo_position() {
        let mut config = Config::default();
        config.branding.logo_position = "top".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = std::env::temp_dir().join("blackout-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[redaction]\nplaceholder = \"[GONE]\"\n\n[limits]\nmax_input_bytes = 1024\n"
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.redaction.placeholder, "[GONE]");
        assert_eq!(config.limits.max_input_bytes, 1024);
        // Untouched sections keep their defaults.
        assert_eq!(config.branding.footer_align, "center");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let config = Config::load_from(Some("/nonexistent/blackout.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_roundtrip_serialization() {
        let config = Config::default();
        let toml = toml_like_json(&config);
        let parsed: Config = serde_json::from_str(&toml).unwrap();
        assert_eq!(parsed, config);
    }

    fn toml_like_json(config: &Config) -> String {
        serde_json::to_string(config).unwrap()
    }
}
