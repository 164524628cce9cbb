//! Header and footer decoration specifications.
//!
//! A decoration spec describes what to stamp on every page (or into the
//! header/footer parts of a flow-based document): optional header text, an
//! optional logo, and a footer line. The built-in preset fills the spec from
//! the configured branding.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::BrandingConfig;
use crate::error::{Error, Result};

/// Default footer line for the built-in branding preset.
pub const DEFAULT_FOOTER_TEXT: &str = "blackout.dev | contact@blackout.dev | +1 555-010-2030";

/// Default footer font size in points.
pub const DEFAULT_FOOTER_FONT_SIZE: u32 = 9;

/// Default header font size in points.
pub const DEFAULT_HEADER_FONT_SIZE: u32 = 10;

/// Logo box dimensions in points.
pub const LOGO_WIDTH: f32 = 80.0;
/// Logo box height in points.
pub const LOGO_HEIGHT: f32 = 30.0;

/// Horizontal placement of the logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoPosition {
    /// Left page margin.
    #[default]
    Left,
    /// Horizontally centered.
    Center,
    /// Right page margin.
    Right,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left page margin.
    Left,
    /// Horizontally centered.
    #[default]
    Center,
    /// Right page margin.
    Right,
}

impl FromStr for LogoPosition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(Error::ConfigValidation {
                message: format!("unknown logo position '{other}' (left, center, right)"),
            }),
        }
    }
}

impl FromStr for Alignment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(Error::ConfigValidation {
                message: format!("unknown alignment '{other}' (left, center, right)"),
            }),
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        };
        f.write_str(name)
    }
}

/// A logo image with its placement.
#[derive(Debug, Clone)]
pub struct Logo {
    /// Raw PNG or JPEG bytes.
    pub bytes: Vec<u8>,
    /// Horizontal placement.
    pub position: LogoPosition,
}

/// Header decoration: optional text line plus an optional logo.
#[derive(Debug, Clone, Default)]
pub struct HeaderSpec {
    /// Header text, if any.
    pub text: Option<String>,
    /// Font size in points.
    pub font_size: u32,
    /// Logo, if any.
    pub logo: Option<Logo>,
}

/// Footer decoration: a single text line.
#[derive(Debug, Clone)]
pub struct FooterSpec {
    /// Footer text.
    pub text: String,
    /// Font size in points.
    pub font_size: u32,
    /// Horizontal alignment.
    pub align: Alignment,
}

/// What to stamp on the document.
#[derive(Debug, Clone, Default)]
pub struct DecorationSpec {
    /// Header decoration, if requested.
    pub header: Option<HeaderSpec>,
    /// Footer decoration, if requested.
    pub footer: Option<FooterSpec>,
}

impl DecorationSpec {
    /// True when there is nothing to stamp.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let header_empty = match &self.header {
            None => true,
            Some(header) => header.text.is_none() && header.logo.is_none(),
        };
        header_empty && self.footer.is_none()
    }

    /// Build the default branding preset from configuration.
    ///
    /// The footer uses the configured branding line; the header carries the
    /// logo only, when one is supplied.
    #[must_use]
    pub fn default_preset(branding: &BrandingConfig, logo_bytes: Option<Vec<u8>>) -> Self {
        let logo = logo_bytes.map(|bytes| Logo {
            bytes,
            position: branding
                .logo_position
                .parse()
                .unwrap_or(LogoPosition::Left),
        });

        Self {
            header: logo.map(|logo| HeaderSpec {
                text: None,
                font_size: branding.header_font_size,
                logo: Some(logo),
            }),
            footer: Some(FooterSpec {
                text: branding.footer_text.clone(),
                font_size: branding.footer_font_size,
                align: branding.footer_align.parse().unwrap_or(Alignment::Center),
            }),
        }
    }
}

/// Check that logo bytes decode as a raster image.
pub fn validate_logo(bytes: &[u8]) -> Result<()> {
    image::load_from_memory(bytes)
        .map(|_| ())
        .map_err(|e| Error::decoration(format!("logo is not a decodable image: {e}")))
}
