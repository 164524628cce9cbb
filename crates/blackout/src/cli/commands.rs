//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Redact (or preview) command arguments.
#[derive(Debug, Args)]
pub struct RedactCommand {
    /// Input document (.pdf or .docx)
    pub input: PathBuf,

    /// Categories to detect, comma-separated
    /// (email, phone, linkedin, portfolio, all_urls)
    #[arg(
        short = 't',
        long = "types",
        value_delimiter = ',',
        default_value = "email,phone"
    )]
    pub categories: Vec<String>,

    /// Output file path (defaults to `<input>_redacted.<ext>`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output shape: pdf or docx (defaults to the input shape)
    #[arg(short, long)]
    pub shape: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Decoration flags
    #[command(flatten)]
    pub decoration: DecorationArgs,
}

/// Header/footer decoration flags, shared by redact and batch.
#[derive(Debug, Args, Default)]
pub struct DecorationArgs {
    /// Header text to stamp on every page
    #[arg(long)]
    pub header_text: Option<String>,

    /// Header font size in points
    #[arg(long, default_value = "10")]
    pub header_font_size: u32,

    /// Logo image file (PNG or JPEG) to stamp in the header
    #[arg(long)]
    pub logo: Option<PathBuf>,

    /// Logo placement: left, center, or right
    #[arg(long, default_value = "left")]
    pub logo_position: String,

    /// Footer text to stamp on every page
    #[arg(long)]
    pub footer_text: Option<String>,

    /// Footer font size in points
    #[arg(long, default_value = "9")]
    pub footer_font_size: u32,

    /// Footer alignment: left, center, or right
    #[arg(long, default_value = "center")]
    pub footer_align: String,

    /// Use the configured branding preset for header and footer
    #[arg(long)]
    pub default_branding: bool,
}

impl DecorationArgs {
    /// True when no decoration was requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.default_branding
            && self.header_text.is_none()
            && self.logo.is_none()
            && self.footer_text.is_none()
    }
}

/// Batch command arguments.
#[derive(Debug, Args)]
pub struct BatchCommand {
    /// Input documents
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Categories to detect, comma-separated
    #[arg(
        short = 't',
        long = "types",
        value_delimiter = ',',
        default_value = "email,phone"
    )]
    pub categories: Vec<String>,

    /// Decoration flags
    #[command(flatten)]
    pub decoration: DecorationArgs,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
