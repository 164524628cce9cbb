//! Command-line interface for blackout.
//!
//! This module provides the CLI structure and command handlers for the
//! `blkout` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{BatchCommand, ConfigCommand, DecorationArgs, RedactCommand};

/// blkout - Detect and redact contact information in documents
///
/// Scans PDF and DOCX documents for email addresses, phone numbers, LinkedIn
/// profiles, portfolio links and URLs, and produces redacted copies with the
/// sensitive content removed.
#[derive(Debug, Parser)]
#[command(name = "blkout")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Redact contact information in a document
    Redact(RedactCommand),

    /// Report what would be redacted, without modifying anything
    Preview(RedactCommand),

    /// Redact a set of documents and report per-file counts
    Batch(BatchCommand),

    /// List supported detection categories and output shapes
    Types,

    /// View or modify configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "blkout");
    }

    #[test]
    fn test_cli_verify() {
        // Verify the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_quiet() {
        let cli = Cli {
            config: None,
            verbose: 0,
            quiet: true,
            command: Command::Types,
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Quiet);
    }

    #[test]
    fn test_verbosity_normal() {
        let cli = Cli {
            config: None,
            verbose: 0,
            quiet: false,
            command: Command::Types,
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Normal);
    }

    #[test]
    fn test_verbosity_verbose_and_trace() {
        let cli = Cli {
            config: None,
            verbose: 1,
            quiet: false,
            command: Command::Types,
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Verbose);

        let cli = Cli {
            config: None,
            verbose: 3,
            quiet: false,
            command: Command::Types,
        };
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Trace);
    }

    #[test]
    fn test_parse_redact() {
        let args = vec!["blkout", "redact", "resume.pdf"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.command, Command::Redact(_)));
    }

    #[test]
    fn test_parse_redact_with_categories() {
        let args = vec!["blkout", "redact", "resume.pdf", "-t", "email,phone"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Redact(cmd) = cli.command else {
            panic!("expected redact command");
        };
        assert_eq!(cmd.categories, vec!["email", "phone"]);
    }

    #[test]
    fn test_parse_preview() {
        let args = vec!["blkout", "preview", "resume.pdf"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.command, Command::Preview(_)));
    }

    #[test]
    fn test_parse_batch() {
        let args = vec!["blkout", "batch", "a.pdf", "b.docx"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Batch(cmd) = cli.command else {
            panic!("expected batch command");
        };
        assert_eq!(cmd.inputs.len(), 2);
    }

    #[test]
    fn test_parse_types() {
        let args = vec!["blkout", "types"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.command, Command::Types));
    }

    #[test]
    fn test_parse_with_config() {
        let args = vec!["blkout", "-c", "/custom/config.toml", "types"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_quiet() {
        let args = vec!["blkout", "-q", "types"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.quiet);
    }
}
