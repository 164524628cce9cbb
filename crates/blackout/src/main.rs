//! `blkout` - CLI for blackout
//!
//! This binary provides the command-line interface for detecting and
//! redacting contact information in PDF and DOCX documents.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::Parser;
use tracing::warn;

use blackout::cli::{BatchCommand, Cli, Command, ConfigCommand, DecorationArgs, RedactCommand};
use blackout::decorate::{
    Alignment, DecorationSpec, FooterSpec, HeaderSpec, Logo, LogoPosition,
};
use blackout::detect::Category;
use blackout::document::OutputShape;
use blackout::pipeline::{self, BatchEntry, ProcessOutput, ProcessRequest};
use blackout::{init_logging, Config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Redact(cmd) => handle_redact(&config, &cmd, false),
        Command::Preview(cmd) => handle_redact(&config, &cmd, true),
        Command::Batch(cmd) => handle_batch(&config, &cmd),
        Command::Types => {
            handle_types();
            Ok(())
        }
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn parse_categories(names: &[String]) -> Result<Vec<Category>, blackout::Error> {
    names.iter().map(|name| Category::from_str(name)).collect()
}

/// Build the decoration spec from CLI flags.
///
/// An unreadable or undecodable logo file degrades the decoration instead of
/// failing the run.
fn build_decoration(config: &Config, args: &DecorationArgs) -> Option<DecorationSpec> {
    if args.is_empty() {
        return None;
    }

    let logo_bytes = args.logo.as_ref().and_then(|path| {
        match std::fs::read(path) {
            Ok(bytes) => match blackout::decorate::validate_logo(&bytes) {
                Ok(()) => Some(bytes),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping invalid logo");
                    None
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable logo");
                None
            }
        }
    });

    if args.default_branding {
        return Some(DecorationSpec::default_preset(&config.branding, logo_bytes));
    }

    let position = args
        .logo_position
        .parse()
        .unwrap_or(LogoPosition::Left);
    let header = if args.header_text.is_some() || logo_bytes.is_some() {
        Some(HeaderSpec {
            text: args.header_text.clone(),
            font_size: args.header_font_size,
            logo: logo_bytes.map(|bytes| Logo { bytes, position }),
        })
    } else {
        None
    };

    let footer = args.footer_text.as_ref().map(|text| FooterSpec {
        text: text.clone(),
        font_size: args.footer_font_size,
        align: args.footer_align.parse().unwrap_or(Alignment::Center),
    });

    Some(DecorationSpec { header, footer })
}

fn build_request(
    config: &Config,
    categories: &[String],
    shape: Option<&String>,
    decoration: &DecorationArgs,
    preview: bool,
) -> Result<ProcessRequest, Box<dyn std::error::Error>> {
    let categories = parse_categories(categories)?;
    let output_shape = match shape {
        Some(s) => Some(OutputShape::from_str(s)?),
        None => None,
    };
    Ok(ProcessRequest {
        categories,
        output_shape,
        preview,
        decoration: build_decoration(config, decoration),
    })
}

fn output_path(input: &Path, explicit: Option<&PathBuf>, shape: OutputShape) -> PathBuf {
    if let Some(path) = explicit {
        return path.clone();
    }
    let stem = input
        .file_stem()
        .map_or_else(|| "output".to_string(), |s| s.to_string_lossy().into_owned());
    input.with_file_name(format!("{stem}_redacted.{}", shape.extension()))
}

fn handle_redact(
    config: &Config,
    cmd: &RedactCommand,
    preview: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = build_request(config, &cmd.categories, cmd.shape.as_ref(), &cmd.decoration, preview)?;
    let bytes = std::fs::read(&cmd.input)?;

    match pipeline::process(&bytes, &request, config)? {
        ProcessOutput::Preview(report) => {
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Preview: {}", cmd.input.display());
                print_terms("Emails", &report.detected.emails);
                print_terms("Phones", &report.detected.phones);
                print_terms("LinkedIn", &report.detected.linkedin);
                print_terms("Portfolios", &report.detected.portfolios);
                print_terms("URLs", &report.detected.urls);
                println!("Pages: {}", report.info.page_count);
            }
        }
        ProcessOutput::Document(document) => {
            let path = output_path(&cmd.input, cmd.output.as_ref(), document.shape);
            std::fs::write(&path, &document.bytes)?;
            if cmd.json {
                let summary = serde_json::json!({
                    "output": path,
                    "shape": document.shape,
                    "redacted": document.redacted_counts,
                });
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Redacted: {}", path.display());
                println!(
                    "  emails: {}, phones: {}, linkedin: {}, portfolios: {}, urls: {}",
                    document.redacted_counts.emails,
                    document.redacted_counts.phones,
                    document.redacted_counts.linkedin,
                    document.redacted_counts.portfolios,
                    document.redacted_counts.urls,
                );
            }
        }
    }
    Ok(())
}

fn print_terms(label: &str, terms: &[String]) {
    if terms.is_empty() {
        return;
    }
    println!("  {label}:");
    for term in terms {
        println!("    {term}");
    }
}

fn handle_batch(config: &Config, cmd: &BatchCommand) -> Result<(), Box<dyn std::error::Error>> {
    let request = build_request(config, &cmd.categories, None, &cmd.decoration, false)?;

    let mut inputs = Vec::new();
    let mut unreadable = Vec::new();
    for path in &cmd.inputs {
        match std::fs::read(path) {
            Ok(bytes) => inputs.push((path.display().to_string(), bytes)),
            Err(e) => {
                unreadable.push(BatchEntry::failed(path.display().to_string(), e.to_string()));
            }
        }
    }

    let mut report = pipeline::process_batch(&inputs, &request, config);
    report.errors += unreadable.len();
    report.results.extend(unreadable);

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn handle_types() {
    println!("Detection categories:");
    for category in Category::ALL {
        println!("  {:<12} {}", category.wire_name(), category.description());
    }
    println!();
    println!("Output shapes:");
    println!("  pdf          page-based output (page-based sources only)");
    println!("  docx         flow-based output");
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Limits]");
                println!("  Max input bytes:  {}", config.limits.max_input_bytes);
                println!();
                println!("[Redaction]");
                println!("  Placeholder:      {}", config.redaction.placeholder);
                println!("  Fill color:       {:?}", config.redaction.fill_color);
                println!();
                println!("[Branding]");
                println!("  Footer text:      {}", config.branding.footer_text);
                println!("  Footer size:      {}", config.branding.footer_font_size);
                println!("  Footer align:     {}", config.branding.footer_align);
                println!("  Header size:      {}", config.branding.header_font_size);
                println!("  Logo position:    {}", config.branding.logo_position);
            }
        }
        ConfigCommand::Path => match Config::default_config_path() {
            Some(path) => println!("{}", path.display()),
            None => println!("No configuration directory available on this system."),
        },
        ConfigCommand::Validate { file } => {
            let path = file.or_else(Config::default_config_path);
            match path {
                Some(path) => {
                    println!("Validating configuration: {}", path.display());
                    match Config::load_from(Some(path)) {
                        Ok(_) => println!("Configuration is valid."),
                        Err(e) => println!("Configuration error: {e}"),
                    }
                }
                None => println!("No configuration file to validate."),
            }
        }
    }
    Ok(())
}
