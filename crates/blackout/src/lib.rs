//! `blackout` - Contact-information detection and redaction for documents
//!
//! This library scans PDF and DOCX documents for contact information (email
//! addresses, phone numbers, LinkedIn profiles, portfolio links, URLs) and
//! produces redacted copies, optionally converted between formats and stamped
//! with header/footer decoration.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod convert;
pub mod decorate;
pub mod detect;
pub mod document;
pub mod docx;
pub mod error;
pub mod logging;
pub mod pdf;
pub mod pipeline;

pub use config::Config;
pub use detect::{Category, DetectedItems, PatternLibrary};
pub use document::{Document, DocumentInfo, OutputShape};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use pipeline::{process, process_batch, ProcessOutput, ProcessRequest};
