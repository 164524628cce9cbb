//! The detection/redaction pipeline.
//!
//! One entry point for single documents ([`process`]) and one for batches
//! ([`process_batch`]). Both take raw bytes in; `process` returns either a
//! preview report or a redacted document, `process_batch` returns per-file
//! counts without the redacted bytes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::decorate::DecorationSpec;
use crate::detect::{Category, DetectedItems, PatternLibrary};
use crate::document::{Document, DocumentInfo, OutputShape};
use crate::error::{Error, Result};

/// A single-document processing request.
#[derive(Debug, Default)]
pub struct ProcessRequest {
    /// Categories to detect.
    pub categories: Vec<Category>,
    /// Requested output shape; `None` keeps the source shape.
    pub output_shape: Option<OutputShape>,
    /// Report detections without producing a redacted document.
    pub preview: bool,
    /// Header/footer decoration to stamp, if any.
    pub decoration: Option<DecorationSpec>,
}

/// Detection report produced by preview mode.
#[derive(Debug, Serialize)]
pub struct PreviewReport {
    /// Detected terms per category.
    pub detected: DetectedItems,
    /// Structural information about the document.
    pub info: DocumentInfo,
    /// The categories that were scanned.
    pub categories: Vec<Category>,
}

/// Number of redacted terms per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RedactionCounts {
    /// Email addresses.
    pub emails: usize,
    /// Phone numbers.
    pub phones: usize,
    /// LinkedIn URLs.
    pub linkedin: usize,
    /// Portfolio URLs.
    pub portfolios: usize,
    /// All URLs.
    pub urls: usize,
}

impl RedactionCounts {
    /// Sum across categories.
    #[must_use]
    pub fn total(&self) -> usize {
        self.emails + self.phones + self.linkedin + self.portfolios + self.urls
    }
}

impl From<&DetectedItems> for RedactionCounts {
    fn from(items: &DetectedItems) -> Self {
        Self {
            emails: items.emails.len(),
            phones: items.phones.len(),
            linkedin: items.linkedin.len(),
            portfolios: items.portfolios.len(),
            urls: items.urls.len(),
        }
    }
}

/// A redacted document plus its report fields.
#[derive(Debug)]
pub struct RedactedDocument {
    /// Serialized output.
    pub bytes: Vec<u8>,
    /// Shape of the output bytes.
    pub shape: OutputShape,
    /// Unique redacted terms per category.
    pub redacted_counts: RedactionCounts,
    /// Structural information about the source.
    pub info: DocumentInfo,
}

/// Result of a single-document request.
#[derive(Debug)]
pub enum ProcessOutput {
    /// Preview mode: detections only, nothing produced.
    Preview(PreviewReport),
    /// Redaction mode: the redacted document.
    Document(RedactedDocument),
}

/// Run detection (and redaction unless previewing) over one document.
///
/// Preview and apply run the same detection over the same extracted text, so
/// a preview followed by a redaction of the unchanged document reports the
/// same terms. When nothing matched, no decoration was requested, and the
/// output shape equals the source shape, the input bytes are returned
/// verbatim.
pub fn process(bytes: &[u8], request: &ProcessRequest, config: &Config) -> Result<ProcessOutput> {
    if request.categories.is_empty() {
        return Err(Error::NoCategories);
    }
    if bytes.len() > config.limits.max_input_bytes {
        return Err(Error::InputTooLarge {
            size: bytes.len(),
            limit: config.limits.max_input_bytes,
        });
    }

    let document = Document::from_bytes(bytes)?;
    let info = document.info();
    let source_shape = document.shape();
    let target_shape = request.output_shape.unwrap_or(source_shape);

    let text = document.extract_text()?;
    let library = PatternLibrary::new();
    let detected = library.detect(&text, &request.categories);
    debug!(terms = detected.total(), "detection finished");

    if request.preview {
        return Ok(ProcessOutput::Preview(PreviewReport {
            detected,
            info,
            categories: request.categories.clone(),
        }));
    }

    let decoration = request.decoration.clone().unwrap_or_default();
    let terms = detected.term_union();
    let counts = RedactionCounts::from(&detected);

    let output_bytes = match (document, target_shape) {
        (Document::PageBased(pdf), OutputShape::Docx) => {
            // Convert first, then redact the converted artifact so nothing
            // reappears through re-layout.
            let mut flow = crate::convert::pdf_to_flow(&pdf)?;
            let converted_text = flow.extract_text();
            let reconverted = library.detect(&converted_text, &request.categories);
            let replaced =
                flow.replace_terms(&reconverted.term_union(), &config.redaction.placeholder);
            info!(replaced, "redacted converted document");
            flow.decorate(&decoration);
            flow.into_bytes()?
        }
        (Document::PageBased(mut pdf), OutputShape::Pdf) => {
            let regions = pdf.locate_terms(&terms);
            if regions.is_empty() && decoration.is_empty() {
                return Ok(ProcessOutput::Document(RedactedDocument {
                    bytes: bytes.to_vec(),
                    shape: OutputShape::Pdf,
                    redacted_counts: counts,
                    info,
                }));
            }
            let blanked = pdf.apply_redactions(&regions, &terms, config.redaction.fill_color);
            info!(blanked, "redacted document");
            pdf.decorate(&decoration)?;
            pdf.to_bytes()?
        }
        (Document::FlowBased(mut docx), OutputShape::Docx) => {
            if terms.is_empty() && decoration.is_empty() {
                return Ok(ProcessOutput::Document(RedactedDocument {
                    bytes: bytes.to_vec(),
                    shape: OutputShape::Docx,
                    redacted_counts: counts,
                    info,
                }));
            }
            let replaced = docx.replace_terms(&terms, &config.redaction.placeholder);
            info!(replaced, "redacted document");
            docx.decorate(&decoration);
            docx.into_bytes()?
        }
        (Document::FlowBased(_), OutputShape::Pdf) => {
            return Err(Error::UnsupportedOutputShape {
                shape: "docx to pdf conversion".to_string(),
            });
        }
    };

    Ok(ProcessOutput::Document(RedactedDocument {
        bytes: output_bytes,
        shape: target_shape,
        redacted_counts: counts,
        info,
    }))
}

/// Outcome of one document inside a batch.
#[derive(Debug, Serialize)]
pub struct BatchEntry {
    /// Source filename as supplied by the caller.
    pub filename: String,
    /// Whether processing succeeded.
    pub success: bool,
    /// Per-category counts, on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redacted: Option<RedactionCounts>,
    /// Error message, on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchEntry {
    /// A successful entry.
    #[must_use]
    pub fn succeeded(filename: impl Into<String>, counts: RedactionCounts) -> Self {
        Self {
            filename: filename.into(),
            success: true,
            redacted: Some(counts),
            error: None,
        }
    }

    /// A failed entry.
    #[must_use]
    pub fn failed(filename: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            success: false,
            redacted: None,
            error: Some(error.into()),
        }
    }
}

/// Summary report for a batch run.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    /// Number of successfully processed documents.
    pub processed: usize,
    /// Number of failed documents.
    pub errors: usize,
    /// Per-document outcomes, in input order.
    pub results: Vec<BatchEntry>,
    /// When the batch finished.
    pub generated_at: DateTime<Utc>,
}

/// Process a batch of documents, isolating failures per document.
///
/// A malformed document fails its own entry and nothing else. The report
/// carries per-category counts only; batch mode does not return redacted
/// bytes.
#[must_use]
pub fn process_batch(
    inputs: &[(String, Vec<u8>)],
    request: &ProcessRequest,
    config: &Config,
) -> BatchReport {
    let mut results = Vec::with_capacity(inputs.len());
    let mut processed = 0;
    let mut errors = 0;

    for (filename, bytes) in inputs {
        match process(bytes, request, config) {
            Ok(ProcessOutput::Document(document)) => {
                processed += 1;
                results.push(BatchEntry::succeeded(filename, document.redacted_counts));
            }
            Ok(ProcessOutput::Preview(report)) => {
                processed += 1;
                results.push(BatchEntry::succeeded(
                    filename,
                    RedactionCounts::from(&report.detected),
                ));
            }
            Err(e) => {
                warn!(file = %filename, error = %e, "batch document failed");
                errors += 1;
                results.push(BatchEntry::failed(filename, e.to_string()));
            }
        }
    }

    BatchReport {
        processed,
        errors,
        results,
        generated_at: Utc::now(),
    }
}
