//! Page-based document handling.
//!
//! Loading, text extraction, the locate/apply redaction pair, and
//! serialization. Redaction is two-stage: [`PdfDocument::locate_terms`] maps
//! terms to per-page rectangles without mutating anything, and
//! [`PdfDocument::apply_redactions`] blanks the matched glyphs and draws
//! opaque boxes over the located regions.

mod content;
mod stamp;

pub use content::{blank_terms, extract_text, page_lines, text_runs, TextRun};

use std::collections::BTreeSet;

use lopdf::content::{Content, Operation};
use lopdf::{Object, ObjectId};
use serde::Serialize;
use tracing::{debug, warn};

use crate::document::DocumentInfo;
use crate::error::{Error, Result};

use content::GLYPH_ADVANCE;

/// Default page size (US Letter) used when no `MediaBox` is found.
const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// A redaction rectangle in page coordinates (origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Bottom edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

/// All redaction rectangles located on one page.
#[derive(Debug, Clone, Serialize)]
pub struct PageRegions {
    /// 1-based page number.
    pub page_number: u32,
    /// Located rectangles.
    pub rects: Vec<Rect>,
}

/// A loaded page-based document.
pub struct PdfDocument {
    pub(crate) doc: lopdf::Document,
}

impl std::fmt::Debug for PdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfDocument")
            .field("pages", &self.page_count())
            .finish()
    }
}

impl PdfDocument {
    /// Load from raw bytes. Encrypted documents are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let doc = lopdf::Document::load_mem(bytes)
            .map_err(|e| Error::malformed(format!("failed to parse document: {e}")))?;

        if doc.trailer.get(b"Encrypt").is_ok() {
            return Err(Error::malformed("encrypted documents are not supported"));
        }

        let loaded = Self { doc };
        if loaded.page_count() == 0 {
            return Err(Error::malformed("document has no pages"));
        }
        Ok(loaded)
    }

    /// Number of pages.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Structural information, including any metadata the trailer carries.
    #[must_use]
    pub fn info(&self) -> DocumentInfo {
        let mut info = DocumentInfo {
            page_count: self.page_count(),
            ..DocumentInfo::default()
        };

        if let Ok(object) = self.doc.trailer.get(b"Info") {
            let dict = match object {
                Object::Reference(id) => self.doc.get_dictionary(*id).ok(),
                Object::Dictionary(dict) => Some(dict),
                _ => None,
            };
            if let Some(dict) = dict {
                for (key, value) in dict.iter() {
                    if let Object::String(bytes, _) = value {
                        info.metadata.insert(
                            String::from_utf8_lossy(key).into_owned(),
                            String::from_utf8_lossy(bytes).into_owned(),
                        );
                    }
                }
            }
        }

        info
    }

    fn page_content(&self, page_id: ObjectId) -> Result<Content> {
        let data = self
            .doc
            .get_page_content(page_id)
            .map_err(|e| Error::malformed(format!("unreadable page content: {e}")))?;
        Content::decode(&data)
            .map_err(|e| Error::malformed(format!("undecodable content stream: {e}")))
    }

    /// Extract the full plain text, pages joined by newlines.
    pub fn extract_text(&self) -> Result<String> {
        let mut pages_text = Vec::new();
        for page_id in self.doc.get_pages().into_values() {
            let content = self.page_content(page_id)?;
            pages_text.push(content::extract_text(&content::text_runs(&content)));
        }
        Ok(pages_text.join("\n"))
    }

    /// Text lines per page, for flow conversion.
    pub fn pages_as_lines(&self) -> Result<Vec<Vec<String>>> {
        let mut pages = Vec::new();
        for page_id in self.doc.get_pages().into_values() {
            let content = self.page_content(page_id)?;
            pages.push(content::page_lines(&content::text_runs(&content)));
        }
        Ok(pages)
    }

    /// Locate every occurrence of every term, mapping each to a rectangle.
    ///
    /// Occurrence matching is case-sensitive, per run. Geometry uses the
    /// average-advance approximation, so rectangles are approximate but
    /// always cover the run region the glyphs occupy. Pages whose content
    /// cannot be decoded are skipped with a warning.
    #[must_use]
    pub fn locate_terms(&self, terms: &BTreeSet<String>) -> Vec<PageRegions> {
        let mut regions = Vec::new();

        for (page_number, page_id) in self.doc.get_pages() {
            let content = match self.page_content(page_id) {
                Ok(content) => content,
                Err(e) => {
                    warn!(page = page_number, error = %e, "skipping unreadable page");
                    continue;
                }
            };

            let mut rects = Vec::new();
            for run in content::text_runs(&content) {
                for term in terms {
                    if term.is_empty() {
                        continue;
                    }
                    for (index, _) in run.text.match_indices(term.as_str()) {
                        rects.push(run_rect(&run, index, term));
                    }
                }
            }

            if !rects.is_empty() {
                debug!(page = page_number, count = rects.len(), "located regions");
                regions.push(PageRegions {
                    page_number,
                    rects,
                });
            }
        }

        regions
    }

    /// Apply redactions: blank matched glyphs in the content streams and
    /// draw opaque boxes over the located regions.
    ///
    /// Returns the number of blanked occurrences. Pages that fail to
    /// re-encode are left untouched with a warning.
    pub fn apply_redactions(
        &mut self,
        regions: &[PageRegions],
        terms: &BTreeSet<String>,
        fill_color: [f32; 3],
    ) -> usize {
        let mut blanked = 0;
        let pages = self.doc.get_pages();

        for (page_number, page_id) in pages {
            let mut content = match self.page_content(page_id) {
                Ok(content) => content,
                Err(e) => {
                    warn!(page = page_number, error = %e, "skipping unreadable page");
                    continue;
                }
            };

            let page_blanked = content::blank_terms(&mut content, terms);

            let page_regions = regions.iter().find(|r| r.page_number == page_number);
            if page_blanked == 0 && page_regions.is_none() {
                continue;
            }

            if let Some(page_regions) = page_regions {
                for rect in &page_regions.rects {
                    content.operations.extend(fill_ops(*rect, fill_color));
                }
            }

            match content.encode() {
                Ok(encoded) => {
                    if let Err(e) = self.doc.change_page_content(page_id, encoded) {
                        warn!(page = page_number, error = %e, "failed to rewrite page");
                        continue;
                    }
                    blanked += page_blanked;
                }
                Err(e) => {
                    warn!(page = page_number, error = %e, "failed to encode page content");
                }
            }
        }

        blanked
    }

    /// Serialize the document.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.doc
            .save_to(&mut buffer)
            .map_err(|e| Error::internal(format!("failed to serialize document: {e}")))?;
        Ok(buffer)
    }

    /// Page dimensions from the page's `MediaBox`, walking up the page tree
    /// when the box is inherited. Falls back to US Letter.
    pub(crate) fn page_size(&self, page_id: ObjectId) -> (f32, f32) {
        let mut current = Some(page_id);
        // Bounded walk guards against cyclic Parent chains.
        for _ in 0..16 {
            let Some(id) = current else { break };
            let Ok(dict) = self.doc.get_dictionary(id) else {
                break;
            };
            if let Ok(Object::Array(media_box)) = dict.get(b"MediaBox") {
                if media_box.len() == 4 {
                    let values: Vec<f32> = media_box.iter().filter_map(as_number).collect();
                    if values.len() == 4 {
                        return (values[2] - values[0], values[3] - values[1]);
                    }
                }
            }
            current = match dict.get(b"Parent") {
                Ok(Object::Reference(parent)) => Some(*parent),
                _ => None,
            };
        }
        DEFAULT_PAGE_SIZE
    }
}

fn as_number(object: &Object) -> Option<f32> {
    match object {
        #[allow(clippy::cast_precision_loss)]
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

#[allow(clippy::cast_precision_loss)]
fn run_rect(run: &TextRun, byte_index: usize, term: &str) -> Rect {
    let glyph_width = GLYPH_ADVANCE * run.font_size;
    let chars_before = run.text[..byte_index].chars().count() as f32;
    let chars_in_term = term.chars().count() as f32;
    Rect {
        x: run.x + chars_before * glyph_width,
        // Extend below the baseline to cover descenders.
        y: run.y - 0.2 * run.font_size,
        width: chars_in_term * glyph_width,
        height: 1.2 * run.font_size,
    }
}

fn fill_ops(rect: Rect, color: [f32; 3]) -> Vec<Operation> {
    vec![
        Operation::new("q", vec![]),
        Operation::new(
            "rg",
            vec![
                Object::Real(color[0]),
                Object::Real(color[1]),
                Object::Real(color[2]),
            ],
        ),
        Operation::new(
            "re",
            vec![
                Object::Real(rect.x),
                Object::Real(rect.y),
                Object::Real(rect.width),
                Object::Real(rect.height),
            ],
        ),
        Operation::new("f", vec![]),
        Operation::new("Q", vec![]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, x: f32, y: f32, size: f32) -> TextRun {
        TextRun {
            text: text.to_string(),
            x,
            y,
            font_size: size,
        }
    }

    #[test]
    fn test_run_rect_offsets_by_preceding_chars() {
        let r = run("mail a@b.co now", 100.0, 700.0, 10.0);
        let index = r.text.find("a@b.co").unwrap();
        let rect = run_rect(&r, index, "a@b.co");
        // Five characters precede the term at 5pt per glyph.
        assert!((rect.x - 125.0).abs() < 0.001);
        assert!((rect.width - 30.0).abs() < 0.001);
        assert!((rect.y - 698.0).abs() < 0.001);
        assert!((rect.height - 12.0).abs() < 0.001);
    }

    #[test]
    fn test_fill_ops_shape() {
        let ops = fill_ops(
            Rect {
                x: 1.0,
                y: 2.0,
                width: 3.0,
                height: 4.0,
            },
            [0.0, 0.0, 0.0],
        );
        let operators: Vec<&str> = ops.iter().map(|o| o.operator.as_str()).collect();
        assert_eq!(operators, vec!["q", "rg", "re", "f", "Q"]);
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(PdfDocument::from_bytes(b"%PDF-1.7 garbage").is_err());
    }
}
