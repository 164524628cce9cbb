//! Flow-based document handling.
//!
//! Text in a flow-based document lives in runs inside paragraphs, directly in
//! the body and inside table cells. Redaction replaces each matched term with
//! the configured placeholder inside the run that carries it; a term split
//! across run boundaries by character formatting is not matched.

use std::io::Cursor;

use docx_rs::{
    read_docx, AlignmentType, Docx, DocumentChild, Footer, Header, Paragraph, ParagraphChild, Pic,
    Run, RunChild, Table, TableCellContent, TableChild, TableRowChild,
};
use tracing::warn;

use crate::decorate::{Alignment, DecorationSpec, LogoPosition};
use crate::document::DocumentInfo;
use crate::error::{Error, Result};

/// EMU per point (12700 EMU = 1pt).
const EMU_PER_POINT: u32 = 12_700;
/// Logo box in EMU, matching the page-based 80x30pt box.
const LOGO_WIDTH_EMU: u32 = 80 * EMU_PER_POINT;
const LOGO_HEIGHT_EMU: u32 = 30 * EMU_PER_POINT;

/// A loaded flow-based document.
#[derive(Debug)]
pub struct DocxDocument {
    docx: Docx,
}

impl DocxDocument {
    /// Load from raw container bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let docx = read_docx(bytes)
            .map_err(|e| Error::malformed(format!("failed to parse document: {e}")))?;
        Ok(Self { docx })
    }

    /// Wrap an already-built document (used by format conversion).
    #[must_use]
    pub fn from_docx(docx: Docx) -> Self {
        Self { docx }
    }

    /// Number of top-level blocks (paragraphs and tables).
    #[must_use]
    pub fn section_count(&self) -> usize {
        self.docx.document.children.len()
    }

    /// Structural information.
    #[must_use]
    pub fn info(&self) -> DocumentInfo {
        DocumentInfo {
            page_count: self.section_count(),
            ..DocumentInfo::default()
        }
    }

    /// Extract the full plain text: body paragraphs and table cells, joined
    /// by newlines.
    #[must_use]
    pub fn extract_text(&self) -> String {
        let mut lines = Vec::new();
        for child in &self.docx.document.children {
            if let DocumentChild::Paragraph(paragraph) = child {
                lines.push(paragraph.raw_text());
            } else if let DocumentChild::Table(table) = child {
                collect_table_text(table, &mut lines);
            }
        }
        lines.join("\n")
    }

    /// Replace every occurrence of every term with the placeholder, in body
    /// paragraphs and table cells. Returns the number of replacements.
    pub fn replace_terms<'a, I>(&mut self, terms: I, placeholder: &str) -> usize
    where
        I: IntoIterator<Item = &'a String> + Clone,
    {
        let mut replaced = 0;
        for child in &mut self.docx.document.children {
            if let DocumentChild::Paragraph(paragraph) = child {
                replaced += replace_in_paragraph(paragraph, terms.clone(), placeholder);
            } else if let DocumentChild::Table(table) = child {
                replaced += replace_in_table(table, terms.clone(), placeholder);
            }
        }
        replaced
    }

    /// Replace the document header and footer with the decoration.
    ///
    /// Unlike the page-based path this is not additive: the flow container
    /// has real header/footer parts and the decoration takes them over.
    pub fn decorate(&mut self, spec: &DecorationSpec) {
        if spec.is_empty() {
            return;
        }

        let mut docx = std::mem::take(&mut self.docx);

        if let Some(header_spec) = &spec.header {
            let mut header = Header::new();
            let mut has_logo = false;

            if let Some(logo) = &header_spec.logo {
                match image::load_from_memory(&logo.bytes) {
                    Ok(_) => {
                        let pic = Pic::new(&logo.bytes).size(LOGO_WIDTH_EMU, LOGO_HEIGHT_EMU);
                        let align = match logo.position {
                            LogoPosition::Left => AlignmentType::Left,
                            LogoPosition::Center => AlignmentType::Center,
                            LogoPosition::Right => AlignmentType::Right,
                        };
                        header = header.add_paragraph(
                            Paragraph::new()
                                .add_run(Run::new().add_image(pic))
                                .align(align),
                        );
                        has_logo = true;
                    }
                    Err(e) => {
                        warn!(error = %e, "skipping undecodable logo");
                    }
                }
            }

            if let Some(text) = &header_spec.text {
                let align = if has_logo {
                    AlignmentType::Right
                } else {
                    AlignmentType::Center
                };
                header = header.add_paragraph(
                    Paragraph::new()
                        .add_run(
                            Run::new()
                                .add_text(text.as_str())
                                .size(half_points(header_spec.font_size)),
                        )
                        .align(align),
                );
            }

            docx = docx.header(header);
        }

        if let Some(footer_spec) = &spec.footer {
            let align = match footer_spec.align {
                Alignment::Left => AlignmentType::Left,
                Alignment::Center => AlignmentType::Center,
                Alignment::Right => AlignmentType::Right,
            };
            let footer = Footer::new().add_paragraph(
                Paragraph::new()
                    .add_run(
                        Run::new()
                            .add_text(footer_spec.text.as_str())
                            .size(half_points(footer_spec.font_size)),
                    )
                    .align(align),
            );
            docx = docx.footer(footer);
        }

        self.docx = docx;
    }

    /// Serialize the container.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.docx
            .build()
            .pack(&mut cursor)
            .map_err(|e| Error::internal(format!("failed to serialize document: {e}")))?;
        Ok(cursor.into_inner())
    }
}

fn half_points(points: u32) -> usize {
    (points * 2) as usize
}

fn collect_table_text(table: &Table, lines: &mut Vec<String>) {
    for row in &table.rows {
        let TableChild::TableRow(row) = row;
        for cell in &row.cells {
            let TableRowChild::TableCell(cell) = cell;
            for content in &cell.children {
                if let TableCellContent::Paragraph(paragraph) = content {
                    lines.push(paragraph.raw_text());
                }
            }
        }
    }
}

fn replace_in_paragraph<'a, I>(paragraph: &mut Paragraph, terms: I, placeholder: &str) -> usize
where
    I: IntoIterator<Item = &'a String>,
{
    let terms: Vec<&String> = terms.into_iter().collect();
    let mut replaced = 0;
    for child in &mut paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &mut run.children {
                if let RunChild::Text(text) = run_child {
                    for term in &terms {
                        replaced += replace_all(&mut text.text, term, placeholder);
                    }
                }
            }
        }
    }
    replaced
}

fn replace_in_table<'a, I>(table: &mut Table, terms: I, placeholder: &str) -> usize
where
    I: IntoIterator<Item = &'a String> + Clone,
{
    let mut replaced = 0;
    for row in &mut table.rows {
        let TableChild::TableRow(row) = row;
        for cell in &mut row.cells {
            let TableRowChild::TableCell(cell) = cell;
            for content in &mut cell.children {
                if let TableCellContent::Paragraph(paragraph) = content {
                    replaced += replace_in_paragraph(paragraph, terms.clone(), placeholder);
                }
            }
        }
    }
    replaced
}

fn replace_all(text: &mut String, term: &str, placeholder: &str) -> usize {
    if term.is_empty() || !text.contains(term) {
        return 0;
    }
    let count = text.matches(term).count();
    *text = text.replace(term, placeholder);
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DocxDocument {
        let docx = Docx::new()
            .add_paragraph(
                Paragraph::new().add_run(Run::new().add_text("Mail john@example.com today")),
            )
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Nothing here")));
        DocxDocument::from_docx(docx)
    }

    #[test]
    fn test_extract_text_joins_paragraphs() {
        let doc = sample();
        let text = doc.extract_text();
        assert!(text.contains("john@example.com"));
        assert!(text.contains("Nothing here"));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_replace_terms_in_paragraphs() {
        let mut doc = sample();
        let terms = vec!["john@example.com".to_string()];
        let replaced = doc.replace_terms(&terms, "[REDACTED]");
        assert_eq!(replaced, 1);

        let text = doc.extract_text();
        assert!(!text.contains("john@example.com"));
        assert!(text.contains("[REDACTED]"));
    }

    #[test]
    fn test_replace_terms_counts_every_occurrence() {
        let docx = Docx::new().add_paragraph(
            Paragraph::new().add_run(Run::new().add_text("a@b.co and again a@b.co")),
        );
        let mut doc = DocxDocument::from_docx(docx);
        let terms = vec!["a@b.co".to_string()];
        assert_eq!(doc.replace_terms(&terms, "[REDACTED]"), 2);
    }

    #[test]
    fn test_replace_terms_missing_term_is_noop() {
        let mut doc = sample();
        let terms = vec!["absent@nowhere.io".to_string()];
        assert_eq!(doc.replace_terms(&terms, "[REDACTED]"), 0);
        assert!(doc.extract_text().contains("john@example.com"));
    }

    #[test]
    fn test_section_count() {
        assert_eq!(sample().section_count(), 2);
    }

    #[test]
    fn test_roundtrip_through_bytes() {
        let bytes = sample().into_bytes().unwrap();
        assert!(bytes.starts_with(b"PK"));

        let reloaded = DocxDocument::from_bytes(&bytes).unwrap();
        assert!(reloaded.extract_text().contains("john@example.com"));
    }

    #[test]
    fn test_decorate_footer_survives_roundtrip() {
        use crate::decorate::FooterSpec;

        let mut doc = sample();
        doc.decorate(&DecorationSpec {
            header: None,
            footer: Some(FooterSpec {
                text: "Confidential".to_string(),
                font_size: 9,
                align: Alignment::Center,
            }),
        });

        let bytes = doc.into_bytes().unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_half_points() {
        assert_eq!(half_points(9), 18);
        assert_eq!(half_points(10), 20);
    }
}
