//! Format conversion.
//!
//! Only the page-based to flow-based direction exists: page text is re-laid
//! out as one paragraph per visual line, with a blank paragraph between
//! pages. Fixed geometry (fonts, images, exact positions) does not survive
//! the conversion; the text does, which is what redaction needs. The reverse
//! direction is not supported.

use docx_rs::{Docx, Paragraph, Run};

use crate::docx::DocxDocument;
use crate::error::Result;
use crate::pdf::PdfDocument;

/// Re-lay a page-based document out as a flow-based one.
pub fn pdf_to_flow(source: &PdfDocument) -> Result<DocxDocument> {
    let pages = source
        .pages_as_lines()
        .map_err(|e| crate::error::Error::conversion(e.to_string()))?;

    let mut docx = Docx::new();
    let page_count = pages.len();
    for (index, lines) in pages.into_iter().enumerate() {
        for line in lines {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
        }
        if index + 1 < page_count {
            docx = docx.add_paragraph(Paragraph::new());
        }
    }

    Ok(DocxDocument::from_docx(docx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    fn pdf_with_lines(lines: &[&str]) -> PdfDocument {
        let mut doc = lopdf::Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(b"F1".to_vec()), Object::Integer(12)],
            ),
            Operation::new("Td", vec![Object::Integer(72), Object::Integer(720)]),
            Operation::new("TL", vec![Object::Integer(14)]),
        ];
        for (index, line) in lines.iter().enumerate() {
            if index > 0 {
                operations.push(Operation::new("T*", vec![]));
            }
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(*line)],
            ));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().unwrap(),
        ));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        PdfDocument::from_bytes(&bytes).unwrap()
    }

    #[test]
    fn test_pdf_to_flow_keeps_line_text() {
        let pdf = pdf_with_lines(&["first line", "second line"]);
        let flow = pdf_to_flow(&pdf).unwrap();
        let text = flow.extract_text();
        assert!(text.contains("first line"));
        assert!(text.contains("second line"));
    }

    #[test]
    fn test_pdf_to_flow_produces_container_bytes() {
        let pdf = pdf_with_lines(&["mail john@example.com"]);
        let flow = pdf_to_flow(&pdf).unwrap();
        let bytes = flow.into_bytes().unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
