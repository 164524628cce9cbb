//! Header/footer stamping for page-based documents.
//!
//! Stamping is additive: pages have no separable header or footer region, so
//! the decoration is drawn on top of the existing content. Text uses a
//! Helvetica font object registered under a private resource name; the logo
//! is embedded as an RGB image XObject.

use lopdf::content::Operation;
use lopdf::{dictionary, Dictionary, Object, ObjectId, Stream};
use tracing::warn;

use crate::decorate::{Alignment, DecorationSpec, LogoPosition, LOGO_HEIGHT, LOGO_WIDTH};
use crate::error::{Error, Result};

use super::content::GLYPH_ADVANCE;
use super::PdfDocument;

const FONT_RESOURCE: &str = "BkF1";
const LOGO_RESOURCE: &str = "BkIm";

const PAGE_MARGIN: f32 = 20.0;
const HEADER_BASELINE_OFFSET: f32 = 30.0;
const FOOTER_BASELINE: f32 = 30.0;
const LOGO_TOP_OFFSET: f32 = 45.0;

impl PdfDocument {
    /// Stamp the decoration onto every page.
    pub fn decorate(&mut self, spec: &DecorationSpec) -> Result<()> {
        if spec.is_empty() {
            return Ok(());
        }

        let font_id = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let logo = spec.header.as_ref().and_then(|h| h.logo.as_ref());
        let logo_id = match logo {
            Some(logo) => match embed_logo(&mut self.doc, &logo.bytes) {
                Ok(id) => Some((id, logo.position)),
                Err(e) => {
                    // A bad logo degrades the decoration, it does not fail
                    // the whole request.
                    warn!(error = %e, "skipping undecodable logo");
                    None
                }
            },
            None => None,
        };

        for (_, page_id) in self.doc.get_pages() {
            let (page_width, page_height) = self.page_size(page_id);
            self.register_resources(page_id, font_id, logo_id.map(|(id, _)| id))?;

            let mut operations = Vec::new();

            if let Some((_, position)) = logo_id {
                let x = match position {
                    LogoPosition::Left => PAGE_MARGIN,
                    LogoPosition::Center => (page_width - LOGO_WIDTH) / 2.0,
                    LogoPosition::Right => page_width - LOGO_WIDTH - PAGE_MARGIN,
                };
                let y = page_height - LOGO_TOP_OFFSET;
                operations.extend(logo_ops(x, y));
            }

            if let Some(header) = &spec.header {
                if let Some(text) = &header.text {
                    #[allow(clippy::cast_precision_loss)]
                    let size = header.font_size as f32;
                    let width = text_width(text, size);
                    // With a logo on the page the text moves aside.
                    let x = if logo_id.is_some() {
                        page_width - width - PAGE_MARGIN
                    } else {
                        (page_width - width) / 2.0
                    };
                    let y = page_height - HEADER_BASELINE_OFFSET;
                    operations.extend(text_ops(text, x, y, size));
                }
            }

            if let Some(footer) = &spec.footer {
                #[allow(clippy::cast_precision_loss)]
                let size = footer.font_size as f32;
                let width = text_width(&footer.text, size);
                let x = match footer.align {
                    Alignment::Left => PAGE_MARGIN,
                    Alignment::Center => (page_width - width) / 2.0,
                    Alignment::Right => page_width - width - PAGE_MARGIN,
                };
                operations.extend(text_ops(&footer.text, x, FOOTER_BASELINE, size));
            }

            if operations.is_empty() {
                continue;
            }

            let mut content = self.page_content(page_id)?;
            content.operations.extend(operations);
            let encoded = content
                .encode()
                .map_err(|e| Error::internal(format!("failed to encode page content: {e}")))?;
            self.doc
                .change_page_content(page_id, encoded)
                .map_err(|e| Error::internal(format!("failed to rewrite page: {e}")))?;
        }

        Ok(())
    }

    /// Resolve the page's resources (walking the page tree for inherited
    /// dictionaries), add the stamping entries, and set the result inline on
    /// the page so existing fonts stay visible.
    fn register_resources(
        &mut self,
        page_id: ObjectId,
        font_id: ObjectId,
        logo_id: Option<ObjectId>,
    ) -> Result<()> {
        let mut resources = self.resolved_resources(page_id);
        self.upsert_resource(&mut resources, b"Font", FONT_RESOURCE, font_id);
        if let Some(logo_id) = logo_id {
            self.upsert_resource(&mut resources, b"XObject", LOGO_RESOURCE, logo_id);
        }

        let page_dict = self
            .doc
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| Error::malformed(format!("page dictionary missing: {e}")))?;
        page_dict.set("Resources", Object::Dictionary(resources));
        Ok(())
    }

    fn resolved_resources(&self, page_id: ObjectId) -> Dictionary {
        let mut current = Some(page_id);
        for _ in 0..16 {
            let Some(id) = current else { break };
            let Ok(dict) = self.doc.get_dictionary(id) else {
                break;
            };
            match dict.get(b"Resources") {
                Ok(Object::Dictionary(resources)) => return resources.clone(),
                Ok(Object::Reference(resource_id)) => {
                    return self
                        .doc
                        .get_dictionary(*resource_id)
                        .map(Clone::clone)
                        .unwrap_or_else(|_| Dictionary::new());
                }
                _ => {}
            }
            current = match dict.get(b"Parent") {
                Ok(Object::Reference(parent)) => Some(*parent),
                _ => None,
            };
        }
        Dictionary::new()
    }

    fn upsert_resource(
        &self,
        resources: &mut Dictionary,
        kind: &[u8],
        name: &str,
        target: ObjectId,
    ) {
        let mut sub = match resources.get(kind) {
            Ok(Object::Dictionary(sub)) => sub.clone(),
            Ok(Object::Reference(id)) => self
                .doc
                .get_dictionary(*id)
                .map(Clone::clone)
                .unwrap_or_else(|_| Dictionary::new()),
            _ => Dictionary::new(),
        };
        sub.set(name, Object::Reference(target));
        resources.set(kind.to_vec(), Object::Dictionary(sub));
    }
}

/// Decode the logo and embed it as an uncompressed RGB image XObject.
fn embed_logo(doc: &mut lopdf::Document, bytes: &[u8]) -> Result<ObjectId> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| Error::decoration(format!("logo is not a decodable image: {e}")))?;
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();

    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => i64::from(width),
        "Height" => i64::from(height),
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
    };
    Ok(doc.add_object(Stream::new(dict, rgb.into_raw())))
}

fn text_width(text: &str, font_size: f32) -> f32 {
    #[allow(clippy::cast_precision_loss)]
    let chars = text.chars().count() as f32;
    chars * GLYPH_ADVANCE * font_size
}

fn text_ops(text: &str, x: f32, y: f32, font_size: f32) -> Vec<Operation> {
    vec![
        Operation::new("q", vec![]),
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![
                Object::Name(FONT_RESOURCE.as_bytes().to_vec()),
                Object::Real(font_size),
            ],
        ),
        Operation::new("Td", vec![Object::Real(x), Object::Real(y)]),
        Operation::new("Tj", vec![Object::string_literal(text)]),
        Operation::new("ET", vec![]),
        Operation::new("Q", vec![]),
    ]
}

fn logo_ops(x: f32, y: f32) -> Vec<Operation> {
    vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                Object::Real(LOGO_WIDTH),
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(LOGO_HEIGHT),
                Object::Real(x),
                Object::Real(y),
            ],
        ),
        Operation::new("Do", vec![Object::Name(LOGO_RESOURCE.as_bytes().to_vec())]),
        Operation::new("Q", vec![]),
    ]
}
