//! Content-stream text walking.
//!
//! Page-based text lives in content-stream show operators. The walker below
//! tracks the text cursor through the common positioning operators and
//! produces positioned runs. Glyph widths are approximated as half the font
//! size; the goal is stable, conservative geometry for redaction boxes, not
//! typographically exact layout.

use std::collections::BTreeSet;

use lopdf::content::Content;
use lopdf::Object;

/// Average glyph advance as a fraction of the font size.
pub(crate) const GLYPH_ADVANCE: f32 = 0.5;

/// A positioned run of shown text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// The decoded text.
    pub text: String,
    /// Horizontal position of the first glyph, in page units.
    pub x: f32,
    /// Baseline vertical position, in page units.
    pub y: f32,
    /// Active font size when the run was shown.
    pub font_size: f32,
}

#[derive(Debug)]
struct Cursor {
    x: f32,
    y: f32,
    line_x: f32,
    line_y: f32,
    font_size: f32,
    leading: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            line_x: 0.0,
            line_y: 0.0,
            font_size: 12.0,
            leading: 14.0,
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_x += tx;
        self.line_y += ty;
        self.x = self.line_x;
        self.y = self.line_y;
    }

    fn next_line(&mut self) {
        self.line_y -= self.leading;
        self.x = self.line_x;
        self.y = self.line_y;
    }

    fn advance(&mut self, glyphs: usize) {
        #[allow(clippy::cast_precision_loss)]
        let n = glyphs as f32;
        self.x += n * GLYPH_ADVANCE * self.font_size;
    }
}

fn number(object: &Object) -> Option<f32> {
    match object {
        #[allow(clippy::cast_precision_loss)]
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

fn string_text(object: &Object) -> Option<String> {
    match object {
        Object::String(bytes, _) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}

/// Walk a decoded content stream and collect positioned text runs.
///
/// A `TJ` array is collapsed into a single run; its kerning adjustments move
/// the cursor but do not split the text, so terms spanning kerned fragments
/// still match.
#[must_use]
pub fn text_runs(content: &Content) -> Vec<TextRun> {
    let mut runs = Vec::new();
    let mut cursor = Cursor::new();

    for operation in &content.operations {
        let operands = &operation.operands;
        match operation.operator.as_str() {
            "BT" => cursor = Cursor::new(),
            "Tf" => {
                if let Some(size) = operands.last().and_then(number) {
                    cursor.font_size = size;
                }
            }
            "Td" | "TD" => {
                if operands.len() >= 2 {
                    let tx = number(&operands[0]).unwrap_or(0.0);
                    let ty = number(&operands[1]).unwrap_or(0.0);
                    if operation.operator == "TD" {
                        cursor.leading = -ty;
                    }
                    cursor.move_line(tx, ty);
                }
            }
            "Tm" => {
                if operands.len() >= 6 {
                    let e = number(&operands[4]).unwrap_or(0.0);
                    let f = number(&operands[5]).unwrap_or(0.0);
                    cursor.line_x = e;
                    cursor.line_y = f;
                    cursor.x = e;
                    cursor.y = f;
                }
            }
            "TL" => {
                if let Some(leading) = operands.first().and_then(number) {
                    cursor.leading = leading;
                }
            }
            "T*" => cursor.next_line(),
            "Tj" => {
                if let Some(text) = operands.first().and_then(string_text) {
                    push_run(&mut runs, &mut cursor, text);
                }
            }
            "'" => {
                cursor.next_line();
                if let Some(text) = operands.first().and_then(string_text) {
                    push_run(&mut runs, &mut cursor, text);
                }
            }
            "\"" => {
                cursor.next_line();
                if let Some(text) = operands.last().and_then(string_text) {
                    push_run(&mut runs, &mut cursor, text);
                }
            }
            "TJ" => {
                if let Some(Object::Array(elements)) = operands.first() {
                    let start_x = cursor.x;
                    let mut text = String::new();
                    for element in elements {
                        if let Some(fragment) = string_text(element) {
                            cursor.advance(fragment.chars().count());
                            text.push_str(&fragment);
                        } else if let Some(adjustment) = number(element) {
                            cursor.x -= adjustment / 1000.0 * cursor.font_size;
                        }
                    }
                    if !text.is_empty() {
                        runs.push(TextRun {
                            text,
                            x: start_x,
                            y: cursor.y,
                            font_size: cursor.font_size,
                        });
                    }
                }
            }
            _ => {}
        }
    }

    runs
}

fn push_run(runs: &mut Vec<TextRun>, cursor: &mut Cursor, text: String) {
    let run = TextRun {
        x: cursor.x,
        y: cursor.y,
        font_size: cursor.font_size,
        text,
    };
    cursor.advance(run.text.chars().count());
    runs.push(run);
}

/// Join runs into plain text, inserting newlines on baseline changes.
#[must_use]
pub fn extract_text(runs: &[TextRun]) -> String {
    let mut text = String::new();
    let mut last_y: Option<f32> = None;

    for run in runs {
        match last_y {
            None => {}
            Some(y) if (y - run.y).abs() > 0.5 => text.push('\n'),
            Some(_) => {
                if !text.ends_with(char::is_whitespace) {
                    text.push(' ');
                }
            }
        }
        text.push_str(&run.text);
        last_y = Some(run.y);
    }

    text
}

/// Group runs into visual lines, ordered top of page to bottom.
#[must_use]
pub fn page_lines(runs: &[TextRun]) -> Vec<String> {
    let mut lines: Vec<(f32, String)> = Vec::new();

    for run in runs {
        match lines.last_mut() {
            Some((y, line)) if (*y - run.y).abs() <= 0.5 => {
                if !line.is_empty() && !line.ends_with(char::is_whitespace) {
                    line.push(' ');
                }
                line.push_str(&run.text);
            }
            _ => lines.push((run.y, run.text.clone())),
        }
    }

    lines.into_iter().map(|(_, line)| line).collect()
}

/// Blank every occurrence of every term inside the show operators of a
/// content stream, replacing matched bytes with spaces of equal count.
///
/// Glyph positions are untouched, so the page layout is preserved while the
/// glyphs themselves are gone from the stream. A `TJ` array is blanked
/// against its concatenated text, the same view [`text_runs`] matches
/// against, so a term split across kerned fragments is removed too. Terms
/// split across separate show operators are not matched. Returns the number
/// of occurrences blanked.
pub fn blank_terms(content: &mut Content, terms: &BTreeSet<String>) -> usize {
    let mut blanked = 0;

    for operation in &mut content.operations {
        match operation.operator.as_str() {
            "Tj" | "'" | "\"" => {
                if let Some(object) = operation.operands.last_mut() {
                    blanked += blank_object(object, terms);
                }
            }
            "TJ" => {
                if let Some(Object::Array(elements)) = operation.operands.first_mut() {
                    blanked += blank_array(elements, terms);
                }
            }
            _ => {}
        }
    }

    blanked
}

/// Replace every term occurrence with one space per byte, keeping offsets
/// stable for callers that map the text back onto string fragments.
fn blank_text(text: &mut String, terms: &BTreeSet<String>) -> usize {
    let mut blanked = 0;
    for term in terms {
        if term.is_empty() {
            continue;
        }
        while let Some(index) = text.find(term.as_str()) {
            let spaces = " ".repeat(term.len());
            text.replace_range(index..index + term.len(), &spaces);
            blanked += 1;
        }
    }
    blanked
}

fn blank_object(object: &mut Object, terms: &BTreeSet<String>) -> usize {
    let Object::String(bytes, _) = object else {
        return 0;
    };
    let Ok(text) = std::str::from_utf8(bytes) else {
        // Non-UTF8 strings use a custom font encoding we cannot match into.
        return 0;
    };

    let mut text = text.to_string();
    let blanked = blank_text(&mut text, terms);
    if blanked > 0 {
        *bytes = text.into_bytes();
    }
    blanked
}

/// Blank the string elements of a `TJ` array against their concatenated
/// text. Kerning numbers keep a group of fragments together; an undecodable
/// string ends the group, since nothing can match across it anyway.
fn blank_array(elements: &mut [Object], terms: &BTreeSet<String>) -> usize {
    let mut blanked = 0;
    let mut group: Vec<usize> = Vec::new();

    for index in 0..=elements.len() {
        match elements.get(index) {
            Some(Object::String(bytes, _)) if std::str::from_utf8(bytes).is_ok() => {
                group.push(index);
            }
            Some(Object::String(_, _)) | None => {
                blanked += blank_group(elements, &group, terms);
                group.clear();
            }
            Some(_) => {}
        }
    }

    blanked
}

fn blank_group(elements: &mut [Object], group: &[usize], terms: &BTreeSet<String>) -> usize {
    if group.is_empty() {
        return 0;
    }

    let mut concat = String::new();
    let mut offsets = Vec::with_capacity(group.len());
    for &index in group {
        if let Object::String(bytes, _) = &elements[index] {
            offsets.push(concat.len());
            concat.push_str(std::str::from_utf8(bytes).unwrap_or_default());
        }
    }

    let blanked = blank_text(&mut concat, terms);
    if blanked == 0 {
        return 0;
    }

    // blank_text is byte-for-byte, so the original offsets still hold.
    for (&start, &index) in offsets.iter().zip(group) {
        if let Object::String(bytes, _) = &mut elements[index] {
            let end = start + bytes.len();
            *bytes = concat[start..end].as_bytes().to_vec();
        }
    }
    blanked
}
