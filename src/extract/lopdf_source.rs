//! lopdf-backed [`BlockSource`] implementation.
//!
//! Walks page content streams with a text matrix to recover positioned
//! spans, groups them into lines and blocks by baseline and spacing
//! heuristics, and reports block bounding boxes in top-left-origin page
//! coordinates (PDF user space is bottom-up, so the Y axis is flipped
//! against the page height before boxes leave this module).

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::BoundingBox;

use super::source::{BlockSource, RawBlock, RawLine, RawSpan};

/// Default page size when MediaBox is absent (US Letter).
const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// A decoded span in PDF (bottom-up) coordinates.
#[derive(Debug, Clone)]
struct Span {
    text: String,
    x: f32,
    /// Baseline Y
    y: f32,
    font_size: f32,
}

impl Span {
    /// Estimated advance width, from average glyph width.
    fn width(&self) -> f32 {
        self.font_size * 0.5 * self.text.chars().count() as f32
    }

    /// Approximate ascender height above the baseline.
    fn top(&self) -> f32 {
        self.y + self.font_size * 0.8
    }

    /// Approximate descender depth below the baseline.
    fn bottom(&self) -> f32 {
        self.y - self.font_size * 0.2
    }
}

/// A line of spans on a shared baseline.
#[derive(Debug, Clone)]
struct Line {
    spans: Vec<Span>,
    x: f32,
    y: f32,
}

impl Line {
    fn from_spans(mut spans: Vec<Span>) -> Self {
        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
        let x = spans.first().map(|s| s.x).unwrap_or(0.0);
        let y = spans.first().map(|s| s.y).unwrap_or(0.0);
        Self { spans, x, y }
    }

    /// Assemble line text, inserting spaces at span boundaries where the
    /// adjacent span texts do not already carry whitespace.
    fn text(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            if !out.is_empty()
                && !out.ends_with(char::is_whitespace)
                && !span.text.starts_with(char::is_whitespace)
            {
                out.push(' ');
            }
            out.push_str(&span.text);
        }
        out
    }
}

/// Concrete [`BlockSource`] backed by `lopdf::Document`.
///
/// Owns an exclusive document handle for the duration of a parse; the
/// handle is released when the source is dropped.
pub struct LopdfSource {
    doc: LopdfDocument,
}

impl LopdfSource {
    /// Load from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path).map_err(load_error)?;
        Ok(Self { doc })
    }

    /// Load from an in-memory byte buffer.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data).map_err(load_error)?;
        Ok(Self { doc })
    }

    /// PDF version string reported by the engine.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    fn page_id(&self, page_number: u32) -> Result<ObjectId> {
        let pages = self.doc.get_pages();
        pages
            .get(&page_number)
            .copied()
            .ok_or(Error::PageOutOfRange(page_number, pages.len() as u32))
    }

    /// Decompressed content stream bytes for a page.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::Corrupt(e.to_string()))?;

        let contents = match page_dict.get(b"Contents") {
            Ok(c) => c,
            // A page with no content stream is legitimately blank
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    return s
                        .decompressed_content()
                        .map_err(|e| Error::Corrupt(e.to_string()));
                }
                Err(Error::Corrupt("invalid content stream".to_string()))
            }
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            if let Ok(data) = s.decompressed_content() {
                                content.extend_from_slice(&data);
                                content.push(b' ');
                            }
                        }
                    }
                }
                Ok(content)
            }
            Object::Stream(s) => s
                .decompressed_content()
                .map_err(|e| Error::Corrupt(e.to_string())),
            _ => Err(Error::Corrupt("invalid content stream".to_string())),
        }
    }

    /// Extract positioned spans from a page's content stream.
    fn extract_spans(&self, page_id: ObjectId) -> Result<Vec<Span>> {
        let lopdf_fonts: BTreeMap<Vec<u8>, &lopdf::Dictionary> =
            self.doc.get_page_fonts(page_id).unwrap_or_default();

        let data = self.page_content(page_id)?;
        if data.is_empty() {
            return Ok(Vec::new());
        }

        let content = lopdf::content::Content::decode(&data)
            .map_err(|e| Error::Corrupt(e.to_string()))?;

        let mut spans = Vec::new();
        let mut current_font_name: Vec<u8> = Vec::new();
        let mut current_font_size: f32 = 12.0;
        let mut matrix = TextMatrix::default();
        let mut in_text = false;

        for op in content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text = true;
                    matrix = TextMatrix::default();
                }
                "ET" => in_text = false,
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(name) = &op.operands[0] {
                            current_font_name = name.clone();
                        }
                        current_font_size = number(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = number(&op.operands[0]).unwrap_or(0.0);
                        let ty = number(&op.operands[1]).unwrap_or(0.0);
                        matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        matrix.set(
                            number(&op.operands[0]).unwrap_or(1.0),
                            number(&op.operands[1]).unwrap_or(0.0),
                            number(&op.operands[2]).unwrap_or(0.0),
                            number(&op.operands[3]).unwrap_or(1.0),
                            number(&op.operands[4]).unwrap_or(0.0),
                            number(&op.operands[5]).unwrap_or(0.0),
                        );
                    }
                }
                "T*" => matrix.next_line(),
                "Tj" | "TJ" => {
                    if in_text {
                        let text = self.decode_show_text(&op, &current_font_name, &lopdf_fonts);
                        self.push_span(&mut spans, text, &matrix, current_font_size);
                    }
                }
                "'" | "\"" => {
                    matrix.next_line();
                    if in_text {
                        let text_idx = if op.operator == "\"" { 2 } else { 0 };
                        if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                            let text =
                                self.decode_string(&current_font_name, &lopdf_fonts, bytes);
                            self.push_span(&mut spans, text, &matrix, current_font_size);
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(spans)
    }

    fn push_span(&self, spans: &mut Vec<Span>, text: String, matrix: &TextMatrix, size: f32) {
        if text.trim().is_empty() {
            return;
        }
        let (x, y) = matrix.position();
        spans.push(Span {
            text,
            x,
            y,
            font_size: size * matrix.scale(),
        });
    }

    /// Decode the string payload of a Tj/TJ operation.
    fn decode_show_text(
        &self,
        op: &lopdf::content::Operation,
        font_name: &[u8],
        fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    ) -> String {
        if op.operator == "TJ" {
            // TJ interleaves strings with kerning adjustments in 1/1000 text
            // space units; large negative adjustments stand in for word spaces
            let mut combined = String::new();
            if let Some(Object::Array(arr)) = op.operands.first() {
                for item in arr {
                    match item {
                        Object::String(bytes, _) => {
                            combined.push_str(&self.decode_string(font_name, fonts, bytes));
                        }
                        Object::Integer(n) => {
                            if (-(*n as f32)) > 200.0 && needs_space(&combined) {
                                combined.push(' ');
                            }
                        }
                        Object::Real(n) => {
                            if -n > 200.0 && needs_space(&combined) {
                                combined.push(' ');
                            }
                        }
                        _ => {}
                    }
                }
            }
            combined
        } else if let Some(Object::String(bytes, _)) = op.operands.first() {
            self.decode_string(font_name, fonts, bytes)
        } else {
            String::new()
        }
    }

    /// Decode text bytes through the page font encoding, with fallbacks.
    fn decode_string(
        &self,
        font_name: &[u8],
        fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
        bytes: &[u8],
    ) -> String {
        if let Some(font_dict) = fonts.get(font_name) {
            if let Ok(enc) = font_dict.get_font_encoding(&self.doc) {
                if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                    return text;
                }
            }
        }
        decode_text_simple(bytes)
    }

    /// Group spans into lines by baseline proximity, then lines into blocks
    /// by vertical spacing and indentation shifts.
    fn assemble_blocks(&self, spans: Vec<Span>, page_height: f32) -> Vec<RawBlock> {
        let lines = group_spans_into_lines(spans);
        if lines.is_empty() {
            return Vec::new();
        }

        let avg_spacing = average_line_spacing(&lines);

        let mut blocks: Vec<Vec<Line>> = Vec::new();
        let mut current: Vec<Line> = Vec::new();

        for line in lines {
            if let Some(prev) = current.last() {
                let spacing = (prev.y - line.y).abs();
                let indent_shift = (prev.x - line.x).abs();
                if spacing > avg_spacing * 1.5 || indent_shift > 20.0 {
                    blocks.push(std::mem::take(&mut current));
                }
            }
            current.push(line);
        }
        if !current.is_empty() {
            blocks.push(current);
        }

        blocks
            .into_iter()
            .filter_map(|lines| self.lines_to_raw_block(lines, page_height))
            .collect()
    }

    fn lines_to_raw_block(&self, lines: Vec<Line>, page_height: f32) -> Option<RawBlock> {
        let spans: Vec<&Span> = lines.iter().flat_map(|l| l.spans.iter()).collect();
        if spans.is_empty() {
            return None;
        }

        let x0 = spans.iter().map(|s| s.x).fold(f32::MAX, f32::min);
        let x1 = spans.iter().map(|s| s.x + s.width()).fold(f32::MIN, f32::max);
        let top = spans.iter().map(|s| s.top()).fold(f32::MIN, f32::max);
        let bottom = spans.iter().map(|s| s.bottom()).fold(f32::MAX, f32::min);

        // Flip from bottom-up PDF space into top-left-origin page space
        let bbox = BoundingBox::new(x0, page_height - top, x1, page_height - bottom);

        let raw_lines = lines
            .iter()
            .map(|l| RawLine {
                spans: vec![RawSpan { text: l.text() }],
            })
            .collect();

        Some(RawBlock {
            kind: super::source::RawBlockKind::Text,
            bbox,
            lines: raw_lines,
        })
    }
}

impl BlockSource for LopdfSource {
    fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    fn page_size(&self, page_number: u32) -> Result<(f32, f32)> {
        let page_id = self.page_id(page_number)?;

        if let Ok(page_dict) = self.doc.get_dictionary(page_id) {
            if let Ok(media_box) = page_dict.get(b"MediaBox") {
                if let Ok(array) = media_box.as_array() {
                    if array.len() >= 4 {
                        let width = array[2].as_float().unwrap_or(DEFAULT_PAGE_SIZE.0);
                        let height = array[3].as_float().unwrap_or(DEFAULT_PAGE_SIZE.1);
                        return Ok((width, height));
                    }
                }
            }
        }

        Ok(DEFAULT_PAGE_SIZE)
    }

    fn blocks_for_page(&self, page_number: u32) -> Result<Vec<RawBlock>> {
        let page_id = self.page_id(page_number)?;
        let (_, height) = self.page_size(page_number)?;
        let spans = self.extract_spans(page_id)?;
        Ok(self.assemble_blocks(spans, height))
    }

    fn metadata(&self) -> HashMap<String, String> {
        let mut metadata = HashMap::new();
        metadata.insert("pdf_version".to_string(), self.version());

        if let Ok(info) = self.doc.trailer.get(b"Info") {
            if let Ok(info_ref) = info.as_reference() {
                if let Ok(info_dict) = self.doc.get_dictionary(info_ref) {
                    let fields: [(&str, &[u8]); 6] = [
                        ("title", b"Title"),
                        ("author", b"Author"),
                        ("subject", b"Subject"),
                        ("keywords", b"Keywords"),
                        ("creator", b"Creator"),
                        ("producer", b"Producer"),
                    ];
                    for (key, dict_key) in fields {
                        if let Some(value) = string_from_dict(info_dict, dict_key) {
                            metadata.insert(key.to_string(), value);
                        }
                    }
                    if let Some(date) =
                        string_from_dict(info_dict, b"CreationDate").and_then(|s| parse_pdf_date(&s))
                    {
                        metadata.insert("created".to_string(), date.to_rfc3339());
                    }
                    if let Some(date) =
                        string_from_dict(info_dict, b"ModDate").and_then(|s| parse_pdf_date(&s))
                    {
                        metadata.insert("modified".to_string(), date.to_rfc3339());
                    }
                }
            }
        }

        metadata
    }
}

fn load_error(err: lopdf::Error) -> Error {
    match err {
        lopdf::Error::IO(e) => Error::Io(e),
        lopdf::Error::Decryption(_) => Error::Corrupt("document is encrypted".to_string()),
        _ => Error::Corrupt(err.to_string()),
    }
}

fn needs_space(s: &str) -> bool {
    !s.is_empty() && !s.ends_with(' ') && !s.ends_with('\u{00A0}')
}

/// Sort spans top-to-bottom and group those within a baseline tolerance.
fn group_spans_into_lines(mut spans: Vec<Span>) -> Vec<Line> {
    if spans.is_empty() {
        return Vec::new();
    }

    // PDF Y is bottom-up, so descending Y reads top to bottom
    spans.sort_by(|a, b| {
        let y_cmp = b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal);
        if y_cmp == std::cmp::Ordering::Equal {
            a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
        } else {
            y_cmp
        }
    });

    let mut lines: Vec<Line> = Vec::new();
    let mut current: Vec<Span> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let tolerance = span.font_size * 0.3;
        match current_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(Line::from_spans(std::mem::take(&mut current)));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }
    if !current.is_empty() {
        lines.push(Line::from_spans(current));
    }

    lines
}

fn average_line_spacing(lines: &[Line]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[0].y - w[1].y).abs())
        .filter(|s| *s > 0.1)
        .collect();

    if spacings.is_empty() {
        return 12.0;
    }
    spacings.iter().sum::<f32>() / spacings.len() as f32
}

/// Text matrix for tracking position in a content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        // Default leading; TL is not tracked
        self.f -= 12.0 * self.d;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Simple text decoding fallback when no font encoding is available.
fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

/// Helper to get a string from a PDF dictionary.
fn string_from_dict(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key).ok().and_then(|obj| match obj {
        Object::String(bytes, _) => {
            let text = decode_text_simple(bytes);
            let text = text.trim();
            if text.is_empty() {
                None
            } else {
                Some(text.to_string())
            }
        }
        Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    })
}

/// Parse a PDF date string (D:YYYYMMDDHHmmSS...).
fn parse_pdf_date(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    let s = s.strip_prefix("D:")?;
    if s.len() < 4 {
        return None;
    }

    let year: i32 = s.get(0..4)?.parse().ok()?;
    let month: u32 = s.get(4..6).and_then(|m| m.parse().ok()).unwrap_or(1);
    let day: u32 = s.get(6..8).and_then(|d| d.parse().ok()).unwrap_or(1);
    let hour: u32 = s.get(8..10).and_then(|h| h.parse().ok()).unwrap_or(0);
    let minute: u32 = s.get(10..12).and_then(|m| m.parse().ok()).unwrap_or(0);
    let second: u32 = s.get(12..14).and_then(|s| s.parse().ok()).unwrap_or(0);

    chrono::NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .map(|dt| chrono::DateTime::from_naive_utc_and_offset(dt, chrono::Utc))
}
