//! Document engine abstraction.
//!
//! Extraction consumes a [`BlockSource`] rather than a concrete PDF library,
//! so any backend that can report pages and positioned raw blocks can be
//! substituted without touching the filtering or chunking logic.

use std::collections::HashMap;

use crate::error::Result;
use crate::model::BoundingBox;

/// Discriminator for raw block content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawBlockKind {
    /// A block of text lines
    Text,
    /// An image or other non-text content
    Image,
}

/// A text span inside a raw line.
#[derive(Debug, Clone)]
pub struct RawSpan {
    /// Span text as decoded by the engine
    pub text: String,
}

/// A line of spans inside a raw block.
#[derive(Debug, Clone)]
pub struct RawLine {
    /// Spans in reading order
    pub spans: Vec<RawSpan>,
}

impl RawLine {
    /// Concatenated span text.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// A positioned block as reported by the engine, before filtering.
#[derive(Debug, Clone)]
pub struct RawBlock {
    /// Text or non-text
    pub kind: RawBlockKind,

    /// Bounding rectangle in top-left-origin page coordinates
    pub bbox: BoundingBox,

    /// Lines of text; empty for non-text blocks
    pub lines: Vec<RawLine>,
}

impl RawBlock {
    /// Create a text block from line strings.
    pub fn text(bbox: BoundingBox, lines: Vec<String>) -> Self {
        Self {
            kind: RawBlockKind::Text,
            bbox,
            lines: lines
                .into_iter()
                .map(|text| RawLine {
                    spans: vec![RawSpan { text }],
                })
                .collect(),
        }
    }

    /// Create a non-text block.
    pub fn image(bbox: BoundingBox) -> Self {
        Self {
            kind: RawBlockKind::Image,
            bbox,
            lines: Vec::new(),
        }
    }

    /// Newline-joined line text, trimmed.
    pub fn joined_text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text())
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }
}

/// Capability interface for document engines.
///
/// Implementations own an exclusive document handle; a source must not be
/// shared across concurrent extractions. Bounding boxes are expected in
/// top-left-origin page coordinates (`y0` near the top of the page).
pub trait BlockSource {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Page dimensions as (width, height) in page units.
    fn page_size(&self, page_number: u32) -> Result<(f32, f32)>;

    /// Raw positioned blocks for a page, in reading order.
    fn blocks_for_page(&self, page_number: u32) -> Result<Vec<RawBlock>>;

    /// Document-level metadata (title, author, etc.).
    fn metadata(&self) -> HashMap<String, String> {
        HashMap::new()
    }
}
