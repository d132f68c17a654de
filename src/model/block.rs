//! Page-level types: positioned text blocks and page content.

use super::BoundingBox;
use serde::{Deserialize, Serialize};

/// A positioned text unit extracted from a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBlock {
    /// The text content (trimmed, lines joined with newlines)
    pub text: String,

    /// Page number (1-indexed)
    pub page_number: u32,

    /// Bounding rectangle in page coordinates (top-left origin)
    pub bbox: BoundingBox,

    /// Zero-based index among surviving blocks on this page,
    /// strictly increasing in reading order
    pub block_index: usize,
}

impl TextBlock {
    /// Create a new text block.
    pub fn new(
        text: impl Into<String>,
        page_number: u32,
        bbox: BoundingBox,
        block_index: usize,
    ) -> Self {
        Self {
            text: text.into(),
            page_number,
            bbox,
            block_index,
        }
    }

    /// Length of the block text in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// One page's extracted content after filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageContent {
    /// Page number (1-indexed)
    pub page_number: u32,

    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Surviving blocks in reading order
    pub blocks: Vec<TextBlock>,

    /// Newline-joined concatenation of the surviving blocks' text.
    /// Empty string for a page with no surviving blocks.
    pub full_text: String,
}

impl PageContent {
    /// Create an empty page with the given dimensions.
    pub fn new(page_number: u32, width: f32, height: f32) -> Self {
        Self {
            page_number,
            width,
            height,
            blocks: Vec::new(),
            full_text: String::new(),
        }
    }

    /// Check if the page has no surviving blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of surviving blocks on the page.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}
