//! Document-level types.

use super::{PageContent, TextBlock};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A parsed document: the immutable result of extraction.
///
/// Created once per parse and never mutated. Owns its page/block tree
/// exclusively; chunks produced from it hold no references back into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Engine-reported page count
    pub page_count: u32,

    /// Pages in order. Pages with zero surviving blocks are kept,
    /// with empty `full_text`.
    pub pages: Vec<PageContent>,

    /// Document-level metadata (title, author, etc.), opaque key/value pairs
    pub metadata: HashMap<String, String>,
}

impl ParsedDocument {
    /// Create a document with the given page count and metadata.
    pub fn new(page_count: u32, metadata: HashMap<String, String>) -> Self {
        Self {
            page_count,
            pages: Vec::with_capacity(page_count as usize),
            metadata,
        }
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_number: u32) -> Option<&PageContent> {
        if page_number == 0 {
            return None;
        }
        self.pages.get((page_number - 1) as usize)
    }

    /// Iterate all surviving blocks across pages, in global reading order.
    pub fn all_blocks(&self) -> impl Iterator<Item = &TextBlock> {
        self.pages.iter().flat_map(|p| p.blocks.iter())
    }

    /// Total number of surviving blocks.
    pub fn block_count(&self) -> usize {
        self.pages.iter().map(|p| p.blocks.len()).sum()
    }

    /// All pages' full text joined with blank lines.
    pub fn all_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.full_text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// True if zero blocks survived filtering on every page.
    ///
    /// A successful parse of such a document is not an error; the caller
    /// decides how to treat "nothing to index".
    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(|p| p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    fn page_with_block(page_number: u32, text: &str) -> PageContent {
        let mut page = PageContent::new(page_number, 612.0, 792.0);
        page.blocks.push(TextBlock::new(
            text,
            page_number,
            BoundingBox::new(72.0, 100.0, 300.0, 120.0),
            0,
        ));
        page.full_text = text.to_string();
        page
    }

    #[test]
    fn test_empty_document() {
        let mut doc = ParsedDocument::new(2, HashMap::new());
        doc.pages.push(PageContent::new(1, 612.0, 792.0));
        doc.pages.push(PageContent::new(2, 612.0, 792.0));

        assert!(doc.is_empty());
        assert_eq!(doc.block_count(), 0);
        assert_eq!(doc.all_text(), "\n\n");
    }

    #[test]
    fn test_all_blocks_order() {
        let mut doc = ParsedDocument::new(2, HashMap::new());
        doc.pages.push(page_with_block(1, "first"));
        doc.pages.push(page_with_block(2, "second"));

        let texts: Vec<_> = doc.all_blocks().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(doc.all_text(), "first\n\nsecond");
    }

    #[test]
    fn test_get_page() {
        let mut doc = ParsedDocument::new(1, HashMap::new());
        doc.pages.push(page_with_block(1, "only"));

        assert!(doc.get_page(0).is_none());
        assert_eq!(doc.get_page(1).unwrap().page_number, 1);
        assert!(doc.get_page(2).is_none());
    }
}
