//! Retrieval chunk type with provenance.

use super::BoundingBox;
use serde::{Deserialize, Serialize};

/// A retrieval-sized span of filtered document text with provenance.
///
/// Chunks are independent, immutable values: they own their content and
/// remain valid after the originating [`ParsedDocument`] is dropped.
/// `source_block_indices` is a lookup-only relation for traceability,
/// never an ownership edge.
///
/// [`ParsedDocument`]: super::ParsedDocument
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextChunk {
    /// The chunk text
    pub content: String,

    /// Zero-based index, strictly increasing by 1 per document
    pub chunk_index: usize,

    /// Primary page: the page of the first contributing block
    pub page_number: u32,

    /// Smallest page number among contributing blocks
    pub start_page: u32,

    /// Largest page number among contributing blocks
    pub end_page: u32,

    /// Union of contributing blocks' boxes on the primary page;
    /// `None` if no contributing block lies on the primary page
    pub bbox: Option<BoundingBox>,

    /// Document-global character offset of the first contributing block
    pub start_char: usize,

    /// Global offset of the last contributing block plus its text length
    pub end_char: usize,

    /// Per-page `block_index` values of the contributing blocks, in order
    pub source_block_indices: Vec<usize>,
}

impl TextChunk {
    /// Length of the chunk content in characters.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Pages this chunk spans, inclusive.
    pub fn page_range(&self) -> std::ops::RangeInclusive<u32> {
        self.start_page..=self.end_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_serialization_shape() {
        let chunk = TextChunk {
            content: "hello world".to_string(),
            chunk_index: 0,
            page_number: 1,
            start_page: 1,
            end_page: 2,
            bbox: Some(BoundingBox::new(10.0, 60.0, 200.0, 90.0)),
            start_char: 0,
            end_char: 11,
            source_block_indices: vec![0, 1],
        };

        let json = serde_json::to_value(&chunk).unwrap();
        assert_eq!(json["content"], "hello world");
        assert_eq!(json["chunk_index"], 0);
        assert_eq!(json["page_number"], 1);
        assert_eq!(json["bbox"]["x0"], 10.0);
        assert_eq!(json["source_block_indices"][1], 1);
    }

    #[test]
    fn test_chunk_null_bbox() {
        let chunk = TextChunk {
            content: "x".to_string(),
            chunk_index: 3,
            page_number: 2,
            start_page: 2,
            end_page: 2,
            bbox: None,
            start_char: 40,
            end_char: 41,
            source_block_indices: vec![5],
        };

        let json = serde_json::to_value(&chunk).unwrap();
        assert!(json["bbox"].is_null());
    }

    #[test]
    fn test_page_range() {
        let chunk = TextChunk {
            content: String::new(),
            chunk_index: 0,
            page_number: 2,
            start_page: 2,
            end_page: 4,
            bbox: None,
            start_char: 0,
            end_char: 0,
            source_block_indices: vec![],
        };
        assert_eq!(chunk.page_range().collect::<Vec<_>>(), vec![2, 3, 4]);
    }
}
