//! Data model for extraction and chunking results.
//!
//! [`ParsedDocument`] is the immutable output of extraction; [`TextChunk`]
//! is the retrieval unit produced from it, carrying page range, bounding
//! rectangle, and exact character offsets for source highlighting.

mod bbox;
mod block;
mod chunk;
mod document;

pub use bbox::BoundingBox;
pub use block::{PageContent, TextBlock};
pub use chunk::TextChunk;
pub use document::ParsedDocument;
