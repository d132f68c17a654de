//! # pdfchunk
//!
//! PDF text extraction with positional provenance and retrieval-ready
//! chunking.
//!
//! The library runs two stages in sequence: [`PageExtractor`] opens a
//! document and yields filtered, positioned text blocks per page;
//! [`ChunkAssembler`] folds those blocks into ordered, size-bounded chunks
//! that retain page range, a unioned bounding rectangle, and exact character
//! offsets — enough for a downstream UI to highlight the source region of a
//! retrieved answer.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfchunk::{parse_file, chunk_document};
//!
//! fn main() -> pdfchunk::Result<()> {
//!     let document = parse_file("report.pdf")?;
//!     let chunks = chunk_document(&document)?;
//!
//!     for chunk in &chunks {
//!         println!(
//!             "chunk {} on page {}: {} chars",
//!             chunk.chunk_index,
//!             chunk.page_number,
//!             chunk.end_char - chunk.start_char
//!         );
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Exact provenance**: every chunk carries page range, bounding box,
//!   and character offsets into the filtered document text
//! - **Noise filtering**: header/footer regions and bare page numbers are
//!   dropped before chunking
//! - **Whole-block snapping**: blocks are never split mid-block, keeping
//!   offsets and boxes exact
//! - **Engine-agnostic**: extraction consumes the [`BlockSource`] trait;
//!   the bundled backend is built on lopdf

pub mod chunk;
pub mod detect;
pub mod error;
pub mod extract;
pub mod model;

pub use chunk::{ChunkAssembler, ChunkOptions};
pub use error::{Error, Result};
pub use extract::{
    BlockSource, ExtractOptions, LopdfSource, PageExtractor, RawBlock, RawBlockKind, RawLine,
    RawSpan,
};
pub use model::{BoundingBox, PageContent, ParsedDocument, TextBlock, TextChunk};

use std::path::Path;

/// Parse a PDF file into a [`ParsedDocument`] with default filtering.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ParsedDocument> {
    PageExtractor::new().parse(path)
}

/// Parse a PDF from bytes with default filtering.
pub fn parse_bytes(data: &[u8]) -> Result<ParsedDocument> {
    PageExtractor::new().parse_bytes(data)
}

/// Chunk a parsed document with default options (500 chars, 50 overlap).
pub fn chunk_document(document: &ParsedDocument) -> Result<Vec<TextChunk>> {
    ChunkAssembler::new().chunk(document)
}

/// Parse and chunk a PDF file in one call, with defaults end to end.
pub fn extract_and_chunk<P: AsRef<Path>>(path: P) -> Result<Vec<TextChunk>> {
    let document = parse_file(path)?;
    chunk_document(&document)
}

/// Builder for configuring the extract + chunk pipeline.
///
/// # Example
///
/// ```no_run
/// use pdfchunk::Pipeline;
///
/// let (document, chunks) = Pipeline::new()
///     .with_chunk_size(800)
///     .with_chunk_overlap(100)
///     .with_header_margin(36.0)
///     .run("report.pdf")?;
/// # Ok::<(), pdfchunk::Error>(())
/// ```
pub struct Pipeline {
    extract_options: ExtractOptions,
    chunk_options: ChunkOptions,
}

impl Pipeline {
    /// Create a pipeline with default options.
    pub fn new() -> Self {
        Self {
            extract_options: ExtractOptions::default(),
            chunk_options: ChunkOptions::default(),
        }
    }

    /// Set the target chunk size.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_options = self.chunk_options.with_chunk_size(size);
        self
    }

    /// Set the overlap between consecutive chunks.
    pub fn with_chunk_overlap(mut self, overlap: usize) -> Self {
        self.chunk_options = self.chunk_options.with_chunk_overlap(overlap);
        self
    }

    /// Set the block separator.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.chunk_options = self.chunk_options.with_separator(separator);
        self
    }

    /// Enable or disable header/footer filtering.
    pub fn with_header_footer_filter(mut self, enabled: bool) -> Self {
        self.extract_options = self.extract_options.with_header_footer_filter(enabled);
        self
    }

    /// Set the header margin in page units.
    pub fn with_header_margin(mut self, margin: f32) -> Self {
        self.extract_options = self.extract_options.with_header_margin(margin);
        self
    }

    /// Set the footer margin in page units.
    pub fn with_footer_margin(mut self, margin: f32) -> Self {
        self.extract_options = self.extract_options.with_footer_margin(margin);
        self
    }

    /// Run the pipeline on a file.
    pub fn run<P: AsRef<Path>>(self, path: P) -> Result<(ParsedDocument, Vec<TextChunk>)> {
        let document = PageExtractor::with_options(self.extract_options).parse(path)?;
        let chunks = ChunkAssembler::with_options(self.chunk_options).chunk(&document)?;
        Ok((document, chunks))
    }

    /// Run the pipeline on an in-memory buffer.
    pub fn run_bytes(self, data: &[u8]) -> Result<(ParsedDocument, Vec<TextChunk>)> {
        let document = PageExtractor::with_options(self.extract_options).parse_bytes(data)?;
        let chunks = ChunkAssembler::with_options(self.chunk_options).chunk(&document)?;
        Ok((document, chunks))
    }

    /// Run extraction and chunking against an already-open [`BlockSource`].
    pub fn run_source(self, source: &dyn BlockSource) -> Result<(ParsedDocument, Vec<TextChunk>)> {
        let document = PageExtractor::with_options(self.extract_options).extract(source)?;
        let chunks = ChunkAssembler::with_options(self.chunk_options).chunk(&document)?;
        Ok((document, chunks))
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bytes_empty_data() {
        let data: [u8; 0] = [];
        let result = parse_bytes(&data);
        assert!(matches!(result, Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_bytes_unknown_magic() {
        let data = b"<!DOCTYPE html><html></html>";
        let result = parse_bytes(data);
        assert!(matches!(result, Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_file_missing() {
        let result = parse_file("no/such/file.pdf");
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_pipeline_builder_defaults() {
        let pipeline = Pipeline::new();
        assert_eq!(pipeline.chunk_options.chunk_size, 500);
        assert_eq!(pipeline.chunk_options.chunk_overlap, 50);
        assert!(pipeline.extract_options.filter_headers_footers);
    }

    #[test]
    fn test_pipeline_builder_chained() {
        let pipeline = Pipeline::new()
            .with_chunk_size(800)
            .with_chunk_overlap(100)
            .with_separator(" ")
            .with_header_footer_filter(false)
            .with_header_margin(36.0)
            .with_footer_margin(24.0);

        assert_eq!(pipeline.chunk_options.chunk_size, 800);
        assert_eq!(pipeline.chunk_options.chunk_overlap, 100);
        assert_eq!(pipeline.chunk_options.separator, " ");
        assert!(!pipeline.extract_options.filter_headers_footers);
        assert_eq!(pipeline.extract_options.header_margin, 36.0);
        assert_eq!(pipeline.extract_options.footer_margin, 24.0);
    }

    #[test]
    fn test_pipeline_invalid_chunk_config_bytes() {
        // Config validation happens after parse; invalid bytes fail first
        let result = Pipeline::new().with_chunk_size(0).run_bytes(b"not a pdf");
        assert!(matches!(result, Err(Error::InvalidFormat(_))));
    }
}
