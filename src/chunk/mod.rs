//! Assembly of filtered blocks into overlap-aware, size-bounded chunks.
//!
//! [`ChunkAssembler`] consumes a [`ParsedDocument`] and emits ordered
//! [`TextChunk`]s. Blocks are never split mid-block: chunk boundaries snap
//! to whole blocks so that bounding-box unions and character offsets stay
//! exact. Overlap between consecutive chunks is carried over as the trailing
//! characters of the closed chunk plus the blocks that contributed them.

use crate::error::{Error, Result};
use crate::model::{BoundingBox, ParsedDocument, TextBlock, TextChunk};

/// Character count, the default length function.
fn char_count(s: &str) -> usize {
    s.chars().count()
}

/// Options controlling chunk sizing and overlap.
#[derive(Debug, Clone)]
pub struct ChunkOptions {
    /// Target maximum chunk size, measured by `length_fn`
    pub chunk_size: usize,

    /// Characters carried over between consecutive chunks.
    /// Zero disables carry-over entirely.
    pub chunk_overlap: usize,

    /// Separator inserted between blocks within a chunk
    pub separator: String,

    /// Length function used to gate chunk size (character count by default)
    pub length_fn: fn(&str) -> usize,
}

impl ChunkOptions {
    /// Create options with defaults (500 / 50 / newline / character count).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target chunk size.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks.
    pub fn with_chunk_overlap(mut self, overlap: usize) -> Self {
        self.chunk_overlap = overlap;
        self
    }

    /// Set the block separator.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Set the length function.
    pub fn with_length_fn(mut self, length_fn: fn(&str) -> usize) -> Self {
        self.length_fn = length_fn;
        self
    }

    /// Validate the configuration.
    ///
    /// Overlap is unsigned, so the negative case is unrepresentable; the
    /// remaining invalid states are a zero chunk size and an overlap that
    /// is not strictly smaller than the chunk size.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::Config(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
            separator: "\n".to_string(),
            length_fn: char_count,
        }
    }
}

/// Assembles a parsed document into retrieval chunks with provenance.
pub struct ChunkAssembler {
    options: ChunkOptions,
}

impl ChunkAssembler {
    /// Create an assembler with default options.
    pub fn new() -> Self {
        Self::with_options(ChunkOptions::default())
    }

    /// Create an assembler with the given options.
    pub fn with_options(options: ChunkOptions) -> Self {
        Self { options }
    }

    /// Split a document into ordered chunks.
    ///
    /// Fails eagerly with [`Error::Config`] on an invalid configuration;
    /// otherwise never fails — an empty document yields an empty list.
    pub fn chunk(&self, document: &ParsedDocument) -> Result<Vec<TextChunk>> {
        self.options.validate()?;

        let sep = self.options.separator.as_str();
        let sep_len = sep.chars().count();
        let blocks = global_offsets(document, sep_len);
        if blocks.is_empty() {
            log::debug!("no blocks to chunk");
            return Ok(Vec::new());
        }

        let mut chunks: Vec<TextChunk> = Vec::new();
        let mut buffer = String::new();
        let mut contributing: Vec<(&TextBlock, usize)> = Vec::new();

        for &(block, offset) in &blocks {
            let candidate = if buffer.is_empty() {
                block.text.clone()
            } else {
                format!("{buffer}{sep}{}", block.text)
            };

            if (self.options.length_fn)(&candidate) > self.options.chunk_size
                && !buffer.is_empty()
            {
                chunks.push(self.close_chunk(&buffer, chunks.len(), &contributing));

                // Seed the next buffer from the overlap tail of the chunk
                // just closed, then append the pending block
                let (overlap_text, overlap_blocks) = self.overlap_tail(&buffer, &contributing);
                buffer = if overlap_text.is_empty() {
                    block.text.clone()
                } else {
                    format!("{overlap_text}{sep}{}", block.text)
                };
                contributing = overlap_blocks;
                contributing.push((block, offset));
            } else {
                buffer = candidate;
                contributing.push((block, offset));
            }
        }

        if !buffer.is_empty() {
            chunks.push(self.close_chunk(&buffer, chunks.len(), &contributing));
        }

        log::info!("assembled {} chunks from {} blocks", chunks.len(), blocks.len());
        Ok(chunks)
    }

    /// Derive a chunk's provenance fields from its contributing blocks.
    fn close_chunk(
        &self,
        content: &str,
        chunk_index: usize,
        contributing: &[(&TextBlock, usize)],
    ) -> TextChunk {
        debug_assert!(!contributing.is_empty());

        let primary_page = contributing[0].0.page_number;
        let start_page = contributing
            .iter()
            .map(|(b, _)| b.page_number)
            .min()
            .unwrap_or(primary_page);
        let end_page = contributing
            .iter()
            .map(|(b, _)| b.page_number)
            .max()
            .unwrap_or(primary_page);

        // Union restricted to the primary page, so a highlight rectangle
        // never spans page boundaries
        let bbox = BoundingBox::union_all(
            contributing
                .iter()
                .filter(|(b, _)| b.page_number == primary_page)
                .map(|(b, _)| &b.bbox),
        );

        let start_char = contributing[0].1;
        let (last_block, last_offset) = contributing[contributing.len() - 1];
        let end_char = last_offset + last_block.char_len();

        TextChunk {
            content: content.to_string(),
            chunk_index,
            page_number: primary_page,
            start_page,
            end_page,
            bbox,
            start_char,
            end_char,
            source_block_indices: contributing.iter().map(|(b, _)| b.block_index).collect(),
        }
    }

    /// Compute the overlap carried into the next chunk: the trailing
    /// `chunk_overlap` characters of the closed buffer, plus the blocks
    /// (walked from the end) whose accumulated length covers that window.
    fn overlap_tail<'a>(
        &self,
        buffer: &str,
        contributing: &[(&'a TextBlock, usize)],
    ) -> (String, Vec<(&'a TextBlock, usize)>) {
        if self.options.chunk_overlap == 0 || buffer.is_empty() {
            return (String::new(), Vec::new());
        }

        let buffer_len = buffer.chars().count();
        let overlap_text: String = if buffer_len > self.options.chunk_overlap {
            let skip = buffer_len - self.options.chunk_overlap;
            buffer.chars().skip(skip).collect()
        } else {
            buffer.to_string()
        };

        let sep_len = self.options.separator.chars().count();
        let mut carried: Vec<(&TextBlock, usize)> = Vec::new();
        let mut accumulated = 0;

        for &(block, offset) in contributing.iter().rev() {
            if accumulated >= self.options.chunk_overlap {
                break;
            }
            if !carried.is_empty() {
                accumulated += sep_len;
            }
            accumulated += block.char_len();
            carried.push((block, offset));
        }
        carried.reverse();

        (overlap_text, carried)
    }
}

impl Default for ChunkAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Flatten all pages' blocks into one global ordered sequence, assigning
/// each block its document-global starting character offset: the running
/// sum of prior blocks' text lengths plus one separator per prior block.
fn global_offsets(document: &ParsedDocument, separator_len: usize) -> Vec<(&TextBlock, usize)> {
    let mut out = Vec::new();
    let mut offset = 0;
    for block in document.all_blocks() {
        out.push((block, offset));
        offset += block.char_len() + separator_len;
    }
    out
}
