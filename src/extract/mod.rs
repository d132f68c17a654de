//! Structural extraction of positioned text blocks.
//!
//! [`PageExtractor`] walks a document page by page through a [`BlockSource`],
//! filters out non-text blocks, header/footer regions, and page-number noise,
//! and assembles the survivors into an immutable [`ParsedDocument`].

mod lopdf_source;
mod source;

pub use lopdf_source::LopdfSource;
pub use source::{BlockSource, RawBlock, RawBlockKind, RawLine, RawSpan};

use regex::Regex;

use crate::detect;
use crate::error::Result;
use crate::model::{PageContent, ParsedDocument, TextBlock};

/// Options controlling header/footer and noise filtering.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Whether to drop blocks in the header/footer margins
    pub filter_headers_footers: bool,

    /// Header region height from the top of the page, in page units
    pub header_margin: f32,

    /// Footer region height from the bottom of the page, in page units
    pub footer_margin: f32,
}

impl ExtractOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable header/footer filtering.
    pub fn with_header_footer_filter(mut self, enabled: bool) -> Self {
        self.filter_headers_footers = enabled;
        self
    }

    /// Set the header margin in page units.
    pub fn with_header_margin(mut self, margin: f32) -> Self {
        self.header_margin = margin;
        self
    }

    /// Set the footer margin in page units.
    pub fn with_footer_margin(mut self, margin: f32) -> Self {
        self.footer_margin = margin;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            filter_headers_footers: true,
            header_margin: 50.0,
            footer_margin: 50.0,
        }
    }
}

/// Patterns for bare page-number noise (anchored, case-insensitive).
const NOISE_PATTERNS: [&str; 3] = [r"(?i)^\d+$", r"(?i)^Page \d+", r"(?i)^\d+ of \d+$"];

/// Extracts filtered, positioned text blocks from a document.
pub struct PageExtractor {
    options: ExtractOptions,
    noise_patterns: Vec<Regex>,
}

impl PageExtractor {
    /// Create an extractor with default options.
    pub fn new() -> Self {
        Self::with_options(ExtractOptions::default())
    }

    /// Create an extractor with the given options.
    pub fn with_options(options: ExtractOptions) -> Self {
        let noise_patterns = NOISE_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("noise pattern is a valid regex"))
            .collect();
        Self {
            options,
            noise_patterns,
        }
    }

    /// Parse a PDF file into a [`ParsedDocument`].
    ///
    /// Fails with [`Error::NotFound`] for a missing path,
    /// [`Error::InvalidFormat`] for a non-PDF file, and [`Error::Corrupt`]
    /// if the engine fails on the document structure or any page. The
    /// document handle is scoped to this call and released on every exit
    /// path.
    ///
    /// [`Error::NotFound`]: crate::Error::NotFound
    /// [`Error::InvalidFormat`]: crate::Error::InvalidFormat
    /// [`Error::Corrupt`]: crate::Error::Corrupt
    pub fn parse<P: AsRef<std::path::Path>>(&self, path: P) -> Result<ParsedDocument> {
        let path = path.as_ref();
        detect::ensure_pdf_path(path)?;
        log::info!("parsing PDF: {}", path.display());

        let source = LopdfSource::open(path)?;
        self.extract(&source)
    }

    /// Parse a PDF from an in-memory byte buffer.
    pub fn parse_bytes(&self, data: &[u8]) -> Result<ParsedDocument> {
        detect::ensure_pdf_bytes(data)?;
        let source = LopdfSource::from_bytes(data)?;
        self.extract(&source)
    }

    /// Extract a document from any [`BlockSource`].
    ///
    /// This is the engine-agnostic walk: pages in order, non-text and
    /// header/footer blocks dropped, noise blocks dropped, survivors
    /// re-indexed from zero per page. An engine failure on any page aborts
    /// the whole parse; no partial document is returned.
    pub fn extract(&self, source: &dyn BlockSource) -> Result<ParsedDocument> {
        let page_count = source.page_count();
        let mut document = ParsedDocument::new(page_count, source.metadata());

        for page_number in 1..=page_count {
            let (width, height) = source.page_size(page_number)?;
            let raw_blocks = source.blocks_for_page(page_number)?;
            let page = self.filter_page(page_number, width, height, raw_blocks);
            document.pages.push(page);
        }

        log::info!(
            "parsed {} pages, {} surviving blocks",
            document.page_count,
            document.block_count()
        );

        Ok(document)
    }

    /// Apply geometric and noise filters to one page's raw blocks.
    fn filter_page(
        &self,
        page_number: u32,
        width: f32,
        height: f32,
        raw_blocks: Vec<RawBlock>,
    ) -> PageContent {
        let mut page = PageContent::new(page_number, width, height);
        let mut full_text_parts: Vec<String> = Vec::new();
        let mut block_index = 0;

        for raw in raw_blocks {
            if raw.kind != RawBlockKind::Text {
                continue;
            }

            if self.options.filter_headers_footers {
                if raw.bbox.y0 < self.options.header_margin {
                    continue;
                }
                if raw.bbox.y1 > height - self.options.footer_margin {
                    continue;
                }
            }

            let text = raw.joined_text();
            if text.is_empty() || self.is_noise(&text) {
                continue;
            }

            full_text_parts.push(text.clone());
            page.blocks
                .push(TextBlock::new(text, page_number, raw.bbox, block_index));
            block_index += 1;
        }

        page.full_text = full_text_parts.join("\n");

        if page.is_empty() {
            log::debug!("page {page_number}: no blocks survived filtering");
        }

        page
    }

    /// Check whether text looks like page-number noise.
    fn is_noise(&self, text: &str) -> bool {
        let text = text.trim();

        if self.noise_patterns.iter().any(|p| p.is_match(text)) {
            return true;
        }

        // Very short all-numeric strings, ignoring spaces
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        text.chars().count() < 5 && !compact.is_empty() && compact.chars().all(|c| c.is_ascii_digit())
    }
}

impl Default for PageExtractor {
    fn default() -> Self {
        Self::new()
    }
}
