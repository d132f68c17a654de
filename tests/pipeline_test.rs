//! End-to-end tests of the extract + chunk pipeline over a mock engine.

use std::collections::HashMap;

use pdfchunk::{
    BlockSource, BoundingBox, ChunkAssembler, ChunkOptions, Error, ExtractOptions, PageExtractor,
    Pipeline, RawBlock, Result,
};

/// In-memory engine: fixed pages of raw blocks, with an optional page that
/// fails to yield its blocks.
struct MockSource {
    pages: Vec<(f32, f32, Vec<RawBlock>)>,
    metadata: HashMap<String, String>,
    fail_on_page: Option<u32>,
}

impl MockSource {
    fn new(pages: Vec<(f32, f32, Vec<RawBlock>)>) -> Self {
        Self {
            pages,
            metadata: HashMap::new(),
            fail_on_page: None,
        }
    }

    fn single_page(blocks: Vec<RawBlock>) -> Self {
        Self::new(vec![(612.0, 792.0, blocks)])
    }
}

impl BlockSource for MockSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_size(&self, page_number: u32) -> Result<(f32, f32)> {
        let (w, h, _) = &self.pages[(page_number - 1) as usize];
        Ok((*w, *h))
    }

    fn blocks_for_page(&self, page_number: u32) -> Result<Vec<RawBlock>> {
        if self.fail_on_page == Some(page_number) {
            return Err(Error::Corrupt(format!(
                "page {page_number} content stream unreadable"
            )));
        }
        Ok(self.pages[(page_number - 1) as usize].2.clone())
    }

    fn metadata(&self) -> HashMap<String, String> {
        self.metadata.clone()
    }
}

fn body_block(text: &str, top: f32) -> RawBlock {
    RawBlock::text(
        BoundingBox::new(72.0, top, 400.0, top + 30.0),
        vec![text.to_string()],
    )
}

#[test]
fn test_single_block_document_single_chunk() {
    let text = "t".repeat(100);
    let source = MockSource::single_page(vec![body_block(&text, 100.0)]);

    let document = PageExtractor::new().extract(&source).unwrap();
    let chunks = ChunkAssembler::new().chunk(&document).unwrap();

    assert_eq!(chunks.len(), 1);
    let c = &chunks[0];
    assert_eq!(c.content, text);
    assert_eq!(c.chunk_index, 0);
    assert_eq!(c.page_number, 1);
    assert_eq!(c.start_page, 1);
    assert_eq!(c.end_page, 1);
    assert_eq!(c.start_char, 0);
    assert_eq!(c.end_char, 100);
    assert_eq!(c.bbox.unwrap(), document.pages[0].blocks[0].bbox);
    assert_eq!(c.source_block_indices, vec![0]);
}

#[test]
fn test_long_page_splits_with_overlap() {
    // Three 400-char paragraphs with size 500 / overlap 50: each pending
    // paragraph overflows the buffer, so every paragraph closes a chunk
    let blocks = (0..3)
        .map(|i| {
            let letter = (b'a' + i as u8) as char;
            body_block(&letter.to_string().repeat(400), 100.0 + 50.0 * i as f32)
        })
        .collect();
    let source = MockSource::single_page(blocks);

    let (_, chunks) = Pipeline::new().run_source(&source).unwrap();

    assert_eq!(chunks.len(), 3);
    for pair in chunks.windows(2) {
        let tail: String = {
            let chars: Vec<char> = pair[0].content.chars().collect();
            chars[chars.len() - 50..].iter().collect()
        };
        assert!(
            pair[1].content.starts_with(&tail),
            "chunk {} does not begin with the trailing 50 chars of chunk {}",
            pair[1].chunk_index,
            pair[0].chunk_index
        );
    }
}

#[test]
fn test_footer_block_never_reaches_chunks() {
    let source = MockSource::single_page(vec![
        body_block("Body paragraph that should survive filtering.", 200.0),
        // y1 = 780 falls inside the 50-unit footer margin of a 792 page
        RawBlock::text(
            BoundingBox::new(72.0, 760.0, 300.0, 780.0),
            vec!["Confidential - Acme Corp".to_string()],
        ),
    ]);

    let (document, chunks) = Pipeline::new().run_source(&source).unwrap();

    assert_eq!(document.pages[0].block_count(), 1);
    assert!(!document.pages[0].full_text.contains("Confidential"));
    assert_eq!(chunks.len(), 1);
    assert!(!chunks[0].content.contains("Confidential"));
}

#[test]
fn test_page_number_only_page_is_empty() {
    let source = MockSource::single_page(vec![body_block("3", 400.0)]);

    let (document, chunks) = Pipeline::new().run_source(&source).unwrap();

    assert!(document.pages[0].is_empty());
    assert_eq!(document.pages[0].full_text, "");
    assert!(chunks.is_empty());
}

#[test]
fn test_page_number_prefix_drops_whole_block() {
    // The noise patterns are prefix matches: a block that merely begins
    // with "Page N" is dropped, even when more text follows
    let source = MockSource::single_page(vec![
        body_block("Page 3 continued from above", 200.0),
        body_block("Body text that survives.", 300.0),
    ]);

    let (document, chunks) = Pipeline::new().run_source(&source).unwrap();

    assert_eq!(document.pages[0].block_count(), 1);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].content, "Body text that survives.");
}

#[test]
fn test_engine_failure_aborts_whole_parse() {
    let mut source = MockSource::new(vec![
        (612.0, 792.0, vec![body_block("page one", 100.0)]),
        (612.0, 792.0, vec![body_block("page two", 100.0)]),
    ]);
    source.fail_on_page = Some(2);

    let result = PageExtractor::new().extract(&source);
    assert!(matches!(result, Err(Error::Corrupt(_))));
}

#[test]
fn test_metadata_passthrough() {
    let mut source = MockSource::single_page(vec![body_block("body", 100.0)]);
    source
        .metadata
        .insert("title".to_string(), "Quarterly Report".to_string());

    let document = PageExtractor::new().extract(&source).unwrap();
    assert_eq!(
        document.metadata.get("title").map(String::as_str),
        Some("Quarterly Report")
    );
}

#[test]
fn test_chunks_outlive_document() {
    let source = MockSource::single_page(vec![body_block("standalone content", 100.0)]);

    let document = PageExtractor::new().extract(&source).unwrap();
    let chunks = ChunkAssembler::new().chunk(&document).unwrap();
    drop(document);
    drop(source);

    assert_eq!(chunks[0].content, "standalone content");
    assert_eq!(chunks[0].page_number, 1);
}

#[test]
fn test_chunk_invariants_hold_on_mixed_document() {
    let pages = (0..4)
        .map(|p| {
            let blocks = (0..5)
                .map(|i| {
                    body_block(
                        &format!("pg{p} para{i} {}", "w".repeat(70)),
                        120.0 + 60.0 * i as f32,
                    )
                })
                .collect();
            (612.0, 792.0, blocks)
        })
        .collect();
    let source = MockSource::new(pages);

    let (document, chunks) = Pipeline::new()
        .with_chunk_size(300)
        .with_chunk_overlap(40)
        .run_source(&source)
        .unwrap();

    assert!(chunks.len() > 1);
    let mut prev_end = 0;
    for (i, c) in chunks.iter().enumerate() {
        assert_eq!(c.chunk_index, i);
        assert!(c.start_page <= c.page_number);
        assert!(c.page_number <= c.end_page);
        assert!(c.start_char < c.end_char);
        if i > 0 {
            // Overlap may pull start_char backwards, but chunks always
            // advance: each must end beyond the previous one
            assert!(c.end_char > prev_end);
            assert!(c.start_char <= prev_end);
        }
        prev_end = c.end_char;

        let bbox = c.bbox.expect("every chunk here has same-page blocks");
        assert!(bbox.x0 <= bbox.x1);
        assert!(bbox.y0 <= bbox.y1);

        // Every referenced block index exists on some contributing page
        let max_blocks = document.pages.iter().map(|p| p.block_count()).max().unwrap();
        for idx in &c.source_block_indices {
            assert!(*idx < max_blocks);
        }
    }
}

#[test]
fn test_offsets_reconstruct_filtered_text() {
    let pages = (0..3)
        .map(|p| {
            let blocks = (0..4)
                .map(|i| {
                    body_block(
                        &format!("p{p}b{i} {}", "text ".repeat(12).trim_end()),
                        120.0 + 60.0 * i as f32,
                    )
                })
                .collect();
            (612.0, 792.0, blocks)
        })
        .collect();
    let source = MockSource::new(pages);

    let (document, chunks) = Pipeline::new()
        .with_chunk_size(180)
        .with_chunk_overlap(30)
        .run_source(&source)
        .unwrap();

    // Global text is every surviving block joined by the separator
    let expected = document
        .all_blocks()
        .map(|b| b.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    // De-duplicate overlaps through the offsets: each chunk appends only
    // the characters past the previous chunk's end_char
    let mut rebuilt = String::new();
    let mut prev_end = 0;
    for c in &chunks {
        let fresh = c.end_char - prev_end;
        let chars: Vec<char> = c.content.chars().collect();
        rebuilt.extend(&chars[chars.len() - fresh..]);
        prev_end = c.end_char;
    }

    assert_eq!(rebuilt, expected);
}

#[test]
fn test_zero_overlap_partitions_blocks() {
    let blocks = (0..6)
        .map(|i| body_block(&format!("{i}{}", "q".repeat(45)), 100.0 + 40.0 * i as f32))
        .collect();
    let source = MockSource::single_page(blocks);

    let extractor = PageExtractor::new();
    let document = extractor.extract(&source).unwrap();
    let assembler = ChunkAssembler::with_options(
        ChunkOptions::new().with_chunk_size(100).with_chunk_overlap(0),
    );
    let chunks = assembler.chunk(&document).unwrap();

    assert!(chunks.len() > 1);
    let mut seen = std::collections::HashSet::new();
    for c in &chunks {
        for idx in &c.source_block_indices {
            assert!(seen.insert(*idx), "block {idx} shared across chunks");
        }
    }
    assert_eq!(seen.len(), 6);
}

#[test]
fn test_filter_disabled_keeps_header_in_chunks() {
    let source = MockSource::single_page(vec![
        RawBlock::text(
            BoundingBox::new(72.0, 20.0, 300.0, 40.0),
            vec!["Running head".to_string()],
        ),
        body_block("body", 200.0),
    ]);

    let extractor =
        PageExtractor::with_options(ExtractOptions::new().with_header_footer_filter(false));
    let document = extractor.extract(&source).unwrap();
    let chunks = ChunkAssembler::new().chunk(&document).unwrap();

    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].content.contains("Running head"));
}
