//! Error-path tests against the real lopdf backend.

use std::io::Write;

use pdfchunk::{extract_and_chunk, parse_bytes, parse_file, Error, PageExtractor};

#[test]
fn test_missing_file_is_not_found() {
    let result = parse_file("tests/data/definitely-missing.pdf");
    match result {
        Err(Error::NotFound(path)) => {
            assert!(path.to_string_lossy().ends_with("definitely-missing.pdf"))
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn test_non_pdf_file_is_invalid_format() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"<html><body>not a pdf</body></html>").unwrap();

    let result = PageExtractor::new().parse(file.path());
    assert!(matches!(result, Err(Error::InvalidFormat(_))));
}

#[test]
fn test_empty_file_is_invalid_format() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let result = parse_file(file.path());
    assert!(matches!(result, Err(Error::InvalidFormat(_))));
}

#[test]
fn test_truncated_pdf_is_corrupt() {
    // Valid magic and version, but no body, xref, or trailer
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n").unwrap();

    let result = parse_file(file.path());
    assert!(matches!(result, Err(Error::Corrupt(_))));
}

#[test]
fn test_truncated_bytes_are_corrupt() {
    let result = parse_bytes(b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>");
    assert!(matches!(result, Err(Error::Corrupt(_))));
}

#[test]
fn test_extract_and_chunk_propagates_not_found() {
    let result = extract_and_chunk("no/such/dir/report.pdf");
    assert!(matches!(result, Err(Error::NotFound(_))));
}
