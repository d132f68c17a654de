//! Error types for the pdfchunk library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdfchunk operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during extraction and chunking.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input path does not resolve to readable content.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// The content is not a readable PDF document.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// The engine failed while parsing the document structure.
    /// No partial result is returned.
    #[error("Corrupt document: {0}")]
    Corrupt(String),

    /// Invalid chunking configuration, rejected before any chunking work.
    #[error("Invalid chunking configuration: {0}")]
    Config(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Corrupt(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NotFound(PathBuf::from("missing.pdf"));
        assert_eq!(err.to_string(), "File not found: missing.pdf");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );

        let err = Error::Config("chunk_size must be greater than 0".to_string());
        assert!(err.to_string().contains("chunk_size"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
