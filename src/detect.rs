//! PDF format detection and validation.
//!
//! Input checks happen before any page walk: a missing path surfaces
//! [`Error::NotFound`] and a non-PDF header surfaces [`Error::InvalidFormat`].

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Verify that the path exists and starts with a PDF header.
///
/// Returns the PDF version string (e.g., "1.7") on success.
pub fn ensure_pdf_path<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = [0u8; 16];
    let n = reader.read(&mut header)?;
    ensure_pdf_bytes(&header[..n])
}

/// Verify that the bytes start with a PDF header.
///
/// Returns the PDF version string on success.
pub fn ensure_pdf_bytes(data: &[u8]) -> Result<String> {
    if data.len() < PDF_MAGIC.len() + VERSION_LEN {
        return Err(Error::InvalidFormat(
            "content too short to be a PDF".to_string(),
        ));
    }

    if !data.starts_with(PDF_MAGIC) {
        return Err(Error::InvalidFormat(
            "missing %PDF- header".to_string(),
        ));
    }

    let version_bytes = &data[PDF_MAGIC.len()..PDF_MAGIC.len() + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::InvalidFormat(format!(
            "unrecognized PDF version: {version}"
        )));
    }

    Ok(version)
}

/// Check if a version string looks like "1.0" through "2.9".
fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == VERSION_LEN
        && bytes[0].is_ascii_digit()
        && bytes[1] == b'.'
        && bytes[2].is_ascii_digit()
}

/// Check if bytes represent a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    ensure_pdf_bytes(data).is_ok()
}
