//! Input sniffing before a document is handed to a reader.
//!
//! A reader is only worth opening if the input actually starts with a PDF
//! header. Batch scanning additionally filters directory entries by extension.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
/// Length of the version that follows the magic bytes (e.g. "1.7").
const VERSION_LEN: usize = 3;

/// Header version of a PDF file, e.g. `1.7` or `2.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfVersion {
    pub major: u8,
    pub minor: u8,
}

impl std::fmt::Display for PdfVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}.{}", self.major, self.minor)
    }
}

/// Read the header of the file at `path` and validate it.
pub fn sniff_path<P: AsRef<Path>>(path: P) -> Result<PdfVersion> {
    let mut header = [0u8; 16];
    let mut file = File::open(path)?;
    let read = file.read(&mut header)?;
    sniff_bytes(&header[..read])
}

/// Validate the PDF header at the start of `data`.
///
/// Returns [`Error::UnknownFormat`] when the magic bytes are missing and
/// [`Error::UnsupportedVersion`] when the version is not of the `D.D` shape.
pub fn sniff_bytes(data: &[u8]) -> Result<PdfVersion> {
    if data.len() < PDF_MAGIC.len() + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version = &data[PDF_MAGIC.len()..PDF_MAGIC.len() + VERSION_LEN];
    match version {
        [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => {
            Ok(PdfVersion {
                major: major - b'0',
                minor: minor - b'0',
            })
        }
        _ => Err(Error::UnsupportedVersion(
            String::from_utf8_lossy(version).to_string(),
        )),
    }
}

/// Whether `path` carries a `.pdf` extension (any case).
pub fn has_pdf_extension<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_valid_header() {
        let version = sniff_bytes(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3").unwrap();
        assert_eq!(version, PdfVersion { major: 1, minor: 7 });
        assert_eq!(version.to_string(), "PDF 1.7");
    }

    #[test]
    fn test_sniff_rejects_html() {
        let result = sniff_bytes(b"<!DOCTYPE html>");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_sniff_rejects_truncated_header() {
        assert!(matches!(sniff_bytes(b"%PDF"), Err(Error::UnknownFormat)));
        assert!(matches!(sniff_bytes(b""), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_sniff_rejects_malformed_version() {
        let result = sniff_bytes(b"%PDF-x.y\n");
        assert!(matches!(result, Err(Error::UnsupportedVersion(v)) if v == "x.y"));
    }

    #[test]
    fn test_has_pdf_extension() {
        assert!(has_pdf_extension("report.pdf"));
        assert!(has_pdf_extension("REPORT.PDF"));
        assert!(!has_pdf_extension("report.json"));
        assert!(!has_pdf_extension("pdf"));
    }
}
