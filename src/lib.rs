//! # pdf-outline
//!
//! Heuristic title and heading outline inference for PDF documents.
//!
//! Given the styled text fragments of a document (text, font size, bold flag,
//! page and position), this library infers a document title and a flat
//! outline of H1-H4 headings, each tagged with its page.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_outline::{process_file, render, JsonFormat};
//!
//! fn main() -> pdf_outline::Result<()> {
//!     let result = process_file("document.pdf");
//!     println!("{}", render::to_json(&result, JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Pluggable readers**: any [`DocumentReader`] can feed the pipeline; a
//!   lopdf-backed reader is included
//! - **Explainable decisions**: every heading decision names its rule
//! - **Tunable word tables**: the [`Lexicon`] can be replaced from JSON
//! - **Batch processing**: directories are processed in parallel with rayon,
//!   one failing document never aborts the batch

pub mod batch;
pub mod classify;
pub mod detect;
pub mod error;
pub mod model;
pub mod options;
pub mod pipeline;
pub mod reader;
pub mod render;

// Re-export commonly used types
pub use batch::{process_directory, BatchReport};
pub use classify::{Lexicon, SpanClassifier};
pub use detect::{has_pdf_extension, sniff_bytes, sniff_path, PdfVersion};
pub use error::{Error, Result};
pub use model::{
    BoundingBox, DocumentResult, FontFlags, Fragment, HeadingLevel, OutlineItem,
};
pub use options::{MergeOptions, OutlineOptions};
pub use pipeline::{FragmentDecision, HeadingDecision, OutlineExtractor};
pub use reader::{DocumentReader, FragmentDocument, LopdfReader};
pub use render::JsonFormat;

use std::path::Path;

/// Infer the outline of a document read through `reader`.
///
/// Reader failures are logged and yield an empty result.
///
/// # Example
///
/// ```
/// use pdf_outline::{process, BoundingBox, FragmentDocument, Fragment};
///
/// let bbox = |y: f32| BoundingBox::new(72.0, y, 300.0, y + 12.0);
/// let doc = FragmentDocument::from_fragments(vec![
///     Fragment::new("Annual Report", 24.0, true, 0, bbox(60.0)),
///     Fragment::new("Results improved across all regions this year", 11.0, false, 0, bbox(120.0)),
/// ])?;
/// let result = process(&doc);
/// assert_eq!(result.title, "Annual Report ");
/// # Ok::<(), pdf_outline::Error>(())
/// ```
pub fn process<R: DocumentReader + ?Sized>(reader: &R) -> DocumentResult {
    match OutlineExtractor::new().extract(reader) {
        Ok(result) => result,
        Err(e) => {
            log::error!("Error processing document: {}", e);
            DocumentResult::empty()
        }
    }
}

/// Infer the outline of an already extracted fragment list.
pub fn process_fragments(fragments: Vec<Fragment>) -> DocumentResult {
    OutlineExtractor::new().outline_fragments(fragments)
}

/// Open a PDF file and infer its outline, returning the error on failure.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::try_process_file;
///
/// let result = try_process_file("document.pdf").unwrap();
/// println!("{} headings", result.outline.len());
/// ```
pub fn try_process_file<P: AsRef<Path>>(path: P) -> Result<DocumentResult> {
    OutlineExtractor::new().extract_file(path)
}

/// Open a PDF file and infer its outline.
///
/// Unreadable documents are logged and yield an empty result.
pub fn process_file<P: AsRef<Path>>(path: P) -> DocumentResult {
    let path = path.as_ref();
    match try_process_file(path) {
        Ok(result) => result,
        Err(e) => {
            log::error!("Error processing {}: {}", path.display(), e);
            DocumentResult::empty()
        }
    }
}

/// Infer the outline of a PDF held in memory.
pub fn process_bytes(data: &[u8]) -> Result<DocumentResult> {
    let reader = LopdfReader::from_bytes(data)?;
    OutlineExtractor::new().extract(&reader)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_missing_file_is_empty() {
        let result = process_file("definitely/not/here.pdf");
        assert!(result.is_empty());
    }

    #[test]
    fn test_try_process_file_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();
        assert!(matches!(
            try_process_file(&path),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_process_bytes_rejects_garbage() {
        assert!(process_bytes(b"garbage").is_err());
    }

    #[test]
    fn test_process_out_of_range_reader_is_empty() {
        struct Broken;
        impl DocumentReader for Broken {
            fn page_count(&self) -> usize {
                2
            }
            fn page_fragments(&self, page: usize) -> Result<Vec<Fragment>> {
                Err(Error::PageOutOfRange(page, 0))
            }
        }
        assert_eq!(process(&Broken), DocumentResult::empty());
    }
}
