//! Document reader abstraction.
//!
//! The outline pipeline never touches a PDF library directly. It consumes a
//! [`DocumentReader`], which yields per-page fragments in reading order.
//! [`LopdfReader`] reads real PDF files; [`FragmentDocument`] holds fragments
//! in memory, for tests and for replaying captured fragment dumps.

mod pdf;

pub use pdf::LopdfReader;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Fragment;

/// Source of styled text fragments for one document.
pub trait DocumentReader {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Fragments of one page (0-based), in reading order.
    fn page_fragments(&self, page: usize) -> Result<Vec<Fragment>>;

    /// Fragments of every page, in page order.
    fn pages(&self) -> Result<Vec<Vec<Fragment>>> {
        (0..self.page_count())
            .map(|page| self.page_fragments(page))
            .collect()
    }
}

/// Largest page index accepted from a fragment dump.
pub const MAX_PAGES: usize = 1 << 20;

/// An in-memory document made of already extracted fragments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FragmentDocument {
    /// Fragments per page
    pub pages: Vec<Vec<Fragment>>,
}

/// Accepted shapes of a fragment dump.
#[derive(Deserialize)]
#[serde(untagged)]
enum FragmentDump {
    Paged { pages: Vec<Vec<Fragment>> },
    Flat(Vec<Fragment>),
}

impl FragmentDocument {
    /// Create a document from per-page fragment lists.
    pub fn new(pages: Vec<Vec<Fragment>>) -> Self {
        Self { pages }
    }

    /// Group a flat fragment list by each fragment's page index, keeping
    /// the input order within a page.
    ///
    /// Fails if a page index is not below [`MAX_PAGES`].
    pub fn from_fragments(fragments: Vec<Fragment>) -> Result<Self> {
        let mut page_count = 0usize;
        for fragment in &fragments {
            let end = fragment
                .page
                .checked_add(1)
                .filter(|&end| end <= MAX_PAGES)
                .ok_or_else(|| {
                    Error::PdfParse(format!(
                        "fragment page {} exceeds the {} page limit",
                        fragment.page, MAX_PAGES
                    ))
                })?;
            page_count = page_count.max(end);
        }

        let mut pages = vec![Vec::new(); page_count];
        for fragment in fragments {
            let page = fragment.page;
            pages[page].push(fragment);
        }
        Ok(Self { pages })
    }

    /// Parse a fragment dump: either `{"pages": [[...], ...]}` or a flat
    /// array of fragments.
    pub fn from_json(json: &str) -> Result<Self> {
        let dump: FragmentDump = serde_json::from_str(json)
            .map_err(|e| Error::PdfParse(format!("invalid fragment dump: {}", e)))?;
        match dump {
            FragmentDump::Paged { pages } => Ok(Self::new(pages)),
            FragmentDump::Flat(fragments) => Self::from_fragments(fragments),
        }
    }

    /// Load a fragment dump from a file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Capture any reader's output as an in-memory document.
    pub fn capture<R: DocumentReader + ?Sized>(reader: &R) -> Result<Self> {
        Ok(Self::new(reader.pages()?))
    }

    /// Total number of fragments.
    pub fn fragment_count(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }
}

impl DocumentReader for FragmentDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_fragments(&self, page: usize) -> Result<Vec<Fragment>> {
        self.pages
            .get(page)
            .cloned()
            .ok_or(Error::PageOutOfRange(page, self.pages.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    fn fragment(text: &str, page: usize) -> Fragment {
        Fragment::new(text, 12.0, false, page, BoundingBox::default())
    }

    #[test]
    fn test_from_fragments_groups_by_page() {
        let doc = FragmentDocument::from_fragments(vec![
            fragment("a", 0),
            fragment("c", 2),
            fragment("b", 0),
        ])
        .unwrap();
        assert_eq!(doc.page_count(), 3);
        assert_eq!(doc.pages[0].len(), 2);
        assert!(doc.pages[1].is_empty());
        assert_eq!(doc.page_fragments(2).unwrap()[0].text, "c");
        assert_eq!(doc.fragment_count(), 3);
    }

    #[test]
    fn test_page_out_of_range() {
        let doc = FragmentDocument::default();
        let err = doc.page_fragments(0).unwrap_err();
        assert!(matches!(err, Error::PageOutOfRange(0, 0)));
    }

    #[test]
    fn test_from_json_shapes() {
        let flat = r#"[{"text":"Intro","font_size":14.0,"bold":true,"page":1,
            "bbox":{"x0":72,"y0":90,"x1":200,"y1":104}}]"#;
        let doc = FragmentDocument::from_json(flat).unwrap();
        assert_eq!(doc.page_count(), 2);
        assert!(doc.pages[1][0].bold);

        let paged = serde_json::to_string(&doc).unwrap();
        assert_eq!(FragmentDocument::from_json(&paged).unwrap(), doc);

        assert!(matches!(
            FragmentDocument::from_json("{\"oops\": 1}"),
            Err(Error::PdfParse(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_out_of_range_page() {
        let dump = |page: &str| {
            format!(
                r#"[{{"text":"Intro","font_size":14.0,"page":{},
                "bbox":{{"x0":72,"y0":90,"x1":200,"y1":104}}}}]"#,
                page
            )
        };

        for page in ["18446744073709551615", "1000000000000"] {
            assert!(matches!(
                FragmentDocument::from_json(&dump(page)),
                Err(Error::PdfParse(_))
            ));
        }

        let last = (MAX_PAGES - 1).to_string();
        let doc = FragmentDocument::from_json(&dump(&last)).unwrap();
        assert_eq!(doc.page_count(), MAX_PAGES);
        assert_eq!(doc.fragment_count(), 1);
    }

    #[test]
    fn test_from_fragments_rejects_max_page() {
        let err = FragmentDocument::from_fragments(vec![fragment("a", usize::MAX)]).unwrap_err();
        assert!(matches!(err, Error::PdfParse(_)));
    }

    #[test]
    fn test_capture_roundtrips_through_reader() {
        let doc = FragmentDocument::from_fragments(vec![fragment("a", 0), fragment("b", 1)]).unwrap();
        assert_eq!(FragmentDocument::capture(&doc).unwrap(), doc);
    }
}
