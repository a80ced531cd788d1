//! The outline inference pipeline.
//!
//! Control flow for one document:
//!
//! 1. compute the [`DocumentContext`] (body font size) over all fragments;
//! 2. merge first-page neighbours into title regions;
//! 3. select heading candidates on every page ([`HeadingSelector`]);
//! 4. repair headings split across fragments ([`SpanMerger`]);
//! 5. drop repeated heading text;
//! 6. map the largest size tiers to H1-H4 and assemble in reading order;
//! 7. choose the title and apply the title-driven outline corrections.

mod assemble;
mod context;
mod dedup;
mod heading;
mod levels;
mod merge;
mod title;

pub use assemble::{assemble, reading_order};
pub use context::{DocumentContext, FontStatistics};
pub use dedup::dedup_by_text;
pub use heading::{
    HeadingDecision, HeadingProbe, HeadingRule, HeadingSelector, ACCEPT_RULES, NO_ACCEPTING_RULE,
    REJECT_RULES,
};
pub use levels::SizeTiers;
pub use merge::{MergeAnchor, SpanMerger};
pub use title::TitleSelector;

use std::path::Path;

use serde::Serialize;

use crate::classify::SpanClassifier;
use crate::error::Result;
use crate::model::{DocumentResult, Fragment};
use crate::options::OutlineOptions;
use crate::reader::{DocumentReader, LopdfReader};

/// Heading decision for one fragment, as reported by
/// [`OutlineExtractor::explain`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FragmentDecision {
    pub page: usize,
    pub text: String,
    pub font_size: f32,
    pub bold: bool,
    #[serde(flatten)]
    pub decision: HeadingDecision,
}

/// Infers a title and outline from a document's fragments.
///
/// The extractor holds no per-document state and can be shared across
/// threads.
#[derive(Debug, Clone, Default)]
pub struct OutlineExtractor {
    classifier: SpanClassifier,
    options: OutlineOptions,
}

impl OutlineExtractor {
    /// Create an extractor with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with custom options.
    ///
    /// Fails if a lexicon table cannot be compiled into a pattern.
    pub fn with_options(options: OutlineOptions) -> Result<Self> {
        let options = options.normalized();
        let classifier = SpanClassifier::new(options.lexicon.clone())?;
        Ok(Self {
            classifier,
            options,
        })
    }

    pub fn options(&self) -> &OutlineOptions {
        &self.options
    }

    pub fn classifier(&self) -> &SpanClassifier {
        &self.classifier
    }

    /// Read every page from `reader` and infer the outline.
    pub fn extract<R: DocumentReader + ?Sized>(&self, reader: &R) -> Result<DocumentResult> {
        let pages = reader.pages()?;
        log::debug!("Processing document with {} pages", pages.len());
        for (index, page) in pages.iter().enumerate() {
            if !page.is_empty() {
                log::debug!("Page {}: {} fragments", index, page.len());
            }
        }
        Ok(self.outline_fragments(pages.into_iter().flatten().collect()))
    }

    /// Open a PDF file and infer its outline.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<DocumentResult> {
        let reader = LopdfReader::open(path)?;
        self.extract(&reader)
    }

    /// Infer the outline of a document given as a flat fragment list.
    ///
    /// Fragments are taken in page order; within a page the given order is
    /// kept.
    pub fn outline_fragments(&self, mut fragments: Vec<Fragment>) -> DocumentResult {
        log::debug!("Total fragments: {}", fragments.len());
        if fragments.is_empty() {
            return DocumentResult::empty();
        }
        fragments.sort_by_key(|fragment| fragment.page);

        let context = DocumentContext::from_fragments(&fragments);
        log::debug!("Body font size: {}", context.body_font_size);

        let merger = SpanMerger::new(self.options.merge);
        let first_page: Vec<Fragment> = fragments
            .iter()
            .filter(|fragment| fragment.page == 0)
            .cloned()
            .collect();
        let title_region = merger.merge_region(first_page);

        let candidates = HeadingSelector::new(&self.classifier, context).select(&fragments);
        log::debug!("Found {} heading candidates", candidates.len());

        let candidates = merger.repair_headings(candidates, &self.classifier);
        let candidates = dedup_by_text(candidates);

        let tiers = SizeTiers::from_keys(
            candidates.iter().map(Fragment::size_key),
            self.options.max_levels,
        );
        log::debug!("Distinct heading sizes: {:?}", tiers.sizes());

        let outline = assemble(candidates, &tiers, self.options.legacy_padding);
        log::debug!("Generated {} outline items", outline.len());

        let titles = TitleSelector::new(&self.classifier, context, self.options.legacy_padding);
        let title = titles.select(&title_region);
        let title = titles.resume_override(title, &outline);
        let outline = titles.merge_short_headings(outline);

        log::info!("Title: {:?}", title);
        DocumentResult { title, outline }
    }

    /// Report the heading decision, and the rule behind it, for every
    /// fragment.
    pub fn explain(&self, fragments: &[Fragment]) -> Vec<FragmentDecision> {
        let context = DocumentContext::from_fragments(fragments);
        let selector = HeadingSelector::new(&self.classifier, context);
        fragments
            .iter()
            .map(|fragment| FragmentDecision {
                page: fragment.page,
                text: fragment.text.clone(),
                font_size: fragment.font_size,
                bold: fragment.bold,
                decision: selector.decide(fragment),
            })
            .collect()
    }
}
