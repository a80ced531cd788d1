//! Per-document derived state.

use std::collections::BTreeMap;

use crate::model::{size_from_key, size_key, Fragment};

/// Font size histogram for a document, bucketed to tenths of a point.
#[derive(Debug, Clone, Default)]
pub struct FontStatistics {
    /// Observed size keys with their frequency
    pub size_histogram: BTreeMap<i32, usize>,
}

impl FontStatistics {
    /// Build statistics over every fragment of a document.
    pub fn from_fragments<'a>(fragments: impl IntoIterator<Item = &'a Fragment>) -> Self {
        let mut stats = Self::default();
        for fragment in fragments {
            stats.add_size(fragment.font_size);
        }
        stats
    }

    /// Add a font size observation.
    pub fn add_size(&mut self, size: f32) {
        *self.size_histogram.entry(size_key(size)).or_insert(0) += 1;
    }

    /// The most frequent size, or 0 when nothing was observed.
    ///
    /// Ties go to the smallest size.
    pub fn body_size(&self) -> f32 {
        let mut best: Option<(i32, usize)> = None;
        for (&key, &count) in &self.size_histogram {
            // Keys ascend, so only a strictly larger count replaces the best.
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((key, count));
            }
        }
        best.map_or(0.0, |(key, _)| size_from_key(key))
    }

    /// Number of observations.
    pub fn total(&self) -> usize {
        self.size_histogram.values().sum()
    }
}

/// Immutable per-document context passed into every size-relative decision.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DocumentContext {
    /// Most frequent rounded font size; 0 for an empty document
    pub body_font_size: f32,
}

impl DocumentContext {
    pub fn new(body_font_size: f32) -> Self {
        Self { body_font_size }
    }

    /// Compute the context for a document's fragments.
    pub fn from_fragments(fragments: &[Fragment]) -> Self {
        Self::new(FontStatistics::from_fragments(fragments).body_size())
    }

    /// Font size relative to body text; 1.0 when the body size is unknown.
    pub fn size_ratio(&self, font_size: f32) -> f64 {
        if self.body_font_size > 0.0 {
            f64::from(font_size) / f64::from(self.body_font_size)
        } else {
            1.0
        }
    }

    /// Whether the size is strictly larger than body text.
    pub fn is_larger_than_body(&self, font_size: f32) -> bool {
        font_size > self.body_font_size
    }
}
