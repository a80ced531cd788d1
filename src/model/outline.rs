//! Outline types: the externally visible result of outline inference.

use serde::{Deserialize, Serialize};

/// Heading level of an outline entry. Only four tiers exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
}

impl HeadingLevel {
    /// All levels, largest tier first.
    pub const ALL: [HeadingLevel; 4] = [
        HeadingLevel::H1,
        HeadingLevel::H2,
        HeadingLevel::H3,
        HeadingLevel::H4,
    ];

    /// Level for a size-tier rank (0 = largest). `None` past the fourth tier.
    pub fn from_rank(rank: usize) -> Option<Self> {
        Self::ALL.get(rank).copied()
    }

    /// Numeric depth, 1 for H1.
    pub fn depth(self) -> u8 {
        self as u8 + 1
    }
}

impl std::fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "H{}", self.depth())
    }
}

/// A leveled, paginated heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineItem {
    /// Heading level
    pub level: HeadingLevel,
    /// Heading text (carries a trailing space unless padding is disabled)
    pub text: String,
    /// Page index (0-based)
    pub page: usize,
}

impl OutlineItem {
    /// Create a new outline item.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: usize) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// Title plus outline inferred for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentResult {
    /// Document title, possibly empty
    pub title: String,
    /// Headings in reading order
    pub outline: Vec<OutlineItem>,
}

impl DocumentResult {
    /// The result emitted for unreadable or empty documents.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether neither a title nor any heading was found.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.outline.is_empty()
    }
}
