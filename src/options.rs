//! Outline extraction options and configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::Lexicon;
use crate::error::Result;

/// Options for outline extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineOptions {
    /// Word tables used by the classifier
    pub lexicon: Lexicon,

    /// Geometric thresholds for fragment merging
    pub merge: MergeOptions,

    /// Number of font-size tiers mapped to heading levels (1-4)
    pub max_levels: usize,

    /// Keep the trailing space on outline texts and the title
    pub legacy_padding: bool,

    /// Whether batch processing uses multiple threads
    pub parallel: bool,
}

impl OutlineOptions {
    /// Create new outline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse options from a JSON string. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        Ok(options.normalized())
    }

    /// Set the word tables.
    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    /// Set merge thresholds.
    pub fn with_merge(mut self, merge: MergeOptions) -> Self {
        self.merge = merge;
        self
    }

    /// Set the number of heading levels, clamped to 1..=4.
    pub fn with_max_levels(mut self, levels: usize) -> Self {
        self.max_levels = levels;
        self.normalized()
    }

    /// Keep or drop the trailing-space artifact on emitted texts.
    pub fn with_legacy_padding(mut self, padding: bool) -> Self {
        self.legacy_padding = padding;
        self
    }

    /// Emit trimmed texts.
    pub fn trimmed(mut self) -> Self {
        self.legacy_padding = false;
        self
    }

    /// Enable or disable parallel batch processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel batch processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub(crate) fn normalized(mut self) -> Self {
        self.max_levels = self.max_levels.clamp(1, 4);
        self
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            lexicon: Lexicon::default(),
            merge: MergeOptions::default(),
            max_levels: 4,
            legacy_padding: true,
            parallel: true,
        }
    }
}

/// Thresholds for coalescing neighbouring fragments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    /// Maximum vertical distance between bbox origins (exclusive)
    pub max_vertical_gap: f32,

    /// Maximum horizontal distance between bbox origins (exclusive)
    pub max_horizontal_gap: f32,

    /// Maximum length in characters of a repaired heading
    pub max_repair_len: usize,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            max_vertical_gap: 50.0,
            max_horizontal_gap: 200.0,
            max_repair_len: 200,
        }
    }
}
