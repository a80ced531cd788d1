//! Removal of repeated heading text (running headers and footers).

use std::collections::HashSet;

use crate::model::Fragment;

/// Keep the first occurrence of each distinct trimmed text.
///
/// Comparison is case-sensitive.
pub fn dedup_by_text(candidates: Vec<Fragment>) -> Vec<Fragment> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|candidate| seen.insert(candidate.text.trim().to_string()))
        .collect()
}
