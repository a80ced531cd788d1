//! Font-size tiers and heading levels.

use crate::model::{size_from_key, HeadingLevel};

/// The largest distinct rounded sizes among heading candidates, largest
/// first. Rank `i` maps to heading level `H(i + 1)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeTiers {
    keys: Vec<i32>,
}

impl SizeTiers {
    /// Build tiers from size keys (tenths of a point), keeping at most
    /// `max_levels` tiers.
    pub fn from_keys(keys: impl IntoIterator<Item = i32>, max_levels: usize) -> Self {
        let mut keys: Vec<i32> = keys.into_iter().collect();
        keys.sort_unstable_by(|a, b| b.cmp(a));
        keys.dedup();
        keys.truncate(max_levels.min(HeadingLevel::ALL.len()));
        Self { keys }
    }

    /// Heading level for a size key, or `None` outside the kept tiers.
    pub fn level_for(&self, key: i32) -> Option<HeadingLevel> {
        self.keys
            .iter()
            .position(|&k| k == key)
            .and_then(HeadingLevel::from_rank)
    }

    /// Tier sizes in points, largest first.
    pub fn sizes(&self) -> Vec<f32> {
        self.keys.iter().copied().map(size_from_key).collect()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_four_tiers() {
        let tiers = SizeTiers::from_keys([120, 240, 180, 240, 140, 100, 160], 4);
        assert_eq!(tiers.sizes(), vec![24.0, 18.0, 16.0, 14.0]);
        assert_eq!(tiers.level_for(240), Some(HeadingLevel::H1));
        assert_eq!(tiers.level_for(140), Some(HeadingLevel::H4));
        assert_eq!(tiers.level_for(120), None);
    }

    #[test]
    fn test_fewer_levels() {
        let tiers = SizeTiers::from_keys([200, 160, 140], 2);
        assert_eq!(tiers.len(), 2);
        assert_eq!(tiers.level_for(160), Some(HeadingLevel::H2));
        assert_eq!(tiers.level_for(140), None);
        assert!(SizeTiers::from_keys([], 4).is_empty());
    }
}
