//! Coalescing of geometrically adjacent fragments.

use crate::classify::SpanClassifier;
use crate::model::Fragment;
use crate::options::MergeOptions;

/// Which member of a growing group the next fragment is compared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAnchor {
    /// The first member (the group's heading anchor)
    First,
    /// The most recently added member (a running chain)
    Last,
}

/// Greedy merger of consecutive same-size neighbours.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanMerger {
    options: MergeOptions,
}

/// A group being built. `head` accumulates the joined text and keeps the
/// style and position of the first member.
struct Group {
    head: Fragment,
    tail: Option<Fragment>,
}

impl Group {
    fn new(fragment: Fragment) -> Self {
        Self {
            head: fragment,
            tail: None,
        }
    }

    fn anchor(&self, mode: MergeAnchor) -> &Fragment {
        match mode {
            MergeAnchor::First => &self.head,
            MergeAnchor::Last => self.tail.as_ref().unwrap_or(&self.head),
        }
    }

    fn push(&mut self, text: String, fragment: Fragment) {
        self.head.text = text;
        self.tail = Some(fragment);
    }

    fn is_composite(&self) -> bool {
        self.tail.is_some()
    }
}

impl SpanMerger {
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    /// Whether `next` continues the group anchored at `anchor`: same page,
    /// close origins and a bit-identical font size.
    pub fn is_adjacent(&self, anchor: &Fragment, next: &Fragment) -> bool {
        next.page == anchor.page
            && next.bbox.vertical_gap(&anchor.bbox) < self.options.max_vertical_gap
            && next.bbox.horizontal_gap(&anchor.bbox) < self.options.max_horizontal_gap
            && next.font_size.to_bits() == anchor.font_size.to_bits()
    }

    /// Assemble multi-line title regions: chains of neighbours are joined
    /// without any constraint on the resulting text.
    pub fn merge_region(&self, fragments: Vec<Fragment>) -> Vec<Fragment> {
        self.coalesce(fragments, MergeAnchor::Last, |_| true)
    }

    /// Re-join heading candidates that were split across spans. A neighbour
    /// is absorbed only while the joined text stays short and does not read
    /// as a fragment.
    pub fn repair_headings(
        &self,
        candidates: Vec<Fragment>,
        classifier: &SpanClassifier,
    ) -> Vec<Fragment> {
        let max_len = self.options.max_repair_len;
        self.coalesce(candidates, MergeAnchor::First, |combined| {
            combined.chars().count() <= max_len && !classifier.is_fragmented(combined)
        })
    }

    fn coalesce<F>(&self, fragments: Vec<Fragment>, mode: MergeAnchor, accept: F) -> Vec<Fragment>
    where
        F: Fn(&str) -> bool,
    {
        let input_len = fragments.len();
        let mut merged = Vec::with_capacity(input_len);
        let mut composites = 0usize;
        let mut current: Option<Group> = None;

        for fragment in fragments {
            if let Some(group) = current.as_mut() {
                if self.is_adjacent(group.anchor(mode), &fragment) {
                    let combined = format!("{} {}", group.head.text, fragment.text);
                    if accept(&combined) {
                        group.push(combined, fragment);
                        continue;
                    }
                }
            }
            if let Some(group) = current.replace(Group::new(fragment)) {
                composites += usize::from(group.is_composite());
                merged.push(group.head);
            }
        }
        if let Some(group) = current {
            composites += usize::from(group.is_composite());
            merged.push(group.head);
        }

        log::trace!(
            "Merged {} fragments into {} ({} composite, {:?} anchor)",
            input_len,
            merged.len(),
            composites,
            mode
        );
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    fn fragment(text: &str, size: f32, x: f32, y: f32) -> Fragment {
        Fragment::new(text, size, false, 0, BoundingBox::new(x, y, x + 100.0, y + size))
    }

    #[test]
    fn test_adjacent_fragments_merge() {
        let merger = SpanMerger::default();
        let merged = merger.merge_region(vec![
            fragment("Annual", 20.0, 100.0, 100.0),
            fragment("Report", 20.0, 130.0, 140.0),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "Annual Report");
        assert_eq!(merged[0].bbox.x0, 100.0);
    }

    #[test]
    fn test_size_or_distance_breaks_group() {
        let merger = SpanMerger::default();
        let merged = merger.merge_region(vec![
            fragment("Annual", 20.0, 100.0, 100.0),
            fragment("Report", 20.5, 100.0, 120.0),
            fragment("Summary", 20.5, 100.0, 170.0),
            fragment("Appendix", 20.5, 400.0, 180.0),
        ]);
        let texts: Vec<&str> = merged.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["Annual", "Report", "Summary", "Appendix"]);
    }

    #[test]
    fn test_region_chains_from_last_member() {
        let merger = SpanMerger::default();
        let merged = merger.merge_region(vec![
            fragment("Digital", 20.0, 100.0, 100.0),
            fragment("Library", 20.0, 100.0, 140.0),
            fragment("Strategy", 20.0, 100.0, 180.0),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "Digital Library Strategy");
    }

    #[test]
    fn test_repair_compares_with_first_member() {
        let merger = SpanMerger::default();
        let classifier = SpanClassifier::default();
        let merged = merger.repair_headings(
            vec![
                fragment("Digital", 20.0, 100.0, 100.0),
                fragment("Library", 20.0, 100.0, 140.0),
                fragment("Strategy", 20.0, 100.0, 180.0),
            ],
            &classifier,
        );
        let texts: Vec<&str> = merged.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["Digital Library", "Strategy"]);
    }

    #[test]
    fn test_repair_refuses_fragmented_result() {
        let merger = SpanMerger::default();
        let classifier = SpanClassifier::default();
        let merged = merger.repair_headings(
            vec![
                fragment("Proposal", 16.0, 100.0, 100.0),
                fragment("for", 16.0, 100.0, 120.0),
            ],
            &classifier,
        );
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(SpanMerger::default().merge_region(Vec::new()).is_empty());
    }
}
