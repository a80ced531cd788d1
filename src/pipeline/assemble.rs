//! Outline assembly in reading order.

use std::cmp::Ordering;

use crate::model::{Fragment, OutlineItem};

use super::levels::SizeTiers;

/// Reading order: page, then top to bottom, then left to right.
pub fn reading_order(a: &Fragment, b: &Fragment) -> Ordering {
    a.page
        .cmp(&b.page)
        .then_with(|| a.bbox.y0.total_cmp(&b.bbox.y0))
        .then_with(|| a.bbox.x0.total_cmp(&b.bbox.x0))
}

/// Sort candidates into reading order and emit a leveled item for each one
/// whose size falls within the kept tiers.
///
/// With `legacy_padding` every text carries one trailing space; otherwise
/// texts are trimmed.
pub fn assemble(
    mut candidates: Vec<Fragment>,
    tiers: &SizeTiers,
    legacy_padding: bool,
) -> Vec<OutlineItem> {
    candidates.sort_by(reading_order);
    candidates
        .into_iter()
        .filter_map(|candidate| {
            let level = tiers.level_for(candidate.size_key())?;
            let text = if legacy_padding {
                format!("{} ", candidate.text)
            } else {
                candidate.text.trim().to_string()
            };
            Some(OutlineItem::new(level, text, candidate.page))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, HeadingLevel};

    fn fragment(text: &str, size: f32, page: usize, x: f32, y: f32) -> Fragment {
        Fragment::new(text, size, true, page, BoundingBox::new(x, y, x + 50.0, y + size))
    }

    #[test]
    fn test_reading_order_and_levels() {
        let candidates = vec![
            fragment("Results", 14.0, 1, 72.0, 90.0),
            fragment("Methods", 14.0, 0, 300.0, 400.0),
            fragment("Study", 20.0, 0, 72.0, 60.0),
            fragment("Scope", 14.0, 0, 72.0, 400.0),
            fragment("Footnote", 8.0, 1, 72.0, 700.0),
        ];
        let tiers = SizeTiers::from_keys(candidates.iter().map(Fragment::size_key), 2);
        let outline = assemble(candidates, &tiers, true);

        let got: Vec<(HeadingLevel, &str, usize)> = outline
            .iter()
            .map(|item| (item.level, item.text.as_str(), item.page))
            .collect();
        assert_eq!(
            got,
            vec![
                (HeadingLevel::H1, "Study ", 0),
                (HeadingLevel::H2, "Scope ", 0),
                (HeadingLevel::H2, "Methods ", 0),
                (HeadingLevel::H2, "Results ", 1),
            ]
        );
    }

    #[test]
    fn test_trimmed_texts_without_padding() {
        let candidates = vec![fragment("Study", 20.0, 0, 72.0, 60.0)];
        let tiers = SizeTiers::from_keys([200], 4);
        let outline = assemble(candidates, &tiers, false);
        assert_eq!(outline[0].text, "Study");
    }
}
