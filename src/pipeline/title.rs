//! Title selection over first-page fragments, and the title-driven
//! corrections applied to the assembled outline.

use crate::classify::patterns::*;
use crate::classify::SpanClassifier;
use crate::model::{Fragment, HeadingLevel, OutlineItem};

use super::context::DocumentContext;

/// One step of the title cascade.
///
/// A step runs only when `wanted` holds for the title chosen so far; it then
/// takes the first fragment (largest, then top-most) that `select` accepts.
#[derive(Clone, Copy)]
struct TitleStep {
    name: &'static str,
    wanted: fn(&str) -> bool,
    select: fn(&str, &Fragment, &TitleSelector<'_>) -> bool,
    padding: &'static str,
}

fn is_empty(title: &str) -> bool {
    title.is_empty()
}

fn trimmed_len(title: &str) -> usize {
    title.trim().chars().count()
}

static TITLE_STEPS: &[TitleStep] = &[
    TitleStep {
        name: "person-name",
        wanted: is_empty,
        select: |text, f, s| f.bold && s.context.is_larger_than_body(f.font_size) && is_person_name(text),
        padding: " ",
    },
    TitleStep {
        name: "bold-phrase",
        wanted: is_empty,
        select: |text, f, s| {
            f.bold
                && s.context.is_larger_than_body(f.font_size)
                && text.chars().count() > 5
                && text.split_whitespace().count() > 1
                && s.classifier.is_meaningful(text)
                && !s.classifier.is_fragmented(text)
                && !s.classifier.is_table_or_form(text)
        },
        padding: " ",
    },
    TitleStep {
        name: "largest",
        wanted: is_empty,
        select: |_, _, _| true,
        padding: "  ",
    },
    TitleStep {
        name: "title-case-run",
        wanted: |title| trimmed_len(title) < 10,
        select: |text, _, s| {
            text.chars().count() > 10
                && !s.classifier.is_fragmented(text)
                && !s.classifier.is_table_or_form(text)
                && THREE_TITLE_WORDS.is_match(text)
        },
        padding: "  ",
    },
    TitleStep {
        name: "capitalized-run",
        wanted: |title| trimmed_len(title) < 5,
        select: |text, _, s| {
            text.chars().count() > 5
                && !s.classifier.is_fragmented(text)
                && !s.classifier.is_table_or_form(text)
                && (TWO_TITLE_WORDS.is_match(text) || CAPS_RUN.is_match(text))
        },
        padding: "  ",
    },
    TitleStep {
        name: "first-complete",
        wanted: |title| trimmed_len(title) < 3,
        select: |text, _, s| text.chars().count() > 3 && !s.classifier.is_fragmented(text),
        padding: "  ",
    },
];

/// Chooses the document title and applies the resume corrections.
#[derive(Debug, Clone, Copy)]
pub struct TitleSelector<'a> {
    classifier: &'a SpanClassifier,
    context: DocumentContext,
    legacy_padding: bool,
}

impl<'a> TitleSelector<'a> {
    pub fn new(
        classifier: &'a SpanClassifier,
        context: DocumentContext,
        legacy_padding: bool,
    ) -> Self {
        Self {
            classifier,
            context,
            legacy_padding,
        }
    }

    /// Run the cascade over (merged) first-page fragments.
    ///
    /// A title containing a URL shape is blanked.
    pub fn select(&self, first_page: &[Fragment]) -> String {
        let mut ordered: Vec<&Fragment> = first_page.iter().collect();
        ordered.sort_by(|a, b| {
            b.font_size
                .total_cmp(&a.font_size)
                .then_with(|| a.bbox.y0.total_cmp(&b.bbox.y0))
        });

        let mut title = String::new();
        for step in TITLE_STEPS {
            if !(step.wanted)(&title) {
                continue;
            }
            let found = ordered
                .iter()
                .map(|fragment| (fragment.text.trim(), *fragment))
                .find(|(text, fragment)| (step.select)(text, fragment, self));
            if let Some((text, _)) = found {
                log::trace!("Title step {} chose {:?}", step.name, text);
                title = format!("{}{}", text, step.padding);
            }
        }

        if URL.is_match(&title) {
            log::debug!("Discarding URL-shaped title {:?}", title);
            title.clear();
        }
        self.finish(title)
    }

    /// Replace a "name | role" style title with a person name found among
    /// the first three outline entries.
    pub fn resume_override(&self, title: String, outline: &[OutlineItem]) -> String {
        let name = outline
            .iter()
            .take(3)
            .map(|item| item.text.trim())
            .find(|text| is_person_name(text));

        match name {
            Some(name) if title.contains('|') || self.classifier.mentions_job_title(&title) => {
                log::debug!("Using person name {:?} as title", name);
                self.finish(format!("{} ", name))
            }
            _ => title,
        }
    }

    /// Collapse three or more very short entries on one page into a single
    /// leading H1 entry.
    pub fn merge_short_headings(&self, outline: Vec<OutlineItem>) -> Vec<OutlineItem> {
        if outline.len() <= 1 {
            return outline;
        }
        let (short, long): (Vec<OutlineItem>, Vec<OutlineItem>) = outline
            .iter()
            .cloned()
            .partition(|item| item.text.trim().chars().count() <= 5);
        let Some(page) = short.first().map(|item| item.page) else {
            return outline;
        };
        if short.len() < 3 || short.iter().any(|item| item.page != page) {
            return outline;
        }

        let merged = short
            .iter()
            .map(|item| item.text.trim())
            .collect::<Vec<_>>()
            .join(" ");
        if merged.chars().count() > 50 || self.classifier.is_fragmented(&merged) {
            return outline;
        }

        log::debug!("Merged {} short headings into {:?}", short.len(), merged);
        let text = self.finish(format!("{} ", merged));
        std::iter::once(OutlineItem::new(HeadingLevel::H1, text, page))
            .chain(long)
            .collect()
    }

    fn finish(&self, text: String) -> String {
        if self.legacy_padding {
            text
        } else {
            text.trim().to_string()
        }
    }
}
