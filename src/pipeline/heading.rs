//! Heading candidacy.
//!
//! A fragment is first screened by the reject rules (any firing rule rejects
//! it), then offered to the accept rules (any firing rule accepts it). The
//! accept list is permissive: nothing downstream brings back a
//! rejected fragment.

use serde::Serialize;

use crate::classify::patterns::*;
use crate::classify::{SpanClassifier, TextProbe};
use crate::model::Fragment;

use super::context::DocumentContext;

/// What a heading rule sees: the trimmed text plus the style signals.
#[derive(Debug, Clone)]
pub struct HeadingProbe<'a> {
    pub text: TextProbe<'a>,
    pub size_ratio: f64,
    pub bold: bool,
}

impl<'a> HeadingProbe<'a> {
    pub fn new(fragment: &'a Fragment, context: &DocumentContext) -> Self {
        Self {
            text: TextProbe::new(&fragment.text),
            size_ratio: context.size_ratio(fragment.font_size),
            bold: fragment.bold,
        }
    }

    fn words(&self) -> usize {
        self.text.word_count()
    }
}

/// A named heading predicate.
#[derive(Clone, Copy)]
pub struct HeadingRule {
    pub name: &'static str,
    pub test: fn(&HeadingProbe<'_>, &SpanClassifier) -> bool,
}

impl std::fmt::Debug for HeadingRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("HeadingRule").field(&self.name).finish()
    }
}

/// Any firing rule rejects the fragment.
pub static REJECT_RULES: &[HeadingRule] = &[
    HeadingRule {
        name: "meaningless",
        test: |p, c| !c.is_meaningful(p.text.text),
    },
    HeadingRule {
        name: "too-long",
        test: |p, _| p.text.len > 80,
    },
    HeadingRule {
        name: "fragmented",
        test: |p, c| c.is_fragmented(p.text.text),
    },
    HeadingRule {
        name: "table-or-form",
        test: |p, c| c.is_table_or_form(p.text.text),
    },
    HeadingRule {
        name: "url",
        test: |p, _| URL.is_match(p.text.text),
    },
    HeadingRule {
        name: "abbreviation-label",
        test: |p, _| CAPS_ABBREVIATION_COLON.is_match(p.text.text),
    },
    HeadingRule {
        name: "short-lowercase-word",
        test: |p, _| p.text.len < 8 && SHORT_LOWERCASE_WORD.is_match(p.text.text),
    },
    HeadingRule {
        name: "date",
        test: |p, _| TITLE_CASE_DATE.is_match(p.text.text),
    },
    HeadingRule {
        name: "empty-numbered-item",
        test: |p, _| EMPTY_NUMBERED.is_match(p.text.text),
    },
    HeadingRule {
        name: "prose-phrase",
        test: |p, c| p.words() > 4 && c.function_word_count(&p.text) >= 2,
    },
];

/// Any firing rule accepts the fragment.
pub static ACCEPT_RULES: &[HeadingRule] = &[
    HeadingRule {
        name: "larger-than-body",
        test: |p, _| p.size_ratio >= 1.2,
    },
    HeadingRule {
        name: "bold-body-size",
        test: |p, _| p.bold && p.size_ratio >= 1.0,
    },
    HeadingRule {
        name: "all-caps-larger",
        test: |p, _| p.size_ratio >= 1.1 && p.text.len > 2 && is_upper_cased(p.text.text),
    },
    HeadingRule {
        name: "numbered-subsection",
        test: |p, _| NUMBERED_SUBSECTION.is_match(p.text.text),
    },
    HeadingRule {
        name: "numbered-section",
        test: |p, _| NUMBERED_SECTION.is_match(p.text.text),
    },
    HeadingRule {
        name: "caps-label",
        test: |p, _| CAPS_COLON.is_match(p.text.text),
    },
    HeadingRule {
        name: "caps-phrase",
        test: |p, _| p.words() <= 4 && CAPS_PHRASE.is_match(p.text.text),
    },
    HeadingRule {
        name: "resume-section",
        test: |p, c| c.is_resume_section(p.text.text),
    },
    HeadingRule {
        name: "email-address",
        test: |p, _| EMAIL_ADDRESS.is_match(p.text.text),
    },
    HeadingRule {
        name: "phone-number",
        test: |p, _| PHONE_NUMBER.is_match(p.text.text),
    },
    HeadingRule {
        name: "title-case-phrase",
        test: |p, c| {
            p.words() <= 4
                && p.size_ratio >= 1.1
                && TITLE_CASE_START.is_match(p.text.text)
                && c.function_word_count(&p.text) == 0
        },
    },
    HeadingRule {
        name: "bold-short",
        test: |p, _| p.bold && p.words() <= 6,
    },
    HeadingRule {
        name: "numbered-prefix",
        test: |p, _| NUMBERED_PREFIX.is_match(p.text.text),
    },
    HeadingRule {
        name: "bold-medium",
        test: |p, _| p.bold && p.words() <= 8,
    },
    HeadingRule {
        name: "number-dot",
        test: |p, _| NUMBER_DOT.is_match(p.text.text),
    },
    HeadingRule {
        name: "title-case-start",
        test: |p, _| p.words() <= 6 && TITLE_CASE_START.is_match(p.text.text),
    },
    HeadingRule {
        name: "body-size-catch-all",
        test: |p, _| p.size_ratio >= 1.0 && p.words() <= 8,
    },
];

/// Name used when no accept rule fires.
pub const NO_ACCEPTING_RULE: &str = "no-accepting-rule";

/// Outcome of heading candidacy, with the deciding rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "rule", rename_all = "lowercase")]
pub enum HeadingDecision {
    Accepted(&'static str),
    Rejected(&'static str),
}

impl HeadingDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, HeadingDecision::Accepted(_))
    }

    /// Name of the deciding rule.
    pub fn rule(&self) -> &'static str {
        match self {
            HeadingDecision::Accepted(rule) | HeadingDecision::Rejected(rule) => rule,
        }
    }
}

/// Decides heading candidacy against one document's context.
#[derive(Debug, Clone, Copy)]
pub struct HeadingSelector<'a> {
    classifier: &'a SpanClassifier,
    context: DocumentContext,
}

impl<'a> HeadingSelector<'a> {
    pub fn new(classifier: &'a SpanClassifier, context: DocumentContext) -> Self {
        Self {
            classifier,
            context,
        }
    }

    /// Run the reject rules, then the accept rules.
    pub fn decide(&self, fragment: &Fragment) -> HeadingDecision {
        let probe = HeadingProbe::new(fragment, &self.context);
        let fires = |rule: &&HeadingRule| (rule.test)(&probe, self.classifier);

        if let Some(rule) = REJECT_RULES.iter().find(fires) {
            return HeadingDecision::Rejected(rule.name);
        }
        match ACCEPT_RULES.iter().find(fires) {
            Some(rule) => HeadingDecision::Accepted(rule.name),
            None => HeadingDecision::Rejected(NO_ACCEPTING_RULE),
        }
    }

    pub fn is_candidate(&self, fragment: &Fragment) -> bool {
        self.decide(fragment).is_accepted()
    }

    /// Keep the fragments that qualify as headings, in input order.
    pub fn select(&self, fragments: &[Fragment]) -> Vec<Fragment> {
        fragments
            .iter()
            .filter(|fragment| {
                let decision = self.decide(fragment);
                log::trace!(
                    "page {} {:?}: {:?}",
                    fragment.page,
                    fragment.text,
                    decision
                );
                decision.is_accepted()
            })
            .cloned()
            .collect()
    }
}
