//! Text-only span classification.
//!
//! [`SpanClassifier`] answers three independent questions about a piece of
//! text: is it meaningful, does it look like a broken fragment, and does it
//! look like table or form content. Each question is an ordered list of named
//! rules, so callers can ask not only *whether* a text was rejected but *which*
//! rule rejected it.

mod lexicon;
pub(crate) mod patterns;

pub use lexicon::Lexicon;

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};
use patterns::*;

/// Trimmed text with the measurements every rule needs.
#[derive(Debug, Clone)]
pub struct TextProbe<'a> {
    /// Trimmed text
    pub text: &'a str,
    /// Length in characters
    pub len: usize,
    /// Whitespace-separated words
    pub words: Vec<&'a str>,
}

impl<'a> TextProbe<'a> {
    pub fn new(text: &'a str) -> Self {
        let text = text.trim();
        Self {
            text,
            len: text.chars().count(),
            words: text.split_whitespace().collect(),
        }
    }

    /// Number of words.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}

/// A named text predicate. A rule *fires* when its test returns true.
#[derive(Clone, Copy)]
pub struct TextRule {
    pub name: &'static str,
    pub test: fn(&TextProbe<'_>, &SpanClassifier) -> bool,
}

impl std::fmt::Debug for TextRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("TextRule").field(&self.name).finish()
    }
}

/// Rules that mark text as meaningless.
static MEANINGLESS_RULES: &[TextRule] = &[
    TextRule {
        name: "empty",
        test: |p, _| p.len == 0,
    },
    TextRule {
        name: "numeric",
        test: |p, _| DIGITS_ONLY.is_match(p.text),
    },
    TextRule {
        name: "symbols-only",
        test: |p, _| SYMBOLS_ONLY.is_match(p.text),
    },
    TextRule {
        name: "bullets-only",
        test: |p, _| BULLETS_ONLY.is_match(p.text),
    },
    TextRule {
        name: "separator-run",
        test: |p, _| ["---", "___", "===", "***"].iter().any(|s| p.text.starts_with(s)),
    },
];

/// Rules that mark text as a broken or non-heading fragment.
static FRAGMENT_RULES: &[TextRule] = &[
    TextRule {
        name: "too-short",
        test: |p, _| p.len < 2,
    },
    TextRule {
        name: "short-single-word",
        test: |p, _| p.word_count() == 1 && p.len < 3,
    },
    TextRule {
        name: "ends-single-letter",
        test: |p, _| ENDS_SINGLE_LETTER.is_match(p.text),
    },
    TextRule {
        name: "starts-single-letter",
        test: |p, _| STARTS_SINGLE_LETTER.is_match(p.text),
    },
    TextRule {
        name: "camel-break",
        test: |p, _| p.len < 6 && CAMEL_BREAK.is_match(p.text),
    },
    TextRule {
        name: "wide-spacing",
        test: |p, _| WIDE_SPACING.is_match(p.text),
    },
    TextRule {
        name: "repeated-character",
        test: |p, _| has_char_run(p.text, 4),
    },
    TextRule {
        name: "repeated-word",
        test: |p, _| p.words.windows(2).any(|pair| pair[0] == pair[1]),
    },
    TextRule {
        name: "abbreviation-fragment",
        test: |p, _| ABBREVIATION_FRAGMENT.is_match(p.text),
    },
    TextRule {
        name: "url",
        test: |p, _| URL.is_match(p.text),
    },
    TextRule {
        name: "numeric",
        test: |p, _| DIGITS_ONLY.is_match(p.text),
    },
    TextRule {
        name: "date",
        test: |p, _| is_date_shaped(p.text),
    },
    TextRule {
        name: "parenthesized",
        test: |p, _| PARENTHESIZED.is_match(p.text),
    },
    TextRule {
        name: "punctuation-only",
        test: |p, _| NON_WORD_ONLY.is_match(p.text),
    },
    TextRule {
        name: "too-long",
        test: |p, _| p.len > 100,
    },
    TextRule {
        name: "too-many-words",
        test: |p, _| p.word_count() > 8,
    },
    TextRule {
        name: "prose-words",
        test: |p, c| p.word_count() > 4 && c.function_word_count(p) >= 2,
    },
    TextRule {
        name: "lowercase-start",
        test: |p, _| p.word_count() <= 3 && LOWERCASE_START.is_match(p.text),
    },
    TextRule {
        name: "dangling-end",
        test: |p, c| {
            p.word_count() > 1 && p.words.last().is_some_and(|w| c.dangling_words.contains(*w))
        },
    },
    TextRule {
        name: "dangling-start",
        test: |p, c| {
            p.word_count() > 1 && p.words.first().is_some_and(|w| c.dangling_words.contains(*w))
        },
    },
    TextRule {
        name: "email",
        test: |p, _| EMAIL_FRAGMENT.is_match(p.text),
    },
    TextRule {
        name: "one-sided-parenthetical",
        test: |p, _| OPEN_PAREN_ONLY.is_match(p.text) || CLOSE_PAREN_ONLY.is_match(p.text),
    },
    TextRule {
        name: "lowercase-period-end",
        test: |p, _| LOWERCASE_PERIOD_END.is_match(p.text),
    },
    TextRule {
        name: "bullet-start",
        test: |p, _| BULLET_START.is_match(p.text),
    },
];

/// Rules that mark text as table cells, form fields or form instructions.
static TABLE_FORM_RULES: &[TextRule] = &[
    TextRule {
        name: "field-terminator",
        test: |p, _| COLON_OR_PERIOD_END.is_match(p.text) && !NUMBERED_SECTION.is_match(p.text),
    },
    TextRule {
        name: "single-word",
        test: |p, _| p.word_count() == 1 && p.len <= 15,
    },
    TextRule {
        name: "arithmetic",
        test: |p, _| ARITHMETIC.is_match(p.text),
    },
    TextRule {
        name: "email",
        test: |p, _| EMAIL_FRAGMENT.is_match(p.text),
    },
    TextRule {
        name: "url",
        test: |p, _| URL.is_match(p.text),
    },
    TextRule {
        name: "numeric-or-date",
        test: |p, _| DIGITS_ONLY.is_match(p.text) || is_date_shaped(p.text),
    },
    TextRule {
        name: "punctuation-only",
        test: |p, _| NON_WORD_ONLY.is_match(p.text),
    },
    TextRule {
        name: "bullet-start",
        test: |p, _| BULLET_START.is_match(p.text),
    },
    TextRule {
        name: "too-short",
        test: |p, _| p.len < 3,
    },
    TextRule {
        name: "too-many-words",
        test: |p, _| p.word_count() > 8,
    },
    TextRule {
        name: "tabular-row",
        test: |p, _| TABULAR_ROW.is_match(p.text),
    },
    TextRule {
        name: "admin-term",
        test: |p, c| c.admin_terms.as_ref().is_some_and(|re| re.is_match(p.text)),
    },
    TextRule {
        name: "instruction-verb",
        test: |p, c| c.instruction_verbs.as_ref().is_some_and(|re| re.is_match(p.text)),
    },
];

lazy_static! {
    static ref DEFAULT_CLASSIFIER: SpanClassifier =
        SpanClassifier::new(Lexicon::default()).expect("default lexicon patterns compile");
}

/// Classifies text spans using fixed surface patterns and a [`Lexicon`].
#[derive(Debug, Clone)]
pub struct SpanClassifier {
    lexicon: Lexicon,
    admin_terms: Option<Regex>,
    instruction_verbs: Option<Regex>,
    job_titles: Option<Regex>,
    resume_sections: HashSet<String>,
    function_words: HashSet<String>,
    dangling_words: HashSet<String>,
}

impl SpanClassifier {
    /// Build a classifier, compiling the lexicon-driven patterns once.
    pub fn new(lexicon: Lexicon) -> Result<Self> {
        let compile = |words: &[String], table: &str| -> Result<Option<Regex>> {
            lexicon::whole_word_pattern(words)
                .map(|pattern| {
                    Regex::new(&pattern)
                        .map_err(|e| Error::Config(format!("invalid {} table: {}", table, e)))
                })
                .transpose()
        };

        let admin_terms = compile(&lexicon.admin_terms, "admin_terms")?;
        let instruction_verbs = compile(&lexicon.instruction_verbs, "instruction_verbs")?;
        let job_titles = compile(&lexicon.job_titles, "job_titles")?;

        let resume_sections = lexicon
            .resume_sections
            .iter()
            .map(|s| s.trim().to_uppercase())
            .collect();
        let function_words = lexicon
            .function_words
            .iter()
            .map(|s| s.trim().to_lowercase())
            .collect();
        let dangling_words = lexicon
            .dangling_words
            .iter()
            .map(|s| s.trim().to_string())
            .collect();

        Ok(Self {
            lexicon,
            admin_terms,
            instruction_verbs,
            job_titles,
            resume_sections,
            function_words,
            dangling_words,
        })
    }

    /// The word tables this classifier was built from.
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Whether the text carries any content worth classifying.
    pub fn is_meaningful(&self, text: &str) -> bool {
        self.meaningless_reason(text).is_none()
    }

    /// Name of the rule that makes the text meaningless, if any.
    pub fn meaningless_reason(&self, text: &str) -> Option<&'static str> {
        self.first_firing(MEANINGLESS_RULES, &TextProbe::new(text))
    }

    /// Whether the text looks like a broken piece of a larger line, or like
    /// running prose rather than a heading.
    pub fn is_fragmented(&self, text: &str) -> bool {
        self.fragmented_reason(text).is_some()
    }

    /// Name of the rule that makes the text fragmented, if any.
    pub fn fragmented_reason(&self, text: &str) -> Option<&'static str> {
        self.first_firing(FRAGMENT_RULES, &TextProbe::new(text))
    }

    /// Whether the text looks like a table cell, form field or instruction.
    ///
    /// Known section names are exempt regardless of the other rules.
    pub fn is_table_or_form(&self, text: &str) -> bool {
        self.table_or_form_reason(text).is_some()
    }

    /// Name of the rule that makes the text table/form-like, if any.
    pub fn table_or_form_reason(&self, text: &str) -> Option<&'static str> {
        let probe = TextProbe::new(text);
        if self.is_resume_section(probe.text) {
            return None;
        }
        self.first_firing(TABLE_FORM_RULES, &probe)
    }

    /// Case-insensitive exact match against the section allowlist.
    pub fn is_resume_section(&self, text: &str) -> bool {
        self.resume_sections.contains(&text.trim().to_uppercase())
    }

    /// Number of words that are function words, ignoring case and
    /// surrounding punctuation.
    pub fn function_word_count(&self, probe: &TextProbe<'_>) -> usize {
        probe
            .words
            .iter()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
            .filter(|w| self.function_words.contains(w))
            .count()
    }

    /// Whether the text mentions a job-title keyword as a whole word.
    pub fn mentions_job_title(&self, text: &str) -> bool {
        self.job_titles.as_ref().is_some_and(|re| re.is_match(text))
    }

    fn first_firing(&self, rules: &[TextRule], probe: &TextProbe<'_>) -> Option<&'static str> {
        rules
            .iter()
            .find(|rule| (rule.test)(probe, self))
            .map(|rule| rule.name)
    }
}

impl Default for SpanClassifier {
    fn default() -> Self {
        DEFAULT_CLASSIFIER.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> SpanClassifier {
        SpanClassifier::default()
    }

    #[test]
    fn test_meaningful() {
        let c = classifier();
        assert!(c.is_meaningful("Introduction"));
        assert_eq!(c.meaningless_reason(""), Some("empty"));
        assert_eq!(c.meaningless_reason("1 "), Some("numeric"));
        assert_eq!(c.meaningless_reason("--- ***"), Some("symbols-only"));
        assert_eq!(c.meaningless_reason("• ●"), Some("bullets-only"));
        assert_eq!(c.meaningless_reason("=== Part One"), Some("separator-run"));
    }

    #[test]
    fn test_fragmented_shapes() {
        let c = classifier();
        assert!(!c.is_fragmented("Annual Report"));
        assert!(!c.is_fragmented("1. Introduction"));
        assert_eq!(c.fragmented_reason("A"), Some("too-short"));
        assert_eq!(c.fragmented_reason("Summary of a"), Some("ends-single-letter"));
        assert_eq!(c.fragmented_reason("Mission    Statement"), Some("wide-spacing"));
        assert_eq!(c.fragmented_reason("Hmmmm"), Some("repeated-character"));
        assert_eq!(c.fragmented_reason("Hello Hello World"), Some("repeated-word"));
        assert_eq!(c.fragmented_reason("RFP: To"), Some("abbreviation-fragment"));
        assert_eq!(c.fragmented_reason("RFP: RFP"), Some("abbreviation-fragment"));
        assert_eq!(c.fragmented_reason("www.example.org"), Some("url"));
        assert_eq!(c.fragmented_reason("March 21, 2003"), Some("date"));
        assert_eq!(c.fragmented_reason("(see below)"), Some("parenthesized"));
        assert_eq!(c.fragmented_reason("(see below"), Some("one-sided-parenthetical"));
        assert_eq!(c.fragmented_reason("IntRo"), Some("camel-break"));
        assert!(!c.is_fragmented("McKinsey Report"));
    }

    #[test]
    fn test_fragmented_length_limit() {
        let c = classifier();
        let long = ["Alphaabcdefghijklmno", "Bravoabcdefghijklmno", "Charlieabcdefghijklm"]
            .join(" ");
        assert!(!c.is_fragmented(&long));

        let long = format!("{} Deltaabcdefghijklmno Echoabcdefghijklmnop", long);
        assert_eq!(long.chars().count(), 104);
        assert_eq!(c.fragmented_reason(&long), Some("too-long"));
    }

    #[test]
    fn test_repeated_word_compares_whole_tokens() {
        let c = classifier();
        assert_eq!(c.fragmented_reason("Data Data Review"), Some("repeated-word"));
        assert_ne!(c.fragmented_reason("Sources of funding"), Some("repeated-word"));
        assert_ne!(c.fragmented_reason("Data Database"), Some("repeated-word"));
        assert_ne!(c.fragmented_reason("Data data"), Some("repeated-word"));
        assert!(!c.is_fragmented("Data Database"));
    }

    #[test]
    fn test_fragmented_prose() {
        let c = classifier();
        assert_eq!(
            c.fragmented_reason("The quick brown fox jumps over the lazy dog today"),
            Some("too-many-words")
        );
        assert_eq!(
            c.fragmented_reason("Results of the survey in Ontario"),
            Some("prose-words")
        );
        assert_eq!(c.fragmented_reason("quick notes"), Some("lowercase-start"));
        assert_eq!(c.fragmented_reason("Proposal for"), Some("dangling-end"));
        assert_eq!(c.fragmented_reason("of Public Ontario Libraries"), Some("dangling-start"));
        assert_eq!(c.fragmented_reason("The end is near."), Some("lowercase-period-end"));
        assert_eq!(c.fragmented_reason("• Item one"), Some("bullet-start"));
    }

    #[test]
    fn test_table_or_form() {
        let c = classifier();
        assert_eq!(c.table_or_form_reason("adithi@example.com"), Some("email"));
        assert_eq!(c.table_or_form_reason("Name:"), Some("field-terminator"));
        assert_eq!(c.table_or_form_reason("Overview"), Some("single-word"));
        assert_eq!(c.table_or_form_reason("Net Income = Revenue"), Some("arithmetic"));
        assert_eq!(c.table_or_form_reason("4 credits of Math"), Some("tabular-row"));
        assert_eq!(c.table_or_form_reason("Total Amount Paid"), Some("admin-term"));
        assert_eq!(c.table_or_form_reason("Applicants Must Attend"), Some("instruction-verb"));
        assert!(!c.is_table_or_form("1. Introduction"));
        assert!(!c.is_table_or_form("Annual Report"));
    }

    #[test]
    fn test_resume_sections_are_exempt() {
        let c = classifier();
        assert!(!c.is_table_or_form("EDUCATION"));
        assert!(!c.is_table_or_form("Technical Skills"));
        assert!(c.is_resume_section(" personal projects "));
        assert!(c.is_table_or_form("SKILLS"));
    }

    #[test]
    fn test_function_words_and_job_titles() {
        let c = classifier();
        let probe = TextProbe::new("Plans for the Future, and Beyond");
        assert_eq!(c.function_word_count(&probe), 3);
        assert!(c.mentions_job_title("Jane Doe | senior engineer"));
        assert!(!c.mentions_job_title("Engineering Handbook"));
    }

    #[test]
    fn test_custom_lexicon() {
        let lexicon = Lexicon {
            admin_terms: vec!["Invoice".to_string()],
            instruction_verbs: Vec::new(),
            ..Lexicon::default()
        };
        let c = SpanClassifier::new(lexicon).unwrap();
        assert!(c.is_table_or_form("Invoice Summary Sheet"));
        assert!(!c.is_table_or_form("Total Amount Paid"));
        assert!(!c.is_table_or_form("Applicants Must Attend"));
    }
}
