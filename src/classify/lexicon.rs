//! Word tables consulted by the classifier.
//!
//! These are data, not control flow: a JSON options file can replace any of
//! them without touching the rules that use them.

use serde::{Deserialize, Serialize};

/// Section names that are exempt from table/form rejection and are accepted
/// as headings on an exact (case-insensitive) match.
const RESUME_SECTIONS: &[&str] = &[
    "EDUCATION",
    "EXPERIENCE",
    "ACHIEVEMENTS",
    "CERTIFICATIONS",
    "PERSONAL PROJECTS",
    "TECHNICAL SKILLS",
    "INTERESTS",
    "AWARDS",
    "PUBLICATIONS",
    "LANGUAGES",
    "VOLUNTEER",
    "LEADERSHIP",
    "ACTIVITIES",
    "HONORS",
    "MEMBERSHIPS",
    "REFERENCES",
];

/// Administrative vocabulary typical of forms and tables.
const ADMIN_TERMS: &[&str] = &[
    "credit", "credits", "GPA", "maintain", "overall", "whether", "permanent", "temporary",
    "single", "married", "amount", "total", "rs.", "usd", "name", "date", "signature", "phone",
    "email", "address", "relationship", "balance", "account", "number", "id", "s.no", "serial",
    "no.", "cost", "price", "value", "sum", "paid", "received", "due", "advance", "grant", "loan",
    "payment", "installment", "required", "needed", "requested", "applied", "approved", "form",
    "application", "request", "proposal", "document", "ltc", "leave", "travel", "concession",
    "service", "pay", "si", "npa", "da", "hra", "ta", "pf", "esi", "gst", "tds", "yes", "no",
    "true", "false", "check", "mark", "government", "servant", "employee", "officer", "staff",
    "full-time", "part-time", "divorced", "widowed",
];

/// Verbs that mark form instructions.
const INSTRUCTION_VERBS: &[&str] = &[
    "must", "should", "need", "require", "maintain", "achieve", "complete", "fill", "enter",
    "write", "sign", "date", "initial", "approve", "authorize",
];

/// Common words of running prose.
const FUNCTION_WORDS: &[&str] = &[
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is", "are",
    "was", "were", "has", "have", "had", "will", "would", "could", "should",
];

/// Prepositions and conjunctions that cannot end or start a complete heading.
const DANGLING_WORDS: &[&str] = &[
    "to", "for", "in", "on", "at", "with", "by", "of", "the", "and", "or", "but",
];

/// Job-title keywords that reveal a "name | role" title line.
const JOB_TITLES: &[&str] = &[
    "Manager",
    "Director",
    "Officer",
    "President",
    "Vice",
    "Chief",
    "Head",
    "Lead",
    "Senior",
    "Junior",
    "Assistant",
    "Coordinator",
    "Specialist",
    "Analyst",
    "Consultant",
    "Advisor",
    "Representative",
    "Executive",
    "Administrator",
    "Supervisor",
    "Technician",
    "Engineer",
    "Developer",
    "Designer",
    "Architect",
];

/// Tunable word tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    /// Section headings always treated as headings
    pub resume_sections: Vec<String>,
    /// Administrative terms (matched as whole words, any case)
    pub admin_terms: Vec<String>,
    /// Instruction verbs (matched as whole words, any case)
    pub instruction_verbs: Vec<String>,
    /// Function words counted in long phrases
    pub function_words: Vec<String>,
    /// Words that leave a phrase dangling when first or last
    pub dangling_words: Vec<String>,
    /// Job-title keywords (matched as whole words, any case)
    pub job_titles: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            resume_sections: to_owned(RESUME_SECTIONS),
            admin_terms: to_owned(ADMIN_TERMS),
            instruction_verbs: to_owned(INSTRUCTION_VERBS),
            function_words: to_owned(FUNCTION_WORDS),
            dangling_words: to_owned(DANGLING_WORDS),
            job_titles: to_owned(JOB_TITLES),
        }
    }
}

fn to_owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Build a case-insensitive whole-word alternation, e.g. `(?i)\b(?:a|b)\b`.
///
/// Returns `None` for an empty table so that callers never compile a pattern
/// that matches everything.
pub(crate) fn whole_word_pattern(words: &[String]) -> Option<String> {
    let alternatives: Vec<String> = words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .map(regex::escape)
        .collect();
    if alternatives.is_empty() {
        return None;
    }
    Some(format!(r"(?i)\b(?:{})\b", alternatives.join("|")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_are_populated() {
        let lexicon = Lexicon::default();
        assert_eq!(lexicon.resume_sections.len(), 16);
        assert!(lexicon.admin_terms.iter().any(|t| t == "GPA"));
        assert!(lexicon.job_titles.iter().any(|t| t == "Engineer"));
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let lexicon: Lexicon = serde_json::from_str(r#"{"job_titles":["Wizard"]}"#).unwrap();
        assert_eq!(lexicon.job_titles, vec!["Wizard".to_string()]);
        assert_eq!(lexicon.function_words, Lexicon::default().function_words);
    }

    #[test]
    fn test_whole_word_pattern_escapes_terms() {
        let pattern = whole_word_pattern(&["s.no".to_string(), "full-time".to_string()]).unwrap();
        assert_eq!(pattern, r"(?i)\b(?:s\.no|full\-time)\b");
        assert!(whole_word_pattern(&[" ".to_string()]).is_none());
    }
}
