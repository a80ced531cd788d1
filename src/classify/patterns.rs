//! Fixed surface patterns shared by the classifier, the heading selector and
//! the title selector.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Contact and web shapes
    pub static ref URL: Regex = Regex::new(r"www\.|\.com|\.org|\.net|\.edu").unwrap();
    pub static ref EMAIL_FRAGMENT: Regex = Regex::new(r"@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap();
    pub static ref EMAIL_ADDRESS: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    pub static ref PHONE_NUMBER: Regex = Regex::new(r"^\+?\d[\d\s\-\(\)]+$").unwrap();

    // Symbols and glyphs
    pub static ref SYMBOLS_ONLY: Regex =
        Regex::new(r##"^[\-_=+~`!@#$%^&*()\[\]{}|\\:;"'<>?,./\s]*$"##).unwrap();
    pub static ref BULLETS_ONLY: Regex = Regex::new(
        r"^[•·▪▫○●◆◇■□►▶▸▹▻▽▼▾▿◁◀◂◃◄◅◦◧◨◩◪◫◬◭◮◯◰◱◲◳◴◵◶◷◸◹◺◻◼◽◾◿\s]*$"
    )
    .unwrap();
    pub static ref BULLET_START: Regex = Regex::new(
        r"^[\-•·▪▫○●◆◇■□►▶▸▹▻▽▼▾▿◁◀◂◃◄◅◦◧◨◩◪◫◬◭◮◯◰◱◲◳◴◵◶◷◸◹◺◻◼◽◾◿]"
    )
    .unwrap();
    pub static ref NON_WORD_ONLY: Regex = Regex::new(r"^[^\w\s]+$").unwrap();
    pub static ref ARITHMETIC: Regex = Regex::new(r"[+\-*/=]").unwrap();

    // Numbers and dates
    pub static ref DIGITS_ONLY: Regex = Regex::new(r"^\d+$").unwrap();
    pub static ref SLASH_DATE: Regex = Regex::new(r"^\d+/\d+/\d+$").unwrap();
    pub static ref DASH_DATE: Regex = Regex::new(r"^\d+-\d+-\d+$").unwrap();
    pub static ref MONTH_DAY_YEAR: Regex = Regex::new(r"^[A-Za-z]+\s+\d+,\s+\d+$").unwrap();
    pub static ref MONTH_DAY: Regex = Regex::new(r"^[A-Za-z]+\s+\d+$").unwrap();
    pub static ref DAY_MONTH_YEAR: Regex = Regex::new(r"^\d+\s+[A-Za-z]+\s+\d+$").unwrap();
    pub static ref TITLE_CASE_DATE: Regex = Regex::new(r"^[A-Z][a-z]+\s+\d+,\s+\d+$").unwrap();
    pub static ref TABULAR_ROW: Regex = Regex::new(r"^\d+\s+[A-Za-z]+\s+").unwrap();

    // Fragment shapes
    pub static ref ENDS_SINGLE_LETTER: Regex = Regex::new(r"\b[a-z]\s*$").unwrap();
    pub static ref STARTS_SINGLE_LETTER: Regex = Regex::new(r"^\s*[a-z]\b").unwrap();
    pub static ref CAMEL_BREAK: Regex = Regex::new(r"[a-z][A-Z][a-z]").unwrap();
    pub static ref WIDE_SPACING: Regex = Regex::new(r"\s{3,}").unwrap();
    pub static ref ABBREVIATION_FRAGMENT: Regex = Regex::new(r"[A-Z]{2,}:\s*[A-Za-z]{1,3}").unwrap();
    pub static ref PARENTHESIZED: Regex = Regex::new(r"^\([^)]*\)$").unwrap();
    pub static ref OPEN_PAREN_ONLY: Regex = Regex::new(r"^\([^)]*$").unwrap();
    pub static ref CLOSE_PAREN_ONLY: Regex = Regex::new(r"^[^(]*\)$").unwrap();
    pub static ref LOWERCASE_PERIOD_END: Regex = Regex::new(r"[a-z]\s*[.]\s*$").unwrap();
    pub static ref LOWERCASE_START: Regex = Regex::new(r"^[a-z]").unwrap();
    pub static ref COLON_OR_PERIOD_END: Regex = Regex::new(r"[:.]\s*$").unwrap();

    // Heading shapes
    pub static ref NUMBERED_SECTION: Regex = Regex::new(r"^\d+\.\s+[A-Z]").unwrap();
    pub static ref NUMBERED_SUBSECTION: Regex = Regex::new(r"^\d+\.\d+\s+[A-Z]").unwrap();
    pub static ref NUMBERED_PREFIX: Regex = Regex::new(r"^\d+\.\d+").unwrap();
    pub static ref NUMBER_DOT: Regex = Regex::new(r"^\d+\.").unwrap();
    pub static ref EMPTY_NUMBERED: Regex = Regex::new(r"^\d+\.\s*$").unwrap();
    pub static ref CAPS_ABBREVIATION_COLON: Regex = Regex::new(r"^[A-Z]{2,}:$").unwrap();
    pub static ref SHORT_LOWERCASE_WORD: Regex = Regex::new(r"^[a-z]+$").unwrap();
    pub static ref CAPS_COLON: Regex = Regex::new(r"^[A-Z][A-Z\s]+:$").unwrap();
    pub static ref CAPS_PHRASE: Regex = Regex::new(r"^[A-Z][A-Z\s]+$").unwrap();
    pub static ref TITLE_CASE_START: Regex = Regex::new(r"^[A-Z][a-z]+").unwrap();

    // Title shapes
    pub static ref PERSON_NAME_TITLE_CASE: Regex = Regex::new(r"^[A-Z][a-z]+\s+[A-Z][a-z]+$").unwrap();
    pub static ref PERSON_NAME_CAPS: Regex = Regex::new(r"^[A-Z]+\s+[A-Z]+$").unwrap();
    pub static ref THREE_TITLE_WORDS: Regex =
        Regex::new(r"[A-Z][a-z]+\s+[A-Z][a-z]+\s+[A-Z][a-z]+").unwrap();
    pub static ref TWO_TITLE_WORDS: Regex = Regex::new(r"[A-Z][a-z]+\s+[A-Z][a-z]+").unwrap();
    pub static ref CAPS_RUN: Regex = Regex::new(r"[A-Z][A-Z\s]+").unwrap();
}

/// Whether `text` is purely one of the recognized date shapes.
pub fn is_date_shaped(text: &str) -> bool {
    SLASH_DATE.is_match(text)
        || DASH_DATE.is_match(text)
        || MONTH_DAY_YEAR.is_match(text)
        || MONTH_DAY.is_match(text)
        || DAY_MONTH_YEAR.is_match(text)
}

/// Two-word proper-name shape in title case or all capitals.
pub fn is_person_name(text: &str) -> bool {
    (PERSON_NAME_TITLE_CASE.is_match(text) || PERSON_NAME_CAPS.is_match(text))
        && text.split_whitespace().count() == 2
}

/// Whether the text has cased letters and none of them is lowercase.
pub fn is_upper_cased(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}

/// Whether some character occurs `run` or more times in a row.
pub fn has_char_run(text: &str, run: usize) -> bool {
    let mut previous = None;
    let mut count = 0;
    for c in text.chars() {
        if Some(c) == previous {
            count += 1;
        } else {
            previous = Some(c);
            count = 1;
        }
        if count >= run {
            return true;
        }
    }
    false
}
