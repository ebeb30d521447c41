//! Per-line predicates shared by the line extractors.

use std::collections::HashSet;

use super::patterns::{
    ALL_CAPS_LINE, CAPS_WORD, INITIALS, NAME_SEQUENCE, NAME_SEQUENCE_CAPS, PROPER_WORD,
    TRADEMARK, URL,
};
use super::phones::{digits_of, MIN_PHONE_DIGITS};
use super::vocab::{
    has_company_suffix, is_country, words_lower, CREDENTIAL_SET, DETERMINER_SET, NON_NAME_SET,
    TAGLINE_OPENER, TAGLINE_WORD_SET,
};
use super::ContactHints;

/// Share of digits among non-whitespace characters above which a line is
/// treated as a phone line even when no extracted number matches it.
const PHONE_DIGIT_SHARE: f32 = 0.6;
const NAME_MIN_ALPHA: f32 = 0.8;
const NAME_MAX_WORDS: usize = 5;

/// Classifies lines against the phones and emails found in the text.
#[derive(Debug, Clone)]
pub struct LineClassifier<'a> {
    phone_digits: Vec<String>,
    emails: &'a [String],
}

impl<'a> LineClassifier<'a> {
    pub fn new(hints: ContactHints<'a>) -> Self {
        let phone_digits = hints
            .phones
            .iter()
            .map(|p| digits_of(p))
            .filter(|d| d.len() >= MIN_PHONE_DIGITS)
            .collect();

        Self {
            phone_digits,
            emails: hints.emails,
        }
    }

    /// True if the line carries an extracted phone number or is mostly
    /// digits.
    pub fn is_phone_line(&self, line: &str) -> bool {
        let digits = digits_of(line);
        if digits.is_empty() {
            return false;
        }
        if self.phone_digits.iter().any(|p| digits.contains(p.as_str())) {
            return true;
        }

        let visible = line.chars().filter(|c| !c.is_whitespace()).count();
        visible > 0 && digits.chars().count() as f32 / visible as f32 > PHONE_DIGIT_SHARE
    }

    /// True if the line contains one of the extracted email addresses.
    pub fn is_email_line(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        self.emails.iter().any(|e| lower.contains(e.as_str()))
    }

    /// True if the line holds an extracted phone number or email address.
    pub fn is_contact_line(&self, line: &str) -> bool {
        self.is_email_line(line) || self.is_phone_line(line)
    }
}

/// True if the line contains a web address marker.
pub fn is_url(line: &str) -> bool {
    URL.is_match(line)
}

/// Share of alphabetic characters among the non-whitespace characters.
pub fn alpha_ratio(line: &str) -> f32 {
    let mut visible = 0usize;
    let mut alpha = 0usize;
    for c in line.chars().filter(|c| !c.is_whitespace()) {
        visible += 1;
        if c.is_alphabetic() {
            alpha += 1;
        }
    }

    if visible == 0 {
        0.0
    } else {
        alpha as f32 / visible as f32
    }
}

/// True for an alphabetic ALL-CAPS line such as a logo or brand.
pub fn is_all_caps_line(line: &str) -> bool {
    ALL_CAPS_LINE.is_match(line) && line.chars().any(|c| c.is_alphabetic())
}

/// True if the line plausibly holds a person's name.
pub fn looks_like_name(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() || TRADEMARK.is_match(line) {
        return false;
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    if words.len() > NAME_MAX_WORDS || alpha_ratio(line) < NAME_MIN_ALPHA {
        return false;
    }
    if is_country(line) || has_company_suffix(line) {
        return false;
    }

    let lower = words_lower(line);
    if lower
        .first()
        .is_some_and(|w| DETERMINER_SET.contains(w.as_str()))
    {
        return false;
    }
    if lower.iter().any(|w| NON_NAME_SET.contains(w.as_str())) {
        return false;
    }

    words.iter().all(|w| is_name_word(w))
        || NAME_SEQUENCE.is_match(line)
        || NAME_SEQUENCE_CAPS.is_match(line)
}

fn is_name_word(word: &str) -> bool {
    let word = word.strip_suffix(',').unwrap_or(word);
    if PROPER_WORD.is_match(word) || CAPS_WORD.is_match(word) || INITIALS.is_match(word) {
        return true;
    }

    let bare = word
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    CREDENTIAL_SET.contains(bare.as_str())
}

/// True if the line reads like a marketing slogan.
pub fn looks_like_tagline(line: &str) -> bool {
    let line = line.trim();
    if TAGLINE_OPENER.is_match(line) {
        return true;
    }

    let hits: HashSet<String> = words_lower(line)
        .into_iter()
        .filter(|w| TAGLINE_WORD_SET.contains(w.as_str()))
        .collect();
    hits.len() >= 2
}

/// True if the line can be part of a multi-line company name.
pub fn is_company_part(line: &str) -> bool {
    let line = line.trim();
    if is_url(line) {
        return false;
    }

    has_company_suffix(line)
        || (is_all_caps_line(line) && line.chars().count() > 3)
        || line.starts_with('(')
}
