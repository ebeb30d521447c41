//! Phone number extraction and digit-based deduplication.

use std::ops::Range;

use regex::Regex;

use super::patterns::{
    PHONE_AREA_CODE, PHONE_EXTENSION, PHONE_INTERNATIONAL, PHONE_LANDLINE, PHONE_LOCAL,
    PHONE_MOBILE, PHONE_SHORT,
};
use super::{ExtractionMatch, FieldExtractor};

/// Minimum digits for a phone candidate.
pub const MIN_PHONE_DIGITS: usize = 7;
/// Maximum digits for a phone candidate (E.164 limit).
pub const MAX_PHONE_DIGITS: usize = 15;

/// Phone field extractor.
///
/// Output order is by digit count, longest first, then by position in the
/// text.
pub struct PhoneExtractor {
    patterns: Vec<&'static Regex>,
}

impl PhoneExtractor {
    pub fn new() -> Self {
        Self {
            patterns: vec![
                &PHONE_INTERNATIONAL,
                &PHONE_AREA_CODE,
                &PHONE_MOBILE,
                &PHONE_LANDLINE,
                &PHONE_SHORT,
                &PHONE_EXTENSION,
                &PHONE_LOCAL,
            ],
        }
    }

    fn candidates(&self, text: &str) -> Vec<Candidate> {
        let mut found = Vec::new();

        for pattern in &self.patterns {
            for m in pattern.find_iter(text) {
                let display = m.as_str().split_whitespace().collect::<Vec<_>>().join(" ");
                let digits = digits_of(&display);
                if (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len()) {
                    found.push(Candidate {
                        display,
                        digits,
                        source: m.as_str().to_string(),
                        start: m.start(),
                        end: m.end(),
                    });
                }
            }
        }

        found
    }
}

impl PhoneExtractor {
    /// Every phone-shaped match in `text` with its digits, before
    /// deduplication. Matches from different patterns may overlap.
    pub fn spans(&self, text: &str) -> Vec<(Range<usize>, String)> {
        self.candidates(text)
            .into_iter()
            .map(|c| (c.start..c.end, c.digits))
            .collect()
    }
}

impl Default for PhoneExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PhoneExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        dedupe(self.candidates(text))
            .into_iter()
            .map(|c| ExtractionMatch::new(c.display, c.source).with_position(c.start, c.end))
            .collect()
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    display: String,
    digits: String,
    source: String,
    start: usize,
    end: usize,
}

/// Drop candidates whose digits sit inside a longer candidate's digits,
/// collapse exact digit duplicates to their longest form, and order the
/// survivors.
///
/// A short number that happens to repeat the tail of an unrelated longer
/// one is dropped as well; there is no way to tell the two apart from the
/// digits alone.
fn dedupe(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut kept: Vec<Candidate> = Vec::new();

    for candidate in &candidates {
        let contained = candidates.iter().any(|other| {
            other.digits.len() > candidate.digits.len() && other.digits.contains(&candidate.digits)
        });
        if contained {
            continue;
        }

        match kept.iter_mut().find(|k| k.digits == candidate.digits) {
            Some(existing) => {
                if candidate.display.len() > existing.display.len() {
                    *existing = candidate.clone();
                }
            }
            None => kept.push(candidate.clone()),
        }
    }

    kept.sort_by(|a, b| {
        b.digits
            .len()
            .cmp(&a.digits.len())
            .then(a.start.cmp(&b.start))
    });
    kept
}

/// Digits of a string, in order.
pub fn digits_of(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Extract phone numbers from text.
pub fn extract_phones(text: &str) -> Vec<String> {
    PhoneExtractor::new()
        .extract_all(text)
        .into_iter()
        .map(|m| m.value)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_international_mobile() {
        let phones = extract_phones("Mobile: +63 917 555 1234");
        assert_eq!(phones, vec!["+63 917 555 1234"]);
    }

    #[test]
    fn test_digit_subset_keeps_longer() {
        let phones = extract_phones("Direct 123-4567\nMobile +63 912 123 4567");
        assert_eq!(phones, vec!["+63 912 123 4567"]);
    }

    #[test]
    fn test_local_mobile_format() {
        let phones = extract_phones("Cell 0917-555-1234");
        assert_eq!(phones, vec!["0917-555-1234"]);
    }

    #[test]
    fn test_landline_with_trunk_prefix() {
        let phones = extract_phones("Tel (02) 8812-3456");
        assert_eq!(phones, vec!["(02) 8812-3456"]);
    }

    #[test]
    fn test_order_longest_first_then_position() {
        let phones = extract_phones("T: 8812-3456\nM: +63 917 555 1234\nF: 8812-3457");
        assert_eq!(phones, vec!["+63 917 555 1234", "8812-3456", "8812-3457"]);
    }

    #[test]
    fn test_extension_kept_with_number() {
        let phones = extract_phones("Office 812 3456 789 ext. 204");
        assert_eq!(phones, vec!["812 3456 789 ext. 204"]);
    }

    #[test]
    fn test_too_few_digits_ignored() {
        assert!(extract_phones("Suite 400, Makati City 1226").is_empty());
    }

    #[test]
    fn test_match_does_not_cross_lines() {
        assert!(extract_phones("Makati City 1226\n8888 Tower").is_empty());
    }

    #[test]
    fn test_exact_duplicates_collapse() {
        let phones = extract_phones("Tel 8812-3456 / 8812 3456");
        assert_eq!(phones.len(), 1);
    }
}
