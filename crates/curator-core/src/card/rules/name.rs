//! Person name extraction.

use tracing::debug;

use super::classify::{
    alpha_ratio, is_all_caps_line, is_url, looks_like_name, looks_like_tagline, LineClassifier,
};
use super::patterns::{DIGITS_4, SPECIAL_CHAR, TRADEMARK};
use crate::card::lines::{CardLines, Field, LineClaims};

const FALLBACK_MIN_ALPHA: f32 = 0.7;

/// Lines no name pass ever considers: contact lines, fragments, slogans,
/// branded or noisy text.
fn is_candidate(line: &str, classifier: &LineClassifier<'_>) -> bool {
    if line.contains('@') || classifier.is_email_line(line) || classifier.is_phone_line(line) {
        return false;
    }
    if line.chars().count() < 3 || TRADEMARK.is_match(line) || looks_like_tagline(line) {
        return false;
    }
    SPECIAL_CHAR.find_iter(line).count() <= 1
}

/// Extract the person's name and claim its line.
///
/// Passes, first hit wins: a multi-word name-like line, a single name-like
/// word that is not all caps, then any mostly alphabetic line within the
/// first `window` lines.
pub fn extract_name(
    lines: &CardLines,
    claims: &mut LineClaims,
    classifier: &LineClassifier<'_>,
    window: usize,
) -> String {
    let multi_word = |line: &str| line.split_whitespace().count() >= 2 && looks_like_name(line);
    let single_word = |line: &str| {
        line.split_whitespace().count() == 1 && looks_like_name(line) && !is_all_caps_line(line)
    };
    let fallback = |line: &str| {
        !DIGITS_4.is_match(line)
            && !is_url(line)
            && alpha_ratio(line) > FALLBACK_MIN_ALPHA
    };

    let found = lines
        .unclaimed(claims)
        .find(|&(_, line)| is_candidate(line, classifier) && multi_word(line))
        .or_else(|| {
            lines
                .unclaimed(claims)
                .find(|&(_, line)| is_candidate(line, classifier) && single_word(line))
        })
        .or_else(|| {
            lines
                .unclaimed(claims)
                .take_while(|&(index, _)| index < window)
                .find(|&(_, line)| is_candidate(line, classifier) && fallback(line))
        })
        .map(|(index, line)| (index, line.to_string()));

    match found {
        Some((index, line)) => {
            debug!(line = index, "Name line");
            claims.claim(index, Field::Name);
            line
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::rules::ContactHints;
    use pretty_assertions::assert_eq;

    fn run(text: &str, phones: &[&str], emails: &[&str]) -> String {
        let lines = CardLines::new(text);
        let phones: Vec<String> = phones.iter().map(|p| p.to_string()).collect();
        let emails: Vec<String> = emails.iter().map(|e| e.to_string()).collect();
        let classifier = LineClassifier::new(ContactHints {
            phones: &phones,
            emails: &emails,
        });
        let mut claims = LineClaims::new();
        extract_name(&lines, &mut claims, &classifier, 5)
    }

    #[test]
    fn test_prefers_multi_word_name() {
        assert_eq!(run("Santos\nMaria Clara Santos", &[], &[]), "Maria Clara Santos");
    }

    #[test]
    fn test_slogan_is_never_a_name() {
        let text = "Excellence Through Innovation\nJohn Doe\nAcme Corp.";
        assert_eq!(run(text, &[], &[]), "John Doe");
    }

    #[test]
    fn test_single_word_not_all_caps() {
        assert_eq!(run("ZENTRO\nMadonna", &[], &[]), "Madonna");
    }

    #[test]
    fn test_fallback_within_window() {
        assert_eq!(run("d'la cruz, maria", &[], &[]), "d'la cruz, maria");
    }

    #[test]
    fn test_fallback_window_limit() {
        let text = "1\n22\n333\n4444\n55555\nmaria de la cruz";
        assert_eq!(run(text, &[], &[]), "");
    }

    #[test]
    fn test_skips_contact_and_noise_lines() {
        let text = "jane@acme.com\n+63 917 555 1234\n|| Jane ||\nJo";
        assert_eq!(run(text, &["+63 917 555 1234"], &["jane@acme.com"]), "");
    }

    #[test]
    fn test_claims_chosen_line() {
        let lines = CardLines::new("Acme Corp.\nJane Roe");
        let classifier = LineClassifier::new(ContactHints {
            phones: &[],
            emails: &[],
        });
        let mut claims = LineClaims::new();

        assert_eq!(extract_name(&lines, &mut claims, &classifier, 5), "Jane Roe");
        assert_eq!(claims.owner(1), Some(Field::Name));
    }
}
