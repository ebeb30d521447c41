//! Duplicate contact detection.

use std::collections::HashSet;

use serde::Serialize;

use super::Contact;
use crate::card::rules::digits_of;
use crate::models::card::ParsedCard;

/// Minimum score reported by [`find_all_duplicates`] by default.
pub const DEFAULT_THRESHOLD: u32 = 40;

const EXACT_SCORE: u32 = 80;
const SIMILAR_SCORE: u32 = 50;

const EMAIL_POINTS: u32 = 50;
const PHONE_POINTS: u32 = 40;
const SAME_NAME_POINTS: u32 = 45;
const SIMILAR_NAME_POINTS: u32 = 20;
const COMPANY_POINTS: u32 = 10;

/// Strings longer than this are compared by word overlap.
const LONG_STRING_CHARS: usize = 100;

/// How closely a contact matches an existing one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Similar,
    #[default]
    None,
}

/// Best match of a candidate against existing contacts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DuplicateResult {
    pub is_duplicate: bool,
    pub match_type: MatchType,
    pub matched_contact: Option<Contact>,
    /// Match score (0-145).
    pub score: u32,
    pub reasons: Vec<String>,
}

/// One entry of [`find_all_duplicates`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateMatch {
    pub contact: Contact,
    pub score: u32,
    pub reasons: Vec<String>,
}

fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn percent(part: f64, whole: f64) -> u32 {
    (part / whole * 100.0).round() as u32
}

/// Similarity of two strings from 0 to 100, ignoring case and spacing.
pub fn string_similarity(a: &str, b: &str) -> u32 {
    let s1 = normalize(a);
    let s2 = normalize(b);

    if s1 == s2 {
        return 100;
    }
    if s1.is_empty() || s2.is_empty() {
        return 0;
    }

    let c1: Vec<char> = s1.chars().collect();
    let c2: Vec<char> = s2.chars().collect();
    let max_len = c1.len().max(c2.len());
    let len_diff = c1.len().abs_diff(c2.len());

    if len_diff as f64 > max_len as f64 * 0.5 {
        return percent((max_len - len_diff) as f64, max_len as f64);
    }

    if s1.contains(&s2) || s2.contains(&s1) {
        return 80;
    }

    if max_len > LONG_STRING_CHARS {
        let w1: HashSet<&str> = s1.split(' ').collect();
        let w2: HashSet<&str> = s2.split(' ').collect();
        let overlap = w1.intersection(&w2).count();
        return percent(overlap as f64, w1.len().max(w2.len()) as f64);
    }

    let distance = levenshtein(&c1, &c2);
    percent((max_len - distance) as f64, max_len as f64)
}

/// Edit distance with a single rolling row.
fn levenshtein(a: &[char], b: &[char]) -> usize {
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Score a candidate card against one saved contact.
fn score_pair(candidate: &ParsedCard, existing: &Contact) -> (u32, Vec<String>) {
    let mut score = 0;
    let mut reasons = Vec::new();

    let same_email = candidate.email.iter().any(|a| {
        let a = normalize(a);
        !a.is_empty() && existing.email.iter().any(|b| normalize(b) == a)
    });
    if same_email {
        score += EMAIL_POINTS;
        reasons.push("Same email address".to_string());
    }

    let same_phone = candidate.phone.iter().any(|a| {
        let a = digits_of(a);
        !a.is_empty() && existing.phone.iter().any(|b| digits_of(b) == a)
    });
    if same_phone {
        score += PHONE_POINTS;
        reasons.push("Same phone number".to_string());
    }

    if !candidate.name.is_empty() && !existing.name.is_empty() {
        let similarity = string_similarity(&candidate.name, &existing.name);
        if similarity >= 90 {
            score += SAME_NAME_POINTS;
            reasons.push("Same name".to_string());
        } else if similarity >= 70 {
            score += SIMILAR_NAME_POINTS;
            reasons.push("Similar name".to_string());
        }
    }

    if !candidate.company.is_empty()
        && !existing.company.is_empty()
        && string_similarity(&candidate.company, &existing.company) >= 80
    {
        score += COMPANY_POINTS;
        reasons.push("Same company".to_string());
    }

    (score, reasons)
}

/// Find the best match for a card among existing contacts.
///
/// Stops at the first exact match.
pub fn check_duplicate(candidate: &ParsedCard, existing: &[Contact]) -> DuplicateResult {
    let mut result = DuplicateResult::default();

    for contact in existing {
        let (score, reasons) = score_pair(candidate, contact);
        if score <= result.score {
            continue;
        }

        result.score = score;
        result.reasons = reasons;
        result.matched_contact = Some(contact.clone());

        if score >= EXACT_SCORE {
            result.is_duplicate = true;
            result.match_type = MatchType::Exact;
            return result;
        } else if score >= SIMILAR_SCORE {
            result.is_duplicate = true;
            result.match_type = MatchType::Similar;
        }
    }

    result
}

/// Every saved contact scoring at least `threshold` against `contact`,
/// best first. The contact itself is skipped.
pub fn find_all_duplicates(
    contact: &Contact,
    existing: &[Contact],
    threshold: u32,
) -> Vec<DuplicateMatch> {
    let candidate = contact.card();
    let mut matches: Vec<DuplicateMatch> = existing
        .iter()
        .filter(|other| other.id != contact.id)
        .filter_map(|other| {
            let (score, reasons) = score_pair(&candidate, other);
            (score >= threshold && score > 0).then(|| DuplicateMatch {
                contact: other.clone(),
                score,
                reasons,
            })
        })
        .collect();

    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contacts::ContactSource;
    use pretty_assertions::assert_eq;

    fn contact(name: &str, company: &str, phone: &[&str], email: &[&str]) -> Contact {
        let card = ParsedCard {
            name: name.to_string(),
            company: company.to_string(),
            phone: phone.iter().map(|p| p.to_string()).collect(),
            email: email.iter().map(|e| e.to_string()).collect(),
            ..Default::default()
        };
        Contact::from_card(card, ContactSource::Manual)
    }

    #[test]
    fn test_string_similarity() {
        assert_eq!(string_similarity("Jane  Roe", "jane roe "), 100);
        assert_eq!(string_similarity("", "Jane"), 0);
        assert_eq!(string_similarity("Jo", "Jonathan Smith"), 14);
        assert_eq!(string_similarity("Acme Corp", "Acme Corp."), 80);
        assert_eq!(string_similarity("Maria Santos", "Maria Santoz"), 92);
        assert_eq!(string_similarity("jon", "jan"), 67);
    }

    #[test]
    fn test_long_strings_use_word_overlap() {
        let a = "alpha beta gamma delta ".repeat(6);
        let b = a.replace("delta", "omega");
        assert_eq!(string_similarity(&a, &b), 75);
    }

    #[test]
    fn test_exact_duplicate_by_email_and_name() {
        let saved = vec![
            contact("Someone Else", "", &[], &["other@acme.com"]),
            contact("Jane Roe", "Acme", &[], &["jane@acme.com"]),
        ];
        let card = ParsedCard {
            name: "Jane Roe".to_string(),
            email: vec!["JANE@acme.com".to_string()],
            ..Default::default()
        };

        let result = check_duplicate(&card, &saved);
        assert!(result.is_duplicate);
        assert_eq!(result.match_type, MatchType::Exact);
        assert_eq!(result.score, 95);
        assert_eq!(result.reasons, vec!["Same email address", "Same name"]);
        assert_eq!(result.matched_contact.map(|c| c.id), Some(saved[1].id.clone()));
    }

    #[test]
    fn test_similar_by_email_only() {
        let saved = vec![contact("J. Roe", "", &[], &["jane@acme.com"])];
        let card = ParsedCard {
            name: "Jane Roe".to_string(),
            email: vec!["jane@acme.com".to_string()],
            ..Default::default()
        };

        let result = check_duplicate(&card, &saved);
        assert_eq!(result.match_type, MatchType::Similar);
        assert_eq!(result.score, 50);
    }

    #[test]
    fn test_phone_digits_alone_is_not_duplicate() {
        let saved = vec![contact("Jane Roe", "", &["+63 917 555 1234"], &[])];
        let card = ParsedCard {
            name: "Pedro Cruz".to_string(),
            phone: vec!["+63-917-555-1234".to_string()],
            ..Default::default()
        };

        let result = check_duplicate(&card, &saved);
        assert!(!result.is_duplicate);
        assert_eq!(result.match_type, MatchType::None);
        assert_eq!(result.score, 40);
    }

    #[test]
    fn test_find_all_sorted_and_skips_self() {
        let me = contact("Jane Roe", "Acme Corp", &["8812-3456"], &["jane@acme.com"]);
        let saved = vec![
            me.clone(),
            contact("Jane Roe", "Acme Corp", &[], &[]),
            contact("Pedro Cruz", "", &["88123456"], &["jane@acme.com"]),
            contact("Nobody", "Other", &[], &[]),
        ];

        let found = find_all_duplicates(&me, &saved, DEFAULT_THRESHOLD);
        let scores: Vec<u32> = found.iter().map(|m| m.score).collect();
        assert_eq!(scores, vec![90, 55]);
        assert_eq!(found[0].contact.name, "Pedro Cruz");
    }
}
