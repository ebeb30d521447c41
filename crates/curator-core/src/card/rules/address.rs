//! Multi-line postal address extraction.

use tracing::debug;

use super::patterns::{EDGE_SEPARATORS, PHONE_LABEL_TAIL, POSTAL_CODE, STREET_NUMBER};
use super::phones::{digits_of, PhoneExtractor};
use super::vocab::{has_address_keyword, is_country, COUNTRY};
use crate::card::lines::{CardLines, Field, LineClaims};

const MIN_ADDRESS_LINE_CHARS: usize = 4;

/// True if a line reads as part of a postal address.
pub fn is_address_line(line: &str) -> bool {
    if has_address_keyword(line) || STREET_NUMBER.is_match(line) {
        return true;
    }
    if POSTAL_CODE.is_match(line) && COUNTRY.is_match(line) {
        return true;
    }

    // "Philippines", "Singapore 0491"
    let without_postal = POSTAL_CODE.replace_all(line, "");
    is_country(&without_postal)
}

/// Remove embedded phone numbers and the label they leave behind.
///
/// A number is matched by its digits, so a phone printed with different
/// punctuation than the extracted one is removed too.
fn clean_address_line(line: &str, phones: &[String]) -> String {
    let mut cleaned = line.split_whitespace().collect::<Vec<_>>().join(" ");

    let phone_digits: Vec<String> = phones.iter().map(|p| digits_of(p)).collect();
    let mut spans: Vec<_> = PhoneExtractor::new()
        .spans(&cleaned)
        .into_iter()
        .filter(|(_, digits)| phone_digits.iter().any(|p| p.contains(digits.as_str())))
        .map(|(span, _)| span)
        .collect();
    spans.sort_by_key(|span| span.start);

    if !spans.is_empty() {
        let mut kept = String::with_capacity(cleaned.len());
        let mut cursor = 0;
        for span in spans {
            if span.end <= cursor {
                continue;
            }
            kept.push_str(&cleaned[cursor..span.start.max(cursor)]);
            kept.push(' ');
            cursor = span.end;
        }
        kept.push_str(&cleaned[cursor..]);

        cleaned = kept.split_whitespace().collect::<Vec<_>>().join(" ");
        cleaned = PHONE_LABEL_TAIL.replace(&cleaned, "").into_owned();
    }

    EDGE_SEPARATORS.replace_all(&cleaned, "").into_owned()
}

/// Collect every unclaimed address line, join them with `", "` in source
/// order and claim them.
///
/// The lines need not be adjacent. Returns an empty string when no line
/// qualifies.
pub fn extract_address(lines: &CardLines, claims: &mut LineClaims, phones: &[String]) -> String {
    let mut parts = Vec::new();
    let mut used = Vec::new();

    for (index, line) in lines.unclaimed(claims) {
        if !is_address_line(line) {
            continue;
        }

        let cleaned = clean_address_line(line, phones);
        if cleaned.chars().count() < MIN_ADDRESS_LINE_CHARS {
            debug!(line = index, "Address line too short after cleaning");
            continue;
        }

        parts.push(cleaned);
        used.push(index);
    }

    for index in &used {
        claims.claim(*index, Field::Address);
    }

    debug!(lines = ?used, "Address lines");
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(text: &str, phones: &[&str]) -> (String, LineClaims) {
        let lines = CardLines::new(text);
        let phones: Vec<String> = phones.iter().map(|p| p.to_string()).collect();
        let mut claims = LineClaims::new();
        let address = extract_address(&lines, &mut claims, &phones);
        (address, claims)
    }

    #[test]
    fn test_joins_address_lines_in_order() {
        let (address, claims) = run("123 Main Street\nSuite 400\nMakati City 1226\nJohn Doe", &[]);
        assert_eq!(address, "123 Main Street, Suite 400, Makati City 1226");
        assert_eq!(claims.claimed_by(Field::Address), vec![0, 1, 2]);
    }

    #[test]
    fn test_non_adjacent_lines() {
        let (address, _) = run("Unit 5, Tower One\nJane Roe\nAyala Avenue\nPhilippines", &[]);
        assert_eq!(address, "Unit 5, Tower One, Ayala Avenue, Philippines");
    }

    #[test]
    fn test_strips_merged_phone_and_label() {
        let (address, _) = run("Ayala Avenue, Makati City Tel: 8812-3456", &["8812-3456"]);
        assert_eq!(address, "Ayala Avenue, Makati City");
    }

    #[test]
    fn test_strips_phone_printed_differently() {
        let (address, _) = run("Rizal Avenue (02) 8812 3456", &["(02) 8812-3456"]);
        assert_eq!(address, "Rizal Avenue");
    }

    #[test]
    fn test_skips_claimed_lines() {
        let lines = CardLines::new("Acme Tower\n45 Orchard Road");
        let mut claims = LineClaims::new();
        claims.claim(0, Field::Company);

        let address = extract_address(&lines, &mut claims, &[]);
        assert_eq!(address, "45 Orchard Road");
        assert_eq!(claims.owner(0), Some(Field::Company));
    }

    #[test]
    fn test_abbreviation_needs_period() {
        let (address, _) = run("Master Stylist\nRizal St., Cebu", &[]);
        assert_eq!(address, "Rizal St., Cebu");
    }

    #[test]
    fn test_no_address() {
        let (address, claims) = run("John Doe\nAcme Corp.", &[]);
        assert_eq!(address, "");
        assert!(claims.is_empty());
    }
}
