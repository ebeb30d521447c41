//! Rule-based card parser: runs the extractors in priority order.

use serde::Serialize;
use tracing::{debug, info};

use super::lines::{CardLines, Field, LineClaims};
use super::rules::vocab::has_address_keyword;
use super::rules::{
    extract_address, extract_company, extract_emails, extract_name, extract_phones,
    extract_position, ContactHints, LineClassifier,
};
use crate::models::card::ParsedCard;
use crate::models::config::{ParserConfig, ScoringWeights};
use crate::timing::Stopwatch;

/// Trait for turning raw card text into a record.
pub trait CardParser {
    /// Parse raw OCR text. Never fails; unusable input gives an empty card.
    fn parse(&self, raw_text: &str) -> ParsedCard;
}

/// Outcome of a rule-based parse with its line assignments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseReport {
    /// The card.
    pub card: ParsedCard,
    /// Normalized lines the extractors worked on.
    pub lines: Vec<String>,
    /// Field owning each claimed line, ascending by line index.
    pub claims: Vec<(usize, Field)>,
    /// Processing time in microseconds.
    pub processing_time_us: u64,
}

impl ParseReport {
    /// Field that claimed a line, if any.
    pub fn owner(&self, index: usize) -> Option<Field> {
        self.claims
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, f)| *f)
    }

    /// Lines no extractor claimed.
    pub fn unclaimed_lines(&self) -> Vec<&str> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(i, _)| self.owner(*i).is_none())
            .map(|(_, l)| l.as_str())
            .collect()
    }
}

/// Deterministic parser built from regexes and vocabulary tables.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedParser {
    config: ParserConfig,
}

impl RuleBasedParser {
    /// Create a parser with default weights.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser from the `parser` config section.
    pub fn from_config(config: &ParserConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Set company scoring weights.
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.config.weights = weights;
        self
    }

    /// Set how many leading lines the last-resort name pass looks at.
    pub fn with_name_fallback_lines(mut self, lines: usize) -> Self {
        self.config.name_fallback_lines = lines;
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse and keep the per-line assignments.
    pub fn parse_report(&self, raw_text: &str) -> ParseReport {
        let start = Stopwatch::start();
        let lines = CardLines::new(raw_text);

        let email = extract_emails(&lines.text);
        let phone = extract_phones(&lines.text);
        debug!(emails = email.len(), phones = phone.len(), "Contact patterns");

        let mut claims = LineClaims::new();
        let classifier = LineClassifier::new(ContactHints {
            phones: &phone,
            emails: &email,
        });
        claim_contact_lines(&lines, &mut claims, &classifier);

        let address = extract_address(&lines, &mut claims, &phone);
        let company = extract_company(&lines, &mut claims, &email, &self.config.weights);
        let position = extract_position(&lines, &mut claims);
        let name = extract_name(
            &lines,
            &mut claims,
            &classifier,
            self.config.name_fallback_lines,
        );

        let card = ParsedCard {
            name,
            position,
            company,
            phone,
            email,
            address,
        };

        let processing_time_us = start.elapsed_us();
        info!(
            lines = lines.len(),
            fields = card.filled_fields(),
            processing_time_us,
            "Parsed card text"
        );

        ParseReport {
            card,
            lines: lines.lines,
            claims: claims.iter().collect(),
            processing_time_us,
        }
    }
}

impl CardParser for RuleBasedParser {
    fn parse(&self, raw_text: &str) -> ParsedCard {
        self.parse_report(raw_text).card
    }
}

/// Claim the lines holding an email or phone before the line extractors
/// run. A phone line that also names a street or building stays free so
/// the address extractor can cut the number out.
fn claim_contact_lines(lines: &CardLines, claims: &mut LineClaims, classifier: &LineClassifier<'_>) {
    for (index, line) in lines.lines.iter().enumerate() {
        if classifier.is_email_line(line) {
            claims.claim(index, Field::Email);
        } else if classifier.is_phone_line(line) && !has_address_keyword(line) {
            claims.claim(index, Field::Phone);
        }
    }
}

/// Parse raw card text with the default rules.
pub fn parse_text(raw_text: &str) -> ParsedCard {
    RuleBasedParser::new().parse(raw_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_contact_lines_claimed_first() {
        let report = RuleBasedParser::new()
            .parse_report("Jane Roe\njane@acme.com\n+63 917 555 1234\nAcme Corp.");

        assert_eq!(report.owner(1), Some(Field::Email));
        assert_eq!(report.owner(2), Some(Field::Phone));
        assert_eq!(report.owner(3), Some(Field::Company));
        assert_eq!(report.owner(0), Some(Field::Name));
    }

    #[test]
    fn test_phone_on_address_line_goes_to_address() {
        let report = RuleBasedParser::new()
            .parse_report("Jane Roe\nAyala Avenue, Makati City Tel: 8812-3456");

        assert_eq!(report.owner(1), Some(Field::Address));
        assert_eq!(report.card.address, "Ayala Avenue, Makati City");
        assert_eq!(report.card.phone, vec!["8812-3456"]);
    }

    #[test]
    fn test_unclaimed_lines_reported() {
        let report = RuleBasedParser::new().parse_report("Jane Roe\nAcme Corp.\nwww.acme.com");
        assert_eq!(report.unclaimed_lines(), vec!["www.acme.com"]);
    }

    #[test]
    fn test_name_window_setting() {
        let text = "Acme Corp.\nmaria de la cruz";
        let parser = RuleBasedParser::new().with_name_fallback_lines(1);
        assert_eq!(parser.parse(text).name, "");

        assert_eq!(parse_text(text).name, "maria de la cruz");
    }
}
