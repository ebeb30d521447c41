//! Email address extraction.

use std::collections::HashSet;

use super::patterns::EMAIL;
use super::{ExtractionMatch, FieldExtractor};

/// Email field extractor.
pub struct EmailExtractor;

impl EmailExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EmailExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for EmailExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    /// Lowercased, first occurrence of each address only.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut seen = HashSet::new();

        EMAIL
            .find_iter(text)
            .filter_map(|m| {
                let email = m.as_str().to_lowercase();
                seen.insert(email.clone()).then(|| {
                    ExtractionMatch::new(email, m.as_str()).with_position(m.start(), m.end())
                })
            })
            .collect()
    }
}

/// Extract all email addresses from text.
pub fn extract_emails(text: &str) -> Vec<String> {
    EmailExtractor::new()
        .extract_all(text)
        .into_iter()
        .map(|m| m.value)
        .collect()
}
