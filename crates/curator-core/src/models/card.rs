//! Structured business card record.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

/// Fields extracted from a single business card.
///
/// Every field defaults to empty; a parse never yields a missing field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedCard {
    /// Full name, possibly with honorific and credentials.
    pub name: String,

    /// Job title, optionally with department.
    pub position: String,

    /// Business entity name.
    pub company: String,

    /// Phone numbers as printed on the card.
    #[serde(deserialize_with = "string_or_seq")]
    pub phone: Vec<String>,

    /// Email addresses, lowercased.
    #[serde(deserialize_with = "string_or_seq")]
    pub email: Vec<String>,

    /// Postal address, source lines joined with ", ".
    pub address: String,
}

impl ParsedCard {
    /// True when no field carries any content.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.position.is_empty()
            && self.company.is_empty()
            && self.phone.is_empty()
            && self.email.is_empty()
            && self.address.is_empty()
    }

    /// Number of populated fields (0-6).
    pub fn filled_fields(&self) -> usize {
        [
            !self.name.is_empty(),
            !self.position.is_empty(),
            !self.company.is_empty(),
            !self.phone.is_empty(),
            !self.email.is_empty(),
            !self.address.is_empty(),
        ]
        .iter()
        .filter(|f| **f)
        .count()
    }

    /// Clean up a card produced outside the rule-based parser.
    ///
    /// Trims every field, drops blank list entries, lowercases and
    /// deduplicates emails, and removes phones repeating an earlier
    /// phone's digits.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.position = self.position.trim().to_string();
        self.company = self.company.trim().to_string();
        self.address = self.address.trim().to_string();

        let mut seen = HashSet::new();
        self.email = self
            .email
            .into_iter()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty() && seen.insert(e.clone()))
            .collect();

        let mut seen = HashSet::new();
        self.phone = self
            .phone
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| {
                let digits: String = p.chars().filter(|c| c.is_ascii_digit()).collect();
                !digits.is_empty() && seen.insert(digits)
            })
            .collect();

        self
    }
}

/// Accept either `"x"` or `["x", ...]` (or null) for list fields.
fn string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(s)) if s.trim().is_empty() => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
        None => Vec::new(),
    })
}
