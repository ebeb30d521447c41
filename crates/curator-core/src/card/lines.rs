//! Line normalization and the per-parse line-claim state.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Raw OCR text split into trimmed, non-empty lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardLines {
    /// Text with line endings normalized to `\n`.
    pub text: String,
    /// Trimmed, non-empty lines in source order.
    pub lines: Vec<String>,
}

impl CardLines {
    /// Normalize line endings and split into lines.
    pub fn new(raw: &str) -> Self {
        let text = raw.replace("\r\n", "\n").replace('\r', "\n");
        let lines = text
            .split('\n')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();

        Self { text, lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Lines not yet claimed, with their indices.
    pub fn unclaimed<'a>(
        &'a self,
        claims: &'a LineClaims,
    ) -> impl Iterator<Item = (usize, &'a str)> + 'a {
        self.lines
            .iter()
            .enumerate()
            .filter(move |(i, _)| !claims.is_claimed(*i))
            .map(|(i, l)| (i, l.as_str()))
    }
}

/// Field a line was assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Email,
    Phone,
    Address,
    Company,
    Position,
    Name,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Address => "address",
            Field::Company => "company",
            Field::Position => "position",
            Field::Name => "name",
        };
        f.write_str(s)
    }
}

/// Which line went to which field during one parse.
///
/// Grows only. A line claimed once is never handed to another field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineClaims {
    owners: BTreeMap<usize, Field>,
}

impl LineClaims {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a line for a field. Returns false if it was already taken.
    pub fn claim(&mut self, index: usize, field: Field) -> bool {
        if self.owners.contains_key(&index) {
            return false;
        }
        self.owners.insert(index, field);
        true
    }

    pub fn is_claimed(&self, index: usize) -> bool {
        self.owners.contains_key(&index)
    }

    /// Field owning a line, if any.
    pub fn owner(&self, index: usize) -> Option<Field> {
        self.owners.get(&index).copied()
    }

    /// Indices claimed by one field, ascending.
    pub fn claimed_by(&self, field: Field) -> Vec<usize> {
        self.owners
            .iter()
            .filter(|(_, f)| **f == field)
            .map(|(i, _)| *i)
            .collect()
    }

    /// All claims, ascending by line index.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Field)> + '_ {
        self.owners.iter().map(|(i, f)| (*i, *f))
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_line_endings_and_blanks() {
        let lines = CardLines::new("  John Doe \r\n\r\nAcme Corp.\rSales\n   \n");
        assert_eq!(lines.lines, vec!["John Doe", "Acme Corp.", "Sales"]);
        assert!(!lines.text.contains('\r'));
    }

    #[test]
    fn test_whitespace_only_has_no_lines() {
        assert!(CardLines::new("   \n\n ").is_empty());
        assert!(CardLines::new("").is_empty());
    }

    #[test]
    fn test_claim_is_exclusive() {
        let mut claims = LineClaims::new();
        assert!(claims.claim(2, Field::Address));
        assert!(!claims.claim(2, Field::Name));
        assert_eq!(claims.owner(2), Some(Field::Address));
        assert_eq!(claims.len(), 1);
    }

    #[test]
    fn test_unclaimed_skips_claimed() {
        let lines = CardLines::new("a\nb\nc");
        let mut claims = LineClaims::new();
        claims.claim(1, Field::Company);

        let free: Vec<usize> = lines.unclaimed(&claims).map(|(i, _)| i).collect();
        assert_eq!(free, vec![0, 2]);
    }
}
