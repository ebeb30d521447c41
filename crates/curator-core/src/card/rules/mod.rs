//! Rule-based extractors for business card text.
//!
//! Pattern extractors (`emails`, `phones`) scan the whole text blob.
//! Line extractors (`address`, `company`, `position`, `name`) walk the
//! normalized lines and claim the ones they use.

pub mod address;
pub mod classify;
pub mod company;
pub mod emails;
pub mod name;
pub mod patterns;
pub mod phones;
pub mod position;
pub mod vocab;

pub use address::extract_address;
pub use classify::LineClassifier;
pub use company::{company_from_email, extract_company};
pub use emails::{extract_emails, EmailExtractor};
pub use name::extract_name;
pub use phones::{digits_of, extract_phones, PhoneExtractor};
pub use position::extract_position;

/// Trait for pattern extractors working on the whole text.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value matched in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte span in the source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }

    /// Start offset, or `usize::MAX` when unknown.
    pub fn start(&self) -> usize {
        self.position.map(|(s, _)| s).unwrap_or(usize::MAX)
    }
}

/// Phones and emails found in the text, consulted by the line extractors.
#[derive(Debug, Clone, Copy)]
pub struct ContactHints<'a> {
    pub phones: &'a [String],
    pub emails: &'a [String],
}
