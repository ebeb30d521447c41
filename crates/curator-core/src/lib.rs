//! Core library for business card parsing.
//!
//! This crate provides:
//! - Rule-based extraction of name, position, company, phones, emails and
//!   address from raw OCR text
//! - The AI-preferred / rule-based-fallback parsing policy
//! - Traits for the external card analyzer and OCR text source
//! - Contact records, a JSON file store and duplicate detection

pub mod card;
pub mod contacts;
pub mod error;
pub mod models;
mod timing;

pub use card::{
    parse_text, AiMode, CardAnalyzer, CardExtraction, CardImage, CardParser, HybridCardParser,
    OcrText, ParseReport, ParseSource, RuleBasedParser, TextRecognizer,
};
pub use contacts::{Contact, ContactSource, ContactStore, DuplicateResult, JsonFileStore, MatchType};
pub use error::{AnalysisError, CuratorError, OcrError, Result, StoreError};
pub use models::card::ParsedCard;
pub use models::config::CuratorConfig;
