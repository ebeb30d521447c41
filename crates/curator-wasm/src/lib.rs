//! WASM bindings for business card parsing.
//!
//! Exposes the rule-based parser and duplicate detection to browsers and
//! Node.js. The AI path stays on the JavaScript side; its answers can be
//! checked against saved contacts with [`check_duplicate`].

use wasm_bindgen::prelude::*;

use curator_core::contacts::{self, DEFAULT_THRESHOLD};
use curator_core::models::config::{ParserConfig, ScoringWeights};
use curator_core::{CardParser as _, Contact, ContactSource, ParsedCard, RuleBasedParser};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("invalid {what}: {e}")))
}

/// Parse OCR text with the default rules.
///
/// Returns `{name, position, company, phone, email, address}`.
#[wasm_bindgen]
pub fn parse_card_text(text: &str) -> Result<JsValue, JsValue> {
    to_js(&curator_core::parse_text(text))
}

/// Best match of a card among saved contacts.
///
/// `card` is a parsed card object, `existing` an array of contacts.
#[wasm_bindgen]
pub fn check_duplicate(card: JsValue, existing: JsValue) -> Result<JsValue, JsValue> {
    let card: ParsedCard = from_js(card, "card")?;
    let existing: Vec<Contact> = from_js(existing, "contacts")?;

    to_js(&contacts::check_duplicate(&card, &existing))
}

/// Every saved contact resembling `contact`, best first.
#[wasm_bindgen]
pub fn find_duplicates(
    contact: JsValue,
    existing: JsValue,
    threshold: Option<u32>,
) -> Result<JsValue, JsValue> {
    let contact: Contact = from_js(contact, "contact")?;
    let existing: Vec<Contact> = from_js(existing, "contacts")?;
    let threshold = threshold.unwrap_or(DEFAULT_THRESHOLD);

    to_js(&contacts::find_all_duplicates(&contact, &existing, threshold))
}

/// Similarity of two strings from 0 to 100.
#[wasm_bindgen]
pub fn string_similarity(a: &str, b: &str) -> u32 {
    contacts::string_similarity(a, b)
}

/// Wrap a parsed card into a new contact with a fresh id.
#[wasm_bindgen]
pub fn new_contact(card: JsValue, raw_text: &str, from_ai: bool) -> Result<JsValue, JsValue> {
    let card: ParsedCard = from_js(card, "card")?;
    let source = if from_ai {
        ContactSource::Ai
    } else {
        ContactSource::Rules
    };

    to_js(&Contact::from_card(card.normalized(), source).with_raw_text(raw_text))
}

/// Card parser with adjustable settings.
#[wasm_bindgen]
pub struct CardParser {
    parser: RuleBasedParser,
}

#[wasm_bindgen]
impl CardParser {
    /// Create a parser with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: RuleBasedParser::new(),
        }
    }

    /// Create a parser from a `parser` config section object.
    #[wasm_bindgen]
    pub fn from_config(config: JsValue) -> Result<CardParser, JsValue> {
        let config: ParserConfig = from_js(config, "parser config")?;
        Ok(Self {
            parser: RuleBasedParser::from_config(&config),
        })
    }

    /// Set company scoring weights; missing keys keep their defaults.
    #[wasm_bindgen]
    pub fn set_weights(&mut self, weights: JsValue) -> Result<(), JsValue> {
        let weights: ScoringWeights = from_js(weights, "weights")?;
        self.parser = self.parser.clone().with_weights(weights);
        Ok(())
    }

    /// Current scoring weights.
    #[wasm_bindgen]
    pub fn weights(&self) -> Result<JsValue, JsValue> {
        to_js(&self.parser.config().weights)
    }

    /// Set how many leading lines the last-resort name pass looks at.
    #[wasm_bindgen]
    pub fn set_name_fallback_lines(&mut self, lines: usize) {
        self.parser = self.parser.clone().with_name_fallback_lines(lines);
    }

    /// Parse card text.
    #[wasm_bindgen]
    pub fn parse(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parser.parse(text))
    }

    /// Parse card text and report which field took each line.
    #[wasm_bindgen]
    pub fn parse_with_report(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parser.parse_report(text))
    }
}

impl Default for CardParser {
    fn default() -> Self {
        Self::new()
    }
}
