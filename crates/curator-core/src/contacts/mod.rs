//! Saved contacts, their store and duplicate detection.

pub mod duplicates;
mod store;

pub use duplicates::{
    check_duplicate, find_all_duplicates, string_similarity, DuplicateMatch, DuplicateResult,
    MatchType, DEFAULT_THRESHOLD,
};
pub use store::JsonFileStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::card::CardImage;
use crate::error::StoreError;
use crate::models::card::ParsedCard;

/// Folder shown for contacts without one.
pub const DEFAULT_FOLDER: &str = "Uncategorized";

/// How a contact's fields were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactSource {
    Ai,
    Rules,
    Manual,
}

/// A saved business card contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Opaque unique id.
    pub id: String,

    pub name: String,
    pub position: String,
    pub company: String,
    #[serde(default)]
    pub phone: Vec<String>,
    #[serde(default)]
    pub email: Vec<String>,
    pub address: String,

    /// Free-form user notes.
    #[serde(default)]
    pub notes: String,

    /// Folder or group name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,

    /// Text the card was parsed from.
    #[serde(default)]
    pub raw_text: String,

    /// Recognition confidence (0-100).
    #[serde(default)]
    pub confidence: f32,

    /// Scanned card image as a `data:` URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,

    pub source: ContactSource,

    /// Reviewed by a person.
    #[serde(default)]
    pub is_verified: bool,

    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Contact {
    /// New contact with a fresh id from a parsed card.
    pub fn from_card(card: ParsedCard, source: ContactSource) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: card.name,
            position: card.position,
            company: card.company,
            phone: card.phone,
            email: card.email,
            address: card.address,
            notes: String::new(),
            folder: None,
            raw_text: String::new(),
            confidence: 0.0,
            image_data: None,
            source,
            is_verified: false,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn with_raw_text(mut self, raw_text: impl Into<String>) -> Self {
        self.raw_text = raw_text.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    pub fn with_image(mut self, image: &CardImage) -> Self {
        self.image_data = Some(image.to_data_url());
        self
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence.clamp(0.0, 100.0);
        self
    }

    /// The six card fields.
    pub fn card(&self) -> ParsedCard {
        ParsedCard {
            name: self.name.clone(),
            position: self.position.clone(),
            company: self.company.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
        }
    }

    pub fn folder_name(&self) -> &str {
        self.folder.as_deref().unwrap_or(DEFAULT_FOLDER)
    }

    /// Mark the contact as edited now.
    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

/// Persistent collection of contacts keyed by id.
pub trait ContactStore: Send + Sync {
    /// Insert, or replace the contact with the same id.
    fn save(&self, contact: &Contact) -> Result<(), StoreError>;

    /// All contacts in insertion order.
    fn get_all(&self) -> Result<Vec<Contact>, StoreError>;

    /// Contact by id.
    fn get(&self, id: &str) -> Result<Option<Contact>, StoreError>;

    /// Remove a contact. Returns false if no contact had that id.
    fn delete(&self, id: &str) -> Result<bool, StoreError>;

    /// Remove every contact.
    fn clear(&self) -> Result<(), StoreError>;
}
