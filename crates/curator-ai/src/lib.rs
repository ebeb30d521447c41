//! HTTP service clients for curator.
//!
//! This crate implements the service traits of `curator-core`:
//! - [`GeminiAnalyzer`] reads a card with the Gemini `generateContent`
//!   API, either directly or through a proxy endpoint
//! - [`CloudVisionOcr`] turns a card image into text with Cloud Vision
//!   `DOCUMENT_TEXT_DETECTION`

mod gemini;
pub mod prompt;
mod vision;

pub use gemini::{card_from_text, GeminiAnalyzer};
pub use vision::CloudVisionOcr;

use std::time::Duration;

/// Build an HTTP client with a request deadline.
pub(crate) fn http_client(timeout_secs: u64) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .user_agent(concat!("curator/", env!("CARGO_PKG_VERSION")))
        .build()
}
