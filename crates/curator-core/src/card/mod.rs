//! Business card text structuring.

mod hybrid;
pub mod lines;
mod ocr;
mod parser;
pub mod rules;

pub use hybrid::{CardExtraction, HybridCardParser, ParseSource};
pub use lines::{CardLines, Field, LineClaims};
pub use ocr::{CardImage, OcrText, TextRecognizer};
pub use parser::{parse_text, CardParser, ParseReport, RuleBasedParser};

pub use crate::models::config::AiMode;

use async_trait::async_trait;

use crate::error::AnalysisError;
use crate::models::card::ParsedCard;

/// External service that reads a card from its text and, optionally, its
/// image.
///
/// Implementations report every failure as an error; the fallback policy
/// lives in [`HybridCardParser`].
#[async_trait]
pub trait CardAnalyzer: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &str;

    /// Analyze a card.
    async fn analyze(
        &self,
        raw_text: &str,
        image: Option<&CardImage>,
    ) -> Result<ParsedCard, AnalysisError>;
}
