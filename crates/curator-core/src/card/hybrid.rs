//! AI-preferred parsing with rule-based fallback.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::ocr::CardImage;
use super::parser::{CardParser, RuleBasedParser};
use super::CardAnalyzer;
use crate::error::AnalysisError;
use crate::models::card::ParsedCard;
use crate::models::config::{AiMode, CuratorConfig};
use crate::timing::Stopwatch;

/// Which path produced a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseSource {
    Ai,
    Rules,
}

/// Result of a hybrid parse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardExtraction {
    /// Extracted card.
    pub card: ParsedCard,
    /// Path that produced the card.
    pub source: ParseSource,
    /// Why the analyzer result was not used, when it was tried.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Card parser that consults an analyzer according to an [`AiMode`].
pub struct HybridCardParser {
    rules: RuleBasedParser,
    analyzer: Option<Arc<dyn CardAnalyzer>>,
    mode: AiMode,
}

impl HybridCardParser {
    /// Rules-only parser.
    pub fn new(rules: RuleBasedParser) -> Self {
        Self {
            rules,
            analyzer: None,
            mode: AiMode::Off,
        }
    }

    /// Build from configuration. Without an analyzer, prefer mode behaves
    /// like off and only mode fails every parse.
    pub fn from_config(config: &CuratorConfig, analyzer: Option<Arc<dyn CardAnalyzer>>) -> Self {
        Self {
            rules: RuleBasedParser::from_config(&config.parser),
            analyzer,
            mode: config.ai.mode,
        }
    }

    /// Set the analyzer.
    pub fn with_analyzer(mut self, analyzer: Arc<dyn CardAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// Set the mode.
    pub fn with_mode(mut self, mode: AiMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> AiMode {
        self.mode
    }

    pub fn rules(&self) -> &RuleBasedParser {
        &self.rules
    }

    /// Parse a card.
    ///
    /// Only [`AiMode::Only`] can return an error; prefer mode logs the
    /// analyzer failure and returns the rule-based card instead.
    pub async fn parse(
        &self,
        raw_text: &str,
        image: Option<&CardImage>,
    ) -> Result<CardExtraction, AnalysisError> {
        let start = Stopwatch::start();

        let (card, source, fallback_reason) = match self.mode {
            AiMode::Off => (self.rules.parse(raw_text), ParseSource::Rules, None),
            AiMode::Prefer => match self.analyze(raw_text, image).await {
                Ok(card) => (card, ParseSource::Ai, None),
                Err(e) => {
                    if matches!(e, AnalysisError::NotConfigured(_)) {
                        debug!(error = %e, "No analyzer, using rule-based parser");
                    } else {
                        warn!(error = %e, "AI request failed, using fallback");
                    }
                    (
                        self.rules.parse(raw_text),
                        ParseSource::Rules,
                        Some(e.to_string()),
                    )
                }
            },
            AiMode::Only => (self.analyze(raw_text, image).await?, ParseSource::Ai, None),
        };

        let processing_time_ms = start.elapsed_ms();
        info!(
            source = ?source,
            fields = card.filled_fields(),
            processing_time_ms,
            "Card parsed"
        );

        Ok(CardExtraction {
            card,
            source,
            fallback_reason,
            processing_time_ms,
        })
    }

    async fn analyze(
        &self,
        raw_text: &str,
        image: Option<&CardImage>,
    ) -> Result<ParsedCard, AnalysisError> {
        let analyzer = self
            .analyzer
            .as_ref()
            .ok_or_else(|| AnalysisError::NotConfigured("no analyzer set".to_string()))?;

        debug!(analyzer = analyzer.name(), image = image.is_some(), "Calling analyzer");
        let card = analyzer.analyze(raw_text, image).await?.normalized();
        if card.is_empty() {
            return Err(AnalysisError::MissingFields);
        }
        Ok(card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    const TEXT: &str = "Jane Roe\nAcme Corp.\njane@acme.com";

    struct FixedAnalyzer(ParsedCard);

    #[async_trait]
    impl CardAnalyzer for FixedAnalyzer {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn analyze(
            &self,
            _raw_text: &str,
            _image: Option<&CardImage>,
        ) -> Result<ParsedCard, AnalysisError> {
            Ok(self.0.clone())
        }
    }

    struct FailingAnalyzer;

    #[async_trait]
    impl CardAnalyzer for FailingAnalyzer {
        fn name(&self) -> &str {
            "failing"
        }

        async fn analyze(
            &self,
            _raw_text: &str,
            _image: Option<&CardImage>,
        ) -> Result<ParsedCard, AnalysisError> {
            Err(AnalysisError::Timeout)
        }
    }

    fn ai_card() -> ParsedCard {
        ParsedCard {
            name: " Jane Roe, CPA ".to_string(),
            company: "Acme Corp.".to_string(),
            email: vec!["Jane@Acme.com".to_string(), "jane@acme.com".to_string()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_off_uses_rules() {
        let parser = HybridCardParser::new(RuleBasedParser::new())
            .with_analyzer(Arc::new(FixedAnalyzer(ai_card())));

        let result = parser.parse(TEXT, None).await.unwrap();
        assert_eq!(result.source, ParseSource::Rules);
        assert_eq!(result.card.name, "Jane Roe");
        assert_eq!(result.fallback_reason, None);
    }

    #[tokio::test]
    async fn test_prefer_uses_normalized_ai_card() {
        let parser = HybridCardParser::new(RuleBasedParser::new())
            .with_analyzer(Arc::new(FixedAnalyzer(ai_card())))
            .with_mode(AiMode::Prefer);

        let result = parser.parse(TEXT, None).await.unwrap();
        assert_eq!(result.source, ParseSource::Ai);
        assert_eq!(result.card.name, "Jane Roe, CPA");
        assert_eq!(result.card.email, vec!["jane@acme.com"]);
    }

    #[tokio::test]
    async fn test_prefer_falls_back_on_error() {
        let parser = HybridCardParser::new(RuleBasedParser::new())
            .with_analyzer(Arc::new(FailingAnalyzer))
            .with_mode(AiMode::Prefer);

        let result = parser.parse(TEXT, None).await.unwrap();
        assert_eq!(result.source, ParseSource::Rules);
        assert_eq!(result.card.company, "Acme Corp.");
        assert_eq!(result.fallback_reason.as_deref(), Some("request timed out"));
    }

    #[tokio::test]
    async fn test_prefer_falls_back_on_empty_card() {
        let parser = HybridCardParser::new(RuleBasedParser::new())
            .with_analyzer(Arc::new(FixedAnalyzer(ParsedCard::default())))
            .with_mode(AiMode::Prefer);

        let result = parser.parse(TEXT, None).await.unwrap();
        assert_eq!(result.source, ParseSource::Rules);
        assert_eq!(result.card.email, vec!["jane@acme.com"]);
    }

    #[tokio::test]
    async fn test_prefer_without_analyzer() {
        let parser = HybridCardParser::new(RuleBasedParser::new()).with_mode(AiMode::Prefer);

        let result = parser.parse(TEXT, None).await.unwrap();
        assert_eq!(result.source, ParseSource::Rules);
        assert!(result.fallback_reason.is_some());
    }

    #[tokio::test]
    async fn test_only_propagates_error() {
        let parser = HybridCardParser::new(RuleBasedParser::new())
            .with_analyzer(Arc::new(FailingAnalyzer))
            .with_mode(AiMode::Only);

        let err = parser.parse(TEXT, None).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Timeout));
    }

    #[tokio::test]
    async fn test_from_config_reads_mode() {
        let mut config = CuratorConfig::default();
        config.ai.mode = AiMode::Only;

        let parser = HybridCardParser::from_config(&config, None);
        assert_eq!(parser.mode(), AiMode::Only);
        assert!(matches!(
            parser.parse(TEXT, None).await,
            Err(AnalysisError::NotConfigured(_))
        ));
    }
}
