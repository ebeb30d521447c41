//! Gemini `generateContent` card analyzer.

use std::time::Instant;

use async_trait::async_trait;
use curator_core::card::{CardAnalyzer, CardImage};
use curator_core::models::config::{key_from_env, AiConfig};
use curator_core::{AnalysisError, ParsedCard};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::prompt::{build_prompt, response_schema};

/// Longest error body kept in [`AnalysisError::Status`].
const MAX_ERROR_BODY: usize = 500;

#[derive(Debug, Clone)]
enum Endpoint {
    /// `{base_url}/models/{model}:generateContent?key=...`
    Direct { base_url: String, api_key: String },
    /// Relay taking `{model, contents, generationConfig}` and holding the key itself.
    Proxy { url: String },
}

/// Card analyzer backed by a Gemini model.
#[derive(Debug, Clone)]
pub struct GeminiAnalyzer {
    client: reqwest::Client,
    endpoint: Endpoint,
    model: String,
    generation: GenerationConfig,
    send_image: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    contents: Vec<Content>,
    generation_config: &'a GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    Image { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GeminiAnalyzer {
    /// Analyzer for the configured model.
    ///
    /// Uses the proxy when `proxy_url` is set, otherwise the first API key
    /// found in `api_key_env`.
    pub fn from_config(config: &AiConfig) -> Result<Self, AnalysisError> {
        if let Some(url) = config.proxy_url.as_deref().filter(|u| !u.trim().is_empty()) {
            return Self::with_proxy(config, url);
        }

        match key_from_env(&config.api_key_env) {
            Some(api_key) => Self::with_api_key(config, api_key),
            None => Err(AnalysisError::NotConfigured(format!(
                "no API key in {}",
                config.api_key_env.join(", ")
            ))),
        }
    }

    /// Analyzer calling the API directly with `api_key`.
    pub fn with_api_key(config: &AiConfig, api_key: impl Into<String>) -> Result<Self, AnalysisError> {
        let endpoint = Endpoint::Direct {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        };
        Self::build(config, endpoint)
    }

    /// Analyzer posting to a relay endpoint.
    pub fn with_proxy(config: &AiConfig, url: impl Into<String>) -> Result<Self, AnalysisError> {
        Self::build(config, Endpoint::Proxy { url: url.into() })
    }

    fn build(config: &AiConfig, endpoint: Endpoint) -> Result<Self, AnalysisError> {
        let client = crate::http_client(config.timeout_secs)
            .map_err(|e| AnalysisError::NotConfigured(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            model: config.model.clone(),
            generation: GenerationConfig {
                temperature: config.temperature,
                top_k: config.top_k,
                top_p: config.top_p,
                max_output_tokens: config.max_output_tokens,
                response_mime_type: "application/json",
                response_schema: response_schema(),
            },
            send_image: config.send_image,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        match &self.endpoint {
            Endpoint::Direct { base_url, .. } => {
                format!("{base_url}/models/{}:generateContent", self.model)
            }
            Endpoint::Proxy { url } => url.clone(),
        }
    }

    fn build_request(&self, raw_text: &str, image: Option<&CardImage>) -> GenerateRequest<'_> {
        let mut parts = vec![Part::Text {
            text: build_prompt(raw_text),
        }];

        if let Some(image) = image.filter(|img| self.send_image && !img.is_empty()) {
            parts.push(Part::Image {
                inline_data: InlineData {
                    mime_type: image.mime_type().to_string(),
                    data: image.to_base64(),
                },
            });
        }

        let model = match self.endpoint {
            Endpoint::Proxy { .. } => Some(self.model.as_str()),
            Endpoint::Direct { .. } => None,
        };

        GenerateRequest {
            model,
            contents: vec![Content { role: "user", parts }],
            generation_config: &self.generation,
        }
    }
}

#[async_trait]
impl CardAnalyzer for GeminiAnalyzer {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn analyze(
        &self,
        raw_text: &str,
        image: Option<&CardImage>,
    ) -> Result<ParsedCard, AnalysisError> {
        let start = Instant::now();
        let body = self.build_request(raw_text, image);
        debug!(model = %self.model, parts = body.contents[0].parts.len(), "Sending card to Gemini");

        let mut request = self.client.post(self.url()).json(&body);
        if let Endpoint::Direct { api_key, .. } = &self.endpoint {
            request = request.query(&[("key", api_key.as_str())]);
        }

        let response = request.send().await.map_err(request_error)?;
        let status = response.status();
        let text = response.text().await.map_err(request_error)?;

        if !status.is_success() {
            return Err(AnalysisError::Status {
                status: status.as_u16(),
                body: text.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let card = parse_response(&text)?;
        info!(
            model = %self.model,
            fields = card.filled_fields(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Gemini analysis complete"
        );
        Ok(card)
    }
}

fn request_error(e: reqwest::Error) -> AnalysisError {
    if e.is_timeout() {
        AnalysisError::Timeout
    } else {
        AnalysisError::Request(e.to_string())
    }
}

fn parse_response(body: &str) -> Result<ParsedCard, AnalysisError> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| AnalysisError::MalformedResponse(format!("unexpected envelope: {e}")))?;

    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map(|r| format!("prompt blocked ({r})"))
            .unwrap_or_else(|| "no candidates".to_string());
        return Err(AnalysisError::EmptyResponse(reason));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate
            .finish_reason
            .map(|r| format!("no text, finish reason {r}"))
            .unwrap_or_else(|| "no text".to_string());
        return Err(AnalysisError::EmptyResponse(reason));
    }

    card_from_text(&text)
}

/// Parse the model's answer into a card.
///
/// Markdown fences and any text around the outermost `{...}` are ignored.
pub fn card_from_text(text: &str) -> Result<ParsedCard, AnalysisError> {
    let cleaned = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let json = extract_json_object(cleaned)?;
    let card: ParsedCard =
        serde_json::from_str(json).map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;

    let card = card.normalized();
    if card.is_empty() {
        return Err(AnalysisError::MissingFields);
    }
    Ok(card)
}

fn extract_json_object(text: &str) -> Result<&str, AnalysisError> {
    let missing = || AnalysisError::MalformedResponse("no JSON object in answer".to_string());

    let start = text.find('{').ok_or_else(missing)?;
    let end = text.rfind('}').ok_or_else(missing)?;
    if end <= start {
        return Err(missing());
    }
    Ok(&text[start..=end])
}
