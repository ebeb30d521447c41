//! Cloud Vision text recognizer.

use async_trait::async_trait;
use curator_core::card::{CardImage, OcrText, TextRecognizer};
use curator_core::models::config::{key_from_env, OcrConfig};
use curator_core::OcrError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const FEATURE: &str = "DOCUMENT_TEXT_DETECTION";

/// Text recognizer calling `images:annotate`.
#[derive(Debug, Clone)]
pub struct CloudVisionOcr {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    language_hints: Vec<String>,
}

#[derive(Debug, Serialize)]
struct AnnotateRequest<'a> {
    requests: [ImageRequest<'a>; 1],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageRequest<'a> {
    image: ImageContent,
    features: [Feature; 1],
    image_context: ImageContext<'a>,
}

#[derive(Debug, Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Debug, Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageContext<'a> {
    language_hints: &'a [String],
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<ImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageResponse {
    full_text_annotation: Option<TextAnnotation>,
    error: Option<ErrorStatus>,
}

#[derive(Debug, Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    text: String,
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    confidence: f32,
}

#[derive(Debug, Deserialize)]
struct ErrorStatus {
    #[serde(default)]
    message: String,
}

impl CloudVisionOcr {
    /// Recognizer using the first API key found in `api_key_env`.
    pub fn from_config(config: &OcrConfig) -> Result<Self, OcrError> {
        let api_key = key_from_env(&config.api_key_env).ok_or_else(|| {
            OcrError::NotConfigured(format!("no API key in {}", config.api_key_env.join(", ")))
        })?;
        Self::with_api_key(config, api_key)
    }

    pub fn with_api_key(config: &OcrConfig, api_key: impl Into<String>) -> Result<Self, OcrError> {
        let client = crate::http_client(config.timeout_secs)
            .map_err(|e| OcrError::NotConfigured(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: api_key.into(),
            language_hints: config.language_hints.clone(),
        })
    }

    fn build_request(&self, image: &CardImage) -> AnnotateRequest<'_> {
        AnnotateRequest {
            requests: [ImageRequest {
                image: ImageContent {
                    content: image.to_base64(),
                },
                features: [Feature { kind: FEATURE }],
                image_context: ImageContext {
                    language_hints: &self.language_hints,
                },
            }],
        }
    }
}

#[async_trait]
impl TextRecognizer for CloudVisionOcr {
    async fn recognize(&self, image: &CardImage) -> Result<OcrText, OcrError> {
        if image.is_empty() {
            return Err(OcrError::NoTextDetected);
        }

        debug!(bytes = image.len(), mime = image.mime_type(), "Sending image to Cloud Vision");

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&self.build_request(image))
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        let body = response.text().await.map_err(request_error)?;

        if !status.is_success() {
            return Err(OcrError::Status {
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        let text = parse_annotation(&body)?;
        info!(chars = text.text.len(), confidence = text.confidence, "OCR complete");
        Ok(text)
    }
}

fn request_error(e: reqwest::Error) -> OcrError {
    if e.is_timeout() {
        OcrError::Timeout
    } else {
        OcrError::Request(e.to_string())
    }
}

fn parse_annotation(body: &str) -> Result<OcrText, OcrError> {
    let response: AnnotateResponse = serde_json::from_str(body)
        .map_err(|e| OcrError::Provider(format!("unexpected response: {e}")))?;

    let Some(first) = response.responses.into_iter().next() else {
        return Err(OcrError::NoTextDetected);
    };

    if let Some(error) = first.error {
        return Err(OcrError::Provider(error.message));
    }

    let annotation = first
        .full_text_annotation
        .filter(|a| !a.text.trim().is_empty())
        .ok_or(OcrError::NoTextDetected)?;

    let confidence = if annotation.pages.is_empty() {
        0.0
    } else {
        let sum: f32 = annotation.pages.iter().map(|p| p.confidence).sum();
        (sum / annotation.pages.len() as f32 * 100.0).clamp(0.0, 100.0)
    };

    Ok(OcrText {
        text: annotation.text,
        confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_request_shape() {
        let ocr = CloudVisionOcr::with_api_key(&OcrConfig::default(), "k").unwrap();
        let image = CardImage::with_mime_type(b"card".to_vec(), "image/png");
        let body = serde_json::to_value(ocr.build_request(&image)).unwrap();

        assert_eq!(
            body,
            json!({
                "requests": [{
                    "image": {"content": "Y2FyZA=="},
                    "features": [{"type": "DOCUMENT_TEXT_DETECTION"}],
                    "imageContext": {"languageHints": ["en", "tl", "zh", "ja", "ko"]}
                }]
            })
        );
    }

    #[test]
    fn test_parse_text_and_confidence() {
        let body = r#"{"responses": [{"fullTextAnnotation": {
            "text": "Jane Roe\nAcme Corp.\n",
            "pages": [{"confidence": 0.9}, {"confidence": 0.8}]
        }}]}"#;

        let text = parse_annotation(body).unwrap();
        assert_eq!(text.text, "Jane Roe\nAcme Corp.\n");
        assert!((text.confidence - 85.0).abs() < 0.01);
    }

    #[test]
    fn test_no_text_detected() {
        assert!(matches!(parse_annotation(r#"{"responses": [{}]}"#), Err(OcrError::NoTextDetected)));
        assert!(matches!(parse_annotation(r#"{}"#), Err(OcrError::NoTextDetected)));
        assert!(matches!(
            parse_annotation(r#"{"responses": [{"fullTextAnnotation": {"text": " \n"}}]}"#),
            Err(OcrError::NoTextDetected)
        ));
    }

    #[test]
    fn test_provider_error() {
        let body = r#"{"responses": [{"error": {"code": 3, "message": "Bad image data."}}]}"#;
        match parse_annotation(body) {
            Err(OcrError::Provider(message)) => assert_eq!(message, "Bad image data."),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_missing_key_is_not_configured() {
        let config = OcrConfig {
            api_key_env: vec!["CURATOR_TEST_KEY_THAT_IS_NEVER_SET".to_string()],
            ..OcrConfig::default()
        };
        assert!(matches!(
            CloudVisionOcr::from_config(&config),
            Err(OcrError::NotConfigured(_))
        ));
    }
}
