//! Configuration structures for the card parsing pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for curator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CuratorConfig {
    /// Rule-based parser configuration.
    pub parser: ParserConfig,

    /// AI-assisted parsing configuration.
    pub ai: AiConfig,

    /// Cloud OCR configuration.
    pub ocr: OcrConfig,

    /// Contact store configuration.
    pub store: StoreConfig,
}

/// Rule-based parser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Company line scoring weights.
    pub weights: ScoringWeights,

    /// How many leading lines the last-resort name pass looks at.
    pub name_fallback_lines: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            name_fallback_lines: 5,
        }
    }
}

/// Weights for the company scoring pass.
///
/// Tuned by hand. The tagline penalty must outweigh the suffix bonus so a
/// slogan mentioning "Solutions" never wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Line contains a company suffix word.
    pub suffix: i32,
    /// Line is alphabetic ALL-CAPS (logo text).
    pub all_caps: i32,
    /// Line carries a trademark or registration glyph.
    pub trademark: i32,
    /// Line also looks like a person's name.
    pub name_like: i32,
    /// Line looks like a marketing slogan.
    pub tagline: i32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            suffix: 3,
            all_caps: 2,
            trademark: 3,
            name_like: -2,
            tagline: -5,
        }
    }
}

/// How the AI analyzer is used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiMode {
    /// Rule-based parser only.
    Off,
    /// Try the analyzer first, fall back to rules on any failure.
    #[default]
    Prefer,
    /// Analyzer only; failures are returned to the caller.
    Only,
}

impl std::str::FromStr for AiMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "off" | "rules" | "none" => Ok(Self::Off),
            "prefer" | "auto" => Ok(Self::Prefer),
            "only" | "ai" => Ok(Self::Only),
            other => Err(format!("unknown AI mode: {other}")),
        }
    }
}

/// AI analyzer (Gemini) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Whether and how the analyzer is used.
    pub mode: AiMode,

    /// Model name.
    pub model: String,

    /// API base URL (`{base_url}/models/{model}:generateContent`).
    pub base_url: String,

    /// Proxy endpoint accepting `{model, contents, generationConfig}`.
    /// When set, requests go there without an API key.
    pub proxy_url: Option<String>,

    /// Environment variables checked, in order, for the API key.
    pub api_key_env: Vec<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Send the card image along with the OCR text.
    pub send_image: bool,

    /// Sampling temperature.
    pub temperature: f32,

    /// Top-k sampling.
    pub top_k: u32,

    /// Top-p sampling.
    pub top_p: f32,

    /// Maximum output tokens.
    pub max_output_tokens: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            mode: AiMode::Prefer,
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            proxy_url: None,
            api_key_env: vec!["GEMINI_API_KEY".to_string(), "GOOGLE_API_KEY".to_string()],
            timeout_secs: 30,
            send_image: true,
            temperature: 0.1,
            top_k: 32,
            top_p: 1.0,
            max_output_tokens: 2048,
        }
    }
}

/// Cloud Vision OCR configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Annotate endpoint.
    pub endpoint: String,

    /// Environment variables checked, in order, for the API key.
    pub api_key_env: Vec<String>,

    /// Language hints passed to the recognizer.
    pub language_hints: Vec<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://vision.googleapis.com/v1/images:annotate".to_string(),
            api_key_env: vec!["GOOGLE_API_KEY".to_string(), "GEMINI_API_KEY".to_string()],
            language_hints: ["en", "tl", "zh", "ja", "ko"].iter().map(|s| s.to_string()).collect(),
            timeout_secs: 30,
        }
    }
}

/// Contact store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Contacts file. Relative paths resolve against the working directory.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("contacts.json"),
        }
    }
}

impl CuratorConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

/// First non-empty value among the named environment variables.
pub fn key_from_env(names: &[String]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}
