//! Error types for the curator-core library.

use thiserror::Error;

/// Main error type for the curator library.
#[derive(Error, Debug)]
pub enum CuratorError {
    /// AI-assisted card analysis error.
    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// OCR text source error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Contact store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Image decoding or format detection error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors from the external card analyzer.
///
/// Every variant is recoverable: callers in prefer mode fall back to the
/// rule-based parser.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// No analyzer is configured (missing API key, disabled provider).
    #[error("analyzer not configured: {0}")]
    NotConfigured(String),

    /// Transport-level failure.
    #[error("request failed: {0}")]
    Request(String),

    /// The request exceeded its deadline.
    #[error("request timed out")]
    Timeout,

    /// Provider answered with a non-success status.
    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Provider returned no usable candidate (blocked, empty).
    #[error("empty response: {0}")]
    EmptyResponse(String),

    /// Response text was not the expected JSON object.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Response parsed but carried none of the card fields.
    #[error("response is missing card fields")]
    MissingFields,
}

/// Errors from the OCR text source.
#[derive(Error, Debug)]
pub enum OcrError {
    /// No OCR provider is configured.
    #[error("OCR not configured: {0}")]
    NotConfigured(String),

    /// Transport-level failure.
    #[error("request failed: {0}")]
    Request(String),

    /// The request exceeded its deadline.
    #[error("request timed out")]
    Timeout,

    /// Provider answered with a non-success status.
    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Provider reported an error for the image.
    #[error("provider error: {0}")]
    Provider(String),

    /// The image contained no recognizable text.
    #[error("no text detected")]
    NoTextDetected,
}

/// Errors from the contact store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The backing file is not a valid contact list.
    #[error("corrupt store {path}: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// No contact with the given id.
    #[error("contact not found: {0}")]
    NotFound(String),
}

/// Result type for the curator library.
pub type Result<T> = std::result::Result<T, CuratorError>;
