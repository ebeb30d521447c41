//! Card images and the OCR text source.

use std::path::Path;

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{OcrError, Result};

/// Encoded card image with its sniffed MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardImage {
    bytes: Vec<u8>,
    mime_type: String,
}

impl CardImage {
    /// Wrap encoded image bytes, detecting the format from their content.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let format = image::guess_format(&bytes)?;
        Ok(Self {
            mime_type: format.to_mime_type().to_string(),
            bytes,
        })
    }

    /// Wrap bytes whose MIME type is already known.
    pub fn with_mime_type(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Read an image file.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(bytes)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Standard base64 of the raw bytes, as sent inline to the providers.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    /// `data:` URL of the image, as kept on saved contacts.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

/// Text recognized on a card image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrText {
    /// Full text, lines separated by `\n`.
    pub text: String,

    /// Recognition confidence (0-100).
    pub confidence: f32,
}

/// Source of raw text for a card image.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Recognize the text on an image.
    ///
    /// Returns [`OcrError::NoTextDetected`] when the image holds no text.
    async fn recognize(&self, image: &CardImage) -> std::result::Result<OcrText, OcrError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 transparent PNG
    const PNG_PIXEL: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
        0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
        0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    #[test]
    fn test_sniffs_png() {
        let image = CardImage::from_bytes(PNG_PIXEL.to_vec()).unwrap();
        assert_eq!(image.mime_type(), "image/png");
        assert_eq!(image.len(), PNG_PIXEL.len());
    }

    #[test]
    fn test_sniffs_jpeg_magic() {
        let image = CardImage::from_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]).unwrap();
        assert_eq!(image.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_unknown_format_is_error() {
        assert!(CardImage::from_bytes(b"plain text".to_vec()).is_err());
    }

    #[test]
    fn test_base64() {
        let image = CardImage::with_mime_type(b"card".to_vec(), "image/png");
        assert_eq!(image.to_base64(), "Y2FyZA==");
        assert_eq!(image.to_data_url(), "data:image/png;base64,Y2FyZA==");
    }
}
