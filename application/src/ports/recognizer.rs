//! Raw recognizer ports
//!
//! The built-in barcode and OCR strands turn the output of these engines
//! into strand analyses. Engines only see image bytes.

use async_trait::async_trait;
use coverscan_domain::OcrLine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecognizerError {
    #[error("Recognizer request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid recognizer response: {0}")]
    InvalidResponse(String),
}

/// One decoded barcode symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedSymbol {
    /// Symbology as reported by the reader (`EAN13`, `ISBN13`, `QRCODE`, ...)
    pub symbology: String,
    pub payload: String,
}

impl DecodedSymbol {
    pub fn new(symbology: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            symbology: symbology.into(),
            payload: payload.into(),
        }
    }

    /// Whether the symbology can carry an ISBN
    pub fn is_book_code(&self) -> bool {
        let normalized: String = self
            .symbology
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_ascii_uppercase();
        matches!(normalized.as_str(), "EAN13" | "ISBN13" | "ISBN10" | "ISBN")
    }
}

#[async_trait]
pub trait BarcodeReader: Send + Sync {
    async fn decode(&self, image: &[u8]) -> Result<Vec<DecodedSymbol>, RecognizerError>;
}

#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(&self, image: &[u8]) -> Result<Vec<OcrLine>, RecognizerError>;
}
