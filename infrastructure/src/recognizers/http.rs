//! HTTP-backed barcode and OCR engines
//!
//! Both post the raw image bytes to a recognizer service and read a JSON
//! body back:
//!
//! - barcode: `{"symbols": [{"symbology": "EAN13", "payload": "978..."}]}`
//! - OCR: `{"lines": [{"text": "...", "confidence": 0.93, "bbox": [[x, y], ...]}]}`

use async_trait::async_trait;
use coverscan_application::{BarcodeReader, DecodedSymbol, OcrEngine, RecognizerError};
use coverscan_domain::OcrLine;
use serde::Deserialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Deserialize)]
struct BarcodeResponse {
    #[serde(default)]
    symbols: Vec<DecodedSymbol>,
}

#[derive(Debug, Deserialize)]
struct OcrResponse {
    #[serde(default)]
    lines: Vec<OcrLine>,
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, RecognizerError> {
    serde_json::from_str(body).map_err(|e| RecognizerError::InvalidResponse(e.to_string()))
}

/// Shared POST-bytes-get-JSON plumbing
#[derive(Debug, Clone)]
struct RecognizerEndpoint {
    client: reqwest::Client,
    url: String,
}

impl RecognizerEndpoint {
    fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    async fn post<T: DeserializeOwned>(&self, image: &[u8]) -> Result<T, RecognizerError> {
        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await
            .map_err(|e| RecognizerError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RecognizerError::RequestFailed(format!(
                "{} returned {}",
                self.url,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RecognizerError::InvalidResponse(e.to_string()))?;
        parse_body(&body)
    }
}

/// [`BarcodeReader`] calling a remote decoder
pub struct HttpBarcodeReader {
    endpoint: RecognizerEndpoint,
}

impl HttpBarcodeReader {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            endpoint: RecognizerEndpoint::new(url),
        }
    }
}

#[async_trait]
impl BarcodeReader for HttpBarcodeReader {
    async fn decode(&self, image: &[u8]) -> Result<Vec<DecodedSymbol>, RecognizerError> {
        let response: BarcodeResponse = self.endpoint.post(image).await?;
        Ok(response.symbols)
    }
}

/// [`OcrEngine`] calling a remote text recognizer
pub struct HttpOcrEngine {
    endpoint: RecognizerEndpoint,
}

impl HttpOcrEngine {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            endpoint: RecognizerEndpoint::new(url),
        }
    }
}

#[async_trait]
impl OcrEngine for HttpOcrEngine {
    async fn recognize(&self, image: &[u8]) -> Result<Vec<OcrLine>, RecognizerError> {
        let response: OcrResponse = self.endpoint.post(image).await?;
        Ok(response.lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_barcode_body() {
        let body = r#"{"symbols":[{"symbology":"EAN13","payload":"9780132350884"}]}"#;
        let response: BarcodeResponse = parse_body(body).unwrap();
        assert_eq!(response.symbols.len(), 1);
        assert!(response.symbols[0].is_book_code());
    }

    #[test]
    fn test_parse_empty_barcode_body() {
        let response: BarcodeResponse = parse_body("{}").unwrap();
        assert!(response.symbols.is_empty());
    }

    #[test]
    fn test_parse_ocr_body() {
        let body = r#"{"lines":[{"text":"CLEAN CODE","confidence":0.92,
            "bbox":[[0,0],[200,0],[200,50],[0,50]]}]}"#;
        let response: OcrResponse = parse_body(body).unwrap();
        assert_eq!(response.lines[0].text, "CLEAN CODE");
        assert_eq!(response.lines[0].area(), 10_000.0);
    }

    #[test]
    fn test_bad_body_is_invalid_response() {
        let result: Result<OcrResponse, _> = parse_body("not json");
        assert!(matches!(result, Err(RecognizerError::InvalidResponse(_))));
    }
}
