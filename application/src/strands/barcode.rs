//! Barcode strand
//!
//! Reads the EAN-13 barcode printed on the back cover. A valid ISBN there is
//! the most reliable identifier a cover can give, so it is reported at a
//! fixed high confidence.

use super::fetch_image;
use crate::ports::image_store::ImageStore;
use crate::ports::recognizer::BarcodeReader;
use crate::ports::strand_adapter::{AnalysisOptions, StrandAdapter, StrandError};
use async_trait::async_trait;
use coverscan_domain::{
    BookMetadata, ImageLocator, Isbn, MetadataField, StrandAnalysis, StrandConfidence,
};
use std::sync::Arc;
use tracing::debug;

/// Confidence of a decoded, check-digit-valid ISBN
pub const BARCODE_CONFIDENCE: f64 = 0.95;

pub struct BarcodeStrand<R: BarcodeReader> {
    store: Arc<dyn ImageStore>,
    reader: R,
}

impl<R: BarcodeReader> BarcodeStrand<R> {
    pub fn new(store: Arc<dyn ImageStore>, reader: R) -> Self {
        Self { store, reader }
    }
}

#[async_trait]
impl<R: BarcodeReader> StrandAdapter for BarcodeStrand<R> {
    fn name(&self) -> &str {
        "barcode"
    }

    async fn analyze(
        &self,
        locator: &ImageLocator,
        options: &AnalysisOptions,
    ) -> Result<StrandAnalysis, StrandError> {
        let image = fetch_image(self.store.as_ref(), locator, options).await?;
        let symbols = self
            .reader
            .decode(&image)
            .await
            .map_err(|e| StrandError::RequestFailed(e.to_string()))?;
        debug!("Barcode reader decoded {} symbol(s)", symbols.len());

        let isbn = symbols
            .iter()
            .filter(|s| s.is_book_code())
            .find_map(|s| Isbn::parse(&s.payload).ok())
            .ok_or_else(|| StrandError::NoResult("no ISBN barcode found".to_string()))?;

        Ok(StrandAnalysis::new(
            BookMetadata::new().with_isbn(isbn.as_isbn13()),
            StrandConfidence::new(BARCODE_CONFIDENCE)
                .with_field(MetadataField::Isbn, BARCODE_CONFIDENCE),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::image_store::ImageStoreError;
    use crate::ports::recognizer::{DecodedSymbol, RecognizerError};

    struct StaticStore;

    #[async_trait]
    impl ImageStore for StaticStore {
        async fn fetch(&self, locator: &ImageLocator) -> Result<Vec<u8>, ImageStoreError> {
            if locator.key == "missing.jpg" {
                Err(ImageStoreError::NotFound(locator.to_string()))
            } else {
                Ok(vec![0xFF, 0xD8])
            }
        }
    }

    struct StaticReader(Vec<DecodedSymbol>);

    #[async_trait]
    impl BarcodeReader for StaticReader {
        async fn decode(&self, _image: &[u8]) -> Result<Vec<DecodedSymbol>, RecognizerError> {
            Ok(self.0.clone())
        }
    }

    fn strand(symbols: Vec<DecodedSymbol>) -> BarcodeStrand<StaticReader> {
        BarcodeStrand::new(Arc::new(StaticStore), StaticReader(symbols))
    }

    fn locator(key: &str) -> ImageLocator {
        ImageLocator::new("uploads", key)
    }

    #[tokio::test]
    async fn test_first_valid_isbn_wins() {
        let strand = strand(vec![
            DecodedSymbol::new("QRCODE", "9780132350884"),
            DecodedSymbol::new("EAN13", "9780132350885"),
            DecodedSymbol::new("EAN13", "978-0-13-235088-4"),
        ]);

        let analysis = strand
            .analyze(&locator("cover.jpg"), &AnalysisOptions::default())
            .await
            .unwrap();

        assert_eq!(analysis.metadata.isbn.as_deref(), Some("9780132350884"));
        assert_eq!(analysis.confidence.for_field(MetadataField::Isbn), 0.95);
        assert_eq!(analysis.cost, 0.0);
    }

    #[tokio::test]
    async fn test_no_isbn_is_no_result() {
        let strand = strand(vec![DecodedSymbol::new("EAN13", "4006381333931")]);
        let err = strand
            .analyze(&locator("cover.jpg"), &AnalysisOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StrandError::NoResult(_)));
    }

    #[tokio::test]
    async fn test_missing_image() {
        let strand = strand(vec![]);
        let err = strand
            .analyze(&locator("missing.jpg"), &AnalysisOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StrandError::ImageUnavailable(_)));
    }
}
