//! Built-in strand adapters
//!
//! Barcode and OCR recognizers report raw symbols and text lines; these
//! adapters turn them into strand analyses.

pub mod barcode;
pub mod ocr;

pub use barcode::{BARCODE_CONFIDENCE, BarcodeStrand};
pub use ocr::OcrStrand;

use crate::ports::image_store::{ImageStore, ImageStoreError};
use crate::ports::strand_adapter::{AnalysisOptions, StrandError};
use coverscan_domain::ImageLocator;

/// Fetch the cover bytes, honouring cancellation
async fn fetch_image(
    store: &dyn ImageStore,
    locator: &ImageLocator,
    options: &AnalysisOptions,
) -> Result<Vec<u8>, StrandError> {
    if options.is_cancelled() {
        return Err(StrandError::Cancelled);
    }
    store.fetch(locator).await.map_err(|e| match e {
        ImageStoreError::NotFound(_) => StrandError::ImageUnavailable(e.to_string()),
        ImageStoreError::Io(message) => StrandError::ImageUnavailable(message),
    })
}
