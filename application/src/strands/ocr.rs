//! OCR strand
//!
//! Picks the most salient text lines off the front cover as title and
//! author candidates.

use super::fetch_image;
use crate::ports::image_store::ImageStore;
use crate::ports::recognizer::OcrEngine;
use crate::ports::strand_adapter::{AnalysisOptions, StrandAdapter, StrandError};
use async_trait::async_trait;
use coverscan_domain::ocr::{classify_lines, split_authors};
use coverscan_domain::{
    BookMetadata, ImageLocator, MetadataField, StrandAnalysis, StrandConfidence,
};
use std::sync::Arc;
use tracing::debug;

pub struct OcrStrand<E: OcrEngine> {
    store: Arc<dyn ImageStore>,
    engine: E,
}

impl<E: OcrEngine> OcrStrand<E> {
    pub fn new(store: Arc<dyn ImageStore>, engine: E) -> Self {
        Self { store, engine }
    }
}

#[async_trait]
impl<E: OcrEngine> StrandAdapter for OcrStrand<E> {
    fn name(&self) -> &str {
        "ocr"
    }

    async fn analyze(
        &self,
        locator: &ImageLocator,
        options: &AnalysisOptions,
    ) -> Result<StrandAnalysis, StrandError> {
        let image = fetch_image(self.store.as_ref(), locator, options).await?;
        let lines = self
            .engine
            .recognize(&image)
            .await
            .map_err(|e| StrandError::RequestFailed(e.to_string()))?;
        debug!("OCR engine returned {} line(s)", lines.len());

        let candidates = classify_lines(&lines);
        if candidates.is_empty() {
            return Err(StrandError::NoResult("no legible text on cover".to_string()));
        }

        let mut metadata = BookMetadata::new();
        let mut confidence = StrandConfidence::default();

        if let Some(title) = candidates.best_title() {
            metadata.title = Some(title.value.clone());
            confidence = confidence.with_field(MetadataField::Title, title.confidence);
        }
        if let Some(author) = candidates.best_author() {
            metadata.authors = split_authors(&author.value);
            confidence = confidence.with_field(MetadataField::Authors, author.confidence);
        }
        // The language guess is a fixed hint, not a reading.
        debug!("OCR language hint: {}", candidates.language_guess);

        let overall = confidence.fields.values().copied().fold(0.0, f64::max);
        confidence.overall = overall;

        Ok(StrandAnalysis::new(metadata, confidence))
    }
}
