//! Remote vision-model strand
//!
//! The service receives the image locator (it reads object storage itself)
//! and answers with a strand analysis:
//!
//! ```json
//! {"metadata": {"title": "..."}, "confidence": {"overall": 0.9, "fields": {"title": 0.9}}}
//! ```
//!
//! Confidences on the 0-100 scale are accepted and normalized.

use async_trait::async_trait;
use coverscan_application::{AnalysisOptions, StrandAdapter, StrandError};
use coverscan_domain::{ImageLocator, StrandAnalysis, StrandId};
use std::time::Instant;
use tracing::debug;

/// Parse a vision service body into a normalized analysis
pub fn parse_analysis(body: &str) -> Result<StrandAnalysis, StrandError> {
    let mut analysis: StrandAnalysis =
        serde_json::from_str(body).map_err(|e| StrandError::InvalidResponse(e.to_string()))?;
    if analysis.metadata.is_empty() {
        return Err(StrandError::NoResult(
            "vision service returned no metadata".to_string(),
        ));
    }
    analysis.confidence = analysis.confidence.normalized();
    Ok(analysis)
}

/// [`StrandAdapter`] that forwards the locator to an HTTP vision service
pub struct HttpVisionStrand {
    strand: StrandId,
    client: reqwest::Client,
    endpoint: String,
    cost_per_call: f64,
}

impl HttpVisionStrand {
    pub fn new(strand: StrandId, endpoint: impl Into<String>) -> Self {
        Self {
            strand,
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            cost_per_call: 0.0,
        }
    }

    pub fn with_cost_per_call(mut self, cost: f64) -> Self {
        self.cost_per_call = cost;
        self
    }

    async fn request(&self, locator: &ImageLocator) -> Result<String, StrandError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(locator)
            .send()
            .await
            .map_err(|e| StrandError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StrandError::RequestFailed(format!(
                "{} returned {}",
                self.strand,
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| StrandError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl StrandAdapter for HttpVisionStrand {
    fn name(&self) -> &str {
        self.strand.as_str()
    }

    fn cost_per_call(&self) -> f64 {
        self.cost_per_call
    }

    async fn analyze(
        &self,
        locator: &ImageLocator,
        options: &AnalysisOptions,
    ) -> Result<StrandAnalysis, StrandError> {
        if options.is_cancelled() {
            return Err(StrandError::Cancelled);
        }

        let start = Instant::now();
        let body = self.request(locator).await?;
        let mut analysis = parse_analysis(&body)?;

        if analysis.cost == 0.0 {
            analysis.cost = self.cost_per_call;
        }
        if analysis.processing_time_ms == 0 {
            analysis.processing_time_ms = start.elapsed().as_millis() as u64;
        }
        debug!(
            "{} answered in {}ms (confidence {:.2})",
            self.strand, analysis.processing_time_ms, analysis.confidence.overall
        );
        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coverscan_domain::MetadataField;

    #[test]
    fn test_parse_analysis() {
        let body = r#"{
            "metadata": {"title": "Clean Code", "authors": ["Robert C. Martin"]},
            "confidence": {"overall": 0.9, "fields": {"title": 0.92}}
        }"#;
        let analysis = parse_analysis(body).unwrap();
        assert_eq!(analysis.metadata.title.as_deref(), Some("Clean Code"));
        assert_eq!(analysis.confidence.for_field(MetadataField::Title), 0.92);
        assert_eq!(analysis.cost, 0.0);
    }

    #[test]
    fn test_percent_scale_normalized() {
        let body = r#"{"metadata": {"title": "Dune"}, "confidence": {"overall": 85}}"#;
        let analysis = parse_analysis(body).unwrap();
        assert!((analysis.confidence.overall - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_empty_metadata_is_no_result() {
        let body = r#"{"metadata": {}, "confidence": {"overall": 0.4}}"#;
        assert!(matches!(
            parse_analysis(body),
            Err(StrandError::NoResult(_))
        ));
    }

    #[tokio::test]
    async fn test_cancelled_before_request() {
        let token = tokio_util::sync::CancellationToken::new();
        token.cancel();
        let strand = HttpVisionStrand::new(StrandId::VisionA, "http://127.0.0.1:9/analyze");
        let options = AnalysisOptions::default().with_cancellation(token);
        let result = strand
            .analyze(&ImageLocator::new("b", "k.jpg"), &options)
            .await;
        assert_eq!(result.unwrap_err(), StrandError::Cancelled);
    }
}
