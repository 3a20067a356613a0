//! Strand outcome value objects
//!
//! - [`StrandAnalysis`] - what a recognizer hands back on success
//! - [`StrandResult`] - one strand's recorded outcome (success or failure)
//!   within an orchestration run

use super::strand_id::StrandId;
use crate::book::metadata::{BookMetadata, MetadataField};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Confidence reported by a strand: an overall score plus optional
/// per-field scores, all on the 0.0-1.0 scale
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrandConfidence {
    pub overall: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<MetadataField, f64>,
}

/// Clamp a score onto the canonical 0.0-1.0 scale.
///
/// Values above 1.0 are assumed to be percentages (0-100) and divided down,
/// which is how adapters that report percentages get normalized.
pub fn normalize_confidence(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        0.0
    } else if value > 1.0 {
        (value / 100.0).min(1.0)
    } else {
        value
    }
}

impl StrandConfidence {
    pub fn new(overall: f64) -> Self {
        Self {
            overall: normalize_confidence(overall),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, field: MetadataField, confidence: f64) -> Self {
        self.fields.insert(field, normalize_confidence(confidence));
        self
    }

    /// Confidence for a field, falling back to the overall score
    pub fn for_field(&self, field: MetadataField) -> f64 {
        self.fields.get(&field).copied().unwrap_or(self.overall)
    }

    /// Normalize every score onto 0.0-1.0
    pub fn normalized(self) -> Self {
        Self {
            overall: normalize_confidence(self.overall),
            fields: self
                .fields
                .into_iter()
                .map(|(f, c)| (f, normalize_confidence(c)))
                .collect(),
        }
    }
}

/// Successful output of a strand adapter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrandAnalysis {
    pub metadata: BookMetadata,
    pub confidence: StrandConfidence,
    /// Monetary cost of the call (provider units, e.g. USD)
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub processing_time_ms: u64,
}

impl StrandAnalysis {
    pub fn new(metadata: BookMetadata, confidence: StrandConfidence) -> Self {
        Self {
            metadata,
            confidence,
            cost: 0.0,
            processing_time_ms: 0,
        }
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_processing_time_ms(mut self, ms: u64) -> Self {
        self.processing_time_ms = ms;
        self
    }
}

/// Outcome of one strand within an orchestration run
///
/// Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrandResult {
    pub strand: StrandId,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BookMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<StrandConfidence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StrandResult {
    /// Creates a successful result from an adapter's analysis.
    ///
    /// A zero cost means the adapter did not price the call and is recorded
    /// as no cost.
    ///
    /// Confidence scores are normalized onto 0.0-1.0 here, which is the
    /// single place adapter output enters the domain.
    pub fn success(strand: StrandId, analysis: StrandAnalysis) -> Self {
        Self {
            strand,
            success: true,
            metadata: Some(analysis.metadata),
            confidence: Some(analysis.confidence.normalized()),
            cost: (analysis.cost > 0.0).then_some(analysis.cost),
            processing_time_ms: Some(analysis.processing_time_ms),
            error: None,
        }
    }

    /// Creates a failed result
    pub fn failure(strand: StrandId, error: impl Into<String>) -> Self {
        Self {
            strand,
            success: false,
            metadata: None,
            confidence: None,
            cost: None,
            processing_time_ms: None,
            error: Some(error.into()),
        }
    }

    pub fn with_processing_time_ms(mut self, ms: u64) -> Self {
        self.processing_time_ms = Some(ms);
        self
    }

    /// Overall confidence, 0.0 when the strand reported none
    pub fn overall_confidence(&self) -> f64 {
        self.confidence.as_ref().map(|c| c.overall).unwrap_or(0.0)
    }

    /// Confidence for one field (falls back to the overall score)
    pub fn field_confidence(&self, field: MetadataField) -> f64 {
        self.confidence
            .as_ref()
            .map(|c| c.for_field(field))
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_confidence() {
        assert_eq!(normalize_confidence(0.42), 0.42);
        assert_eq!(normalize_confidence(92.0), 0.92);
        assert_eq!(normalize_confidence(250.0), 1.0);
        assert_eq!(normalize_confidence(-1.0), 0.0);
        assert_eq!(normalize_confidence(f64::NAN), 0.0);
    }

    #[test]
    fn test_success_normalizes_percentages() {
        let analysis = StrandAnalysis::new(
            BookMetadata::new().with_title("Dune"),
            StrandConfidence {
                overall: 88.0,
                fields: BTreeMap::from([(MetadataField::Title, 90.0)]),
            },
        );
        let result = StrandResult::success(StrandId::VisionA, analysis);
        assert!(result.success);
        assert!((result.overall_confidence() - 0.88).abs() < 1e-9);
        assert!((result.field_confidence(MetadataField::Title) - 0.90).abs() < 1e-9);
    }

    #[test]
    fn test_field_confidence_falls_back_to_overall() {
        let analysis = StrandAnalysis::new(BookMetadata::new(), StrandConfidence::new(0.7));
        let result = StrandResult::success(StrandId::Ocr, analysis);
        assert_eq!(result.field_confidence(MetadataField::Publisher), 0.7);
    }

    #[test]
    fn test_unpriced_call_has_no_cost() {
        let free = StrandResult::success(
            StrandId::Barcode,
            StrandAnalysis::new(BookMetadata::new(), StrandConfidence::new(0.9)),
        );
        assert_eq!(free.cost, None);

        let priced = StrandResult::success(
            StrandId::VisionA,
            StrandAnalysis::new(BookMetadata::new(), StrandConfidence::new(0.9)).with_cost(0.02),
        );
        assert_eq!(priced.cost, Some(0.02));
    }

    #[test]
    fn test_failure_has_no_payload() {
        let result = StrandResult::failure(StrandId::VisionB, "timeout");
        assert!(!result.success);
        assert!(result.metadata.is_none());
        assert_eq!(result.overall_confidence(), 0.0);
        assert_eq!(result.error.as_deref(), Some("timeout"));
    }
}
