//! Confidence aggregation
//!
//! Two computations live here:
//!
//! 1. [`calculate_aggregate_confidence`] - strand-agreement confidence used
//!    by the orchestrator: mean of the successful strands' overall scores,
//!    plus an agreement bonus when more than one strand succeeded.
//! 2. [`calculate_field_weighted_confidence`] - used by the catalog-aware
//!    pipeline: weighted mean over the core bibliographic fields, with each
//!    field's score scaled by the quality of the source that produced it.
//!
//! All scores are on the 0.0-1.0 scale.

use crate::book::metadata::MetadataField;
use crate::strand::{StrandId, StrandResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat bonus added when two or more strands succeeded
pub const AGREEMENT_BONUS: f64 = 0.1;

/// One strand's contribution to the aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualConfidence {
    pub strand: StrandId,
    pub confidence: f64,
}

/// Strand-agreement confidence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateConfidence {
    pub overall: f64,
    pub agreement: bool,
    pub individual: Vec<IndividualConfidence>,
}

/// Mean overall confidence of the successful strands, plus
/// [`AGREEMENT_BONUS`] when at least two succeeded. Capped at 1.0.
pub fn calculate_aggregate_confidence(results: &[StrandResult]) -> AggregateConfidence {
    let individual: Vec<IndividualConfidence> = results
        .iter()
        .filter(|r| r.success)
        .map(|r| IndividualConfidence {
            strand: r.strand.clone(),
            confidence: r.overall_confidence(),
        })
        .collect();

    if individual.is_empty() {
        return AggregateConfidence::default();
    }

    let mean =
        individual.iter().map(|i| i.confidence).sum::<f64>() / individual.len() as f64;
    let agreement = individual.len() >= 2;
    let overall = if agreement {
        (mean + AGREEMENT_BONUS).min(1.0)
    } else {
        mean
    };

    AggregateConfidence {
        overall,
        agreement,
        individual,
    }
}

/// Kind of source a field value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    Barcode,
    Ocr,
    Vision,
    Catalog,
    Other,
}

impl FieldSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldSource::Barcode => "barcode",
            FieldSource::Ocr => "ocr",
            FieldSource::Vision => "vision",
            FieldSource::Catalog => "catalog",
            FieldSource::Other => "other",
        }
    }

    /// Classify a strand
    pub fn from_strand(strand: &StrandId) -> Self {
        match strand {
            StrandId::Barcode => FieldSource::Barcode,
            StrandId::Ocr => FieldSource::Ocr,
            s if s.is_vision() => FieldSource::Vision,
            _ => FieldSource::Other,
        }
    }

    /// Multiplier applied to a field's raw confidence
    pub fn quality_factor(&self, field: MetadataField) -> f64 {
        match (self, field) {
            (FieldSource::Catalog, f) if f != MetadataField::Isbn => 1.2,
            (FieldSource::Barcode, MetadataField::Isbn) => 1.2,
            (FieldSource::Vision, _) => 1.1,
            _ => 1.0,
        }
    }
}

impl std::fmt::Display for FieldSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Weight of a field in the pipeline score; `None` for unweighted fields
pub fn field_weight(field: MetadataField) -> Option<f64> {
    match field {
        MetadataField::Title => Some(0.30),
        MetadataField::Authors => Some(0.30),
        MetadataField::Isbn => Some(0.25),
        MetadataField::Publisher => Some(0.15),
        _ => None,
    }
}

/// A field's raw confidence and where it came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldScore {
    pub field: MetadataField,
    pub confidence: f64,
    pub source: FieldSource,
}

impl FieldScore {
    pub fn new(field: MetadataField, confidence: f64, source: FieldSource) -> Self {
        Self {
            field,
            confidence,
            source,
        }
    }
}

/// Field-weighted pipeline confidence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldWeightedConfidence {
    /// Rounded percentage, 0-100
    pub percent: u8,
    /// `percent / 100`, the canonical 0.0-1.0 score
    pub overall: f64,
    /// Source-adjusted confidence of each weighted field
    pub adjusted: BTreeMap<MetadataField, f64>,
}

/// Weighted score over title, author, ISBN and publisher.
///
/// Each field's confidence is multiplied by its source's quality factor and
/// capped at 1.0; the score is the weighted mean over the fields present.
/// Unweighted fields are ignored. No weighted field present scores 0.
pub fn calculate_field_weighted_confidence(fields: &[FieldScore]) -> FieldWeightedConfidence {
    let mut adjusted = BTreeMap::new();
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    for score in fields {
        let Some(weight) = field_weight(score.field) else {
            continue;
        };
        if adjusted.contains_key(&score.field) {
            continue;
        }
        let value = (score.confidence * score.source.quality_factor(score.field)).min(1.0);
        adjusted.insert(score.field, value);
        weighted_sum += weight * value;
        total_weight += weight;
    }

    if total_weight <= 0.0 {
        return FieldWeightedConfidence::default();
    }

    let percent = (100.0 * weighted_sum / total_weight).round().clamp(0.0, 100.0) as u8;

    FieldWeightedConfidence {
        percent,
        overall: f64::from(percent) / 100.0,
        adjusted,
    }
}
