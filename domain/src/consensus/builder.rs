//! Consensus builder
//!
//! Merges the outputs of every successful strand into one metadata record.
//!
//! - Scalar fields: first value in input order wins
//! - List fields: literal concatenation of every input, duplicates kept
//! - Fields no strand produced are left absent

use crate::book::metadata::{BookMetadata, MetadataField};
use crate::strand::{StrandId, StrandResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Merged metadata plus per-field confidence and attribution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsensusMetadata {
    pub metadata: BookMetadata,
    /// Confidence for every populated field (0.0-1.0)
    pub field_confidence: BTreeMap<MetadataField, f64>,
    /// Strands that supplied each populated field
    pub field_sources: BTreeMap<MetadataField, Vec<StrandId>>,
}

impl ConsensusMetadata {
    pub fn confidence(&self, field: MetadataField) -> Option<f64> {
        self.field_confidence.get(&field).copied()
    }

    pub fn sources(&self, field: MetadataField) -> &[StrandId] {
        self.field_sources
            .get(&field)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn attribute(&mut self, field: MetadataField, confidence: f64, sources: Vec<StrandId>) {
        self.field_confidence.insert(field, confidence);
        self.field_sources.insert(field, sources);
    }
}

/// Merge successful strand results, in the order given.
///
/// Failed results and results without metadata are skipped.
pub fn create_consensus_metadata(results: &[StrandResult]) -> ConsensusMetadata {
    let contributing: Vec<(&StrandResult, &BookMetadata)> = results
        .iter()
        .filter(|r| r.success)
        .filter_map(|r| r.metadata.as_ref().map(|m| (r, m)))
        .collect();

    let mut consensus = ConsensusMetadata::default();

    for field in MetadataField::ALL {
        if field.is_list() {
            merge_list(&mut consensus, &contributing, field);
        } else {
            merge_scalar(&mut consensus, &contributing, field);
        }
    }

    consensus
}

fn merge_scalar(
    consensus: &mut ConsensusMetadata,
    contributing: &[(&StrandResult, &BookMetadata)],
    field: MetadataField,
) {
    let Some((result, metadata)) = contributing.iter().find(|(_, m)| m.has(field)) else {
        return;
    };

    if field == MetadataField::PageCount {
        consensus.metadata.page_count = metadata.page_count;
    } else if let Some(value) = metadata.text(field) {
        consensus.metadata.set_text(field, value);
    }

    consensus.attribute(
        field,
        result.field_confidence(field),
        vec![result.strand.clone()],
    );
}

fn merge_list(
    consensus: &mut ConsensusMetadata,
    contributing: &[(&StrandResult, &BookMetadata)],
    field: MetadataField,
) {
    let mut values = Vec::new();
    let mut confidences = Vec::new();
    let mut sources = Vec::new();

    for (result, metadata) in contributing {
        let items: Vec<&String> = metadata
            .list(field)
            .iter()
            .filter(|v| !v.trim().is_empty())
            .collect();
        if items.is_empty() {
            continue;
        }
        values.extend(items.into_iter().cloned());
        confidences.push(result.field_confidence(field));
        sources.push(result.strand.clone());
    }

    if values.is_empty() {
        return;
    }

    if let Some(list) = consensus.metadata.list_mut(field) {
        *list = values;
    }
    let mean = confidences.iter().sum::<f64>() / confidences.len() as f64;
    consensus.attribute(field, mean, sources);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strand::{StrandAnalysis, StrandConfidence};

    fn result(strand: StrandId, metadata: BookMetadata, confidence: f64) -> StrandResult {
        StrandResult::success(
            strand,
            StrandAnalysis::new(metadata, StrandConfidence::new(confidence)),
        )
    }

    #[test]
    fn test_scalar_first_wins() {
        let results = vec![
            result(StrandId::VisionA, BookMetadata::new().with_title("A"), 0.8),
            result(StrandId::VisionB, BookMetadata::new().with_title("B"), 0.9),
        ];
        let consensus = create_consensus_metadata(&results);
        assert_eq!(consensus.metadata.title.as_deref(), Some("A"));
        assert_eq!(consensus.confidence(MetadataField::Title), Some(0.8));
        assert_eq!(consensus.sources(MetadataField::Title), &[StrandId::VisionA]);
    }

    #[test]
    fn test_lists_concatenate_in_input_order() {
        let results = vec![
            result(
                StrandId::VisionA,
                BookMetadata::new()
                    .with_author("Ann")
                    .with_category("Fiction"),
                0.8,
            ),
            result(
                StrandId::VisionB,
                BookMetadata::new()
                    .with_author("Ann")
                    .with_author("Bob")
                    .with_category("Drama"),
                0.6,
            ),
        ];
        let consensus = create_consensus_metadata(&results);
        assert_eq!(
            consensus.metadata.authors,
            vec!["Ann".to_string(), "Ann".to_string(), "Bob".to_string()]
        );
        assert_eq!(
            consensus.metadata.categories,
            vec!["Fiction".to_string(), "Drama".to_string()]
        );
        let authors_conf = consensus.confidence(MetadataField::Authors).unwrap();
        assert!((authors_conf - 0.7).abs() < 1e-9);
        assert_eq!(
            consensus.sources(MetadataField::Authors),
            &[StrandId::VisionA, StrandId::VisionB]
        );
    }

    #[test]
    fn test_later_strand_fills_gaps() {
        let results = vec![
            result(StrandId::VisionA, BookMetadata::new().with_title("Dune"), 0.8),
            result(
                StrandId::VisionB,
                BookMetadata::new().with_title("DUNE").with_publisher("Chilton"),
                0.6,
            ),
        ];
        let consensus = create_consensus_metadata(&results);
        assert_eq!(consensus.metadata.title.as_deref(), Some("Dune"));
        assert_eq!(consensus.metadata.publisher.as_deref(), Some("Chilton"));
        assert_eq!(
            consensus.sources(MetadataField::Publisher),
            &[StrandId::VisionB]
        );
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let results = vec![result(
            StrandId::VisionA,
            BookMetadata::new().with_title("Dune"),
            0.8,
        )];
        let consensus = create_consensus_metadata(&results);
        assert!(consensus.metadata.publisher.is_none());
        assert!(consensus.metadata.authors.is_empty());
        assert_eq!(consensus.field_confidence.len(), 1);
    }

    #[test]
    fn test_failures_are_ignored() {
        let results = vec![
            StrandResult::failure(StrandId::VisionA, "boom"),
            result(StrandId::VisionB, BookMetadata::new().with_title("B"), 0.5),
        ];
        let consensus = create_consensus_metadata(&results);
        assert_eq!(consensus.metadata.title.as_deref(), Some("B"));
    }

    #[test]
    fn test_empty_input() {
        let consensus = create_consensus_metadata(&[]);
        assert!(consensus.metadata.is_empty());
        assert!(consensus.field_confidence.is_empty());
    }
}
