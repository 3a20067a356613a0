//! Final extraction artifact and its completion event
//!
//! [`AdvancedMetadata`] is built once per request by the catalog-aware
//! pipeline and handed to the persistence collaborator. Every populated
//! field must carry a confidence and be attributed to at least one source
//! in the provenance map; [`AdvancedMetadata::unattributed_fields`] checks it.

use super::locator::ImageLocator;
use crate::book::metadata::{BookMetadata, MetadataField};
use crate::consensus::confidence::FieldSource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the event published once per completed extraction
pub const METADATA_EXTRACTED_EVENT: &str = "book.metadata.extracted";

/// What one source contributed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceEntry {
    pub source: FieldSource,
    /// Overall confidence the source reported
    pub confidence: f64,
    /// Fields this source supplied in the final record
    pub fields: Vec<MetadataField>,
    /// Source-specific details (strand ids, catalog query, ...)
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl ProvenanceEntry {
    pub fn new(source: FieldSource, confidence: f64) -> Self {
        Self {
            source,
            confidence,
            fields: Vec::new(),
            details: serde_json::Value::Null,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    pub fn attributes(&self, field: MetadataField) -> bool {
        self.fields.contains(&field)
    }
}

/// Final metadata record for one cover image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedMetadata {
    pub extracted_at: DateTime<Utc>,
    pub source: ImageLocator,
    pub metadata: BookMetadata,
    /// Per-field confidence (0.0-1.0)
    pub confidence: BTreeMap<MetadataField, f64>,
    /// Winning source of each field
    pub field_sources: BTreeMap<MetadataField, FieldSource>,
    /// Keyed by source name (`barcode`, `ocr`, `vision`, `catalog`)
    pub provenance: BTreeMap<String, ProvenanceEntry>,
    pub overall_confidence: f64,
}

impl AdvancedMetadata {
    /// Populated fields lacking a confidence entry or a provenance entry
    pub fn unattributed_fields(&self) -> Vec<MetadataField> {
        self.metadata
            .populated_fields()
            .into_iter()
            .filter(|field| {
                !self.confidence.contains_key(field)
                    || !self.provenance.values().any(|p| p.attributes(*field))
            })
            .collect()
    }

    pub fn field_confidence(&self, field: MetadataField) -> Option<f64> {
        self.confidence.get(&field).copied()
    }
}

/// Payload of [`METADATA_EXTRACTED_EVENT`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataExtractedEvent {
    pub book_id: String,
    pub user_id: String,
    #[serde(rename = "s3Bucket")]
    pub s3_bucket: String,
    #[serde(rename = "s3Key")]
    pub s3_key: String,
    pub confidence: f64,
    pub has_title: bool,
    pub has_author: bool,
    #[serde(rename = "hasISBN")]
    pub has_isbn: bool,
}

impl MetadataExtractedEvent {
    pub fn new(book_id: impl Into<String>, user_id: impl Into<String>, advanced: &AdvancedMetadata) -> Self {
        Self {
            book_id: book_id.into(),
            user_id: user_id.into(),
            s3_bucket: advanced.source.bucket.clone(),
            s3_key: advanced.source.key.clone(),
            confidence: advanced.overall_confidence,
            has_title: advanced.metadata.has(MetadataField::Title),
            has_author: advanced.metadata.has(MetadataField::Authors),
            has_isbn: advanced.metadata.has(MetadataField::Isbn),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AdvancedMetadata {
        let mut provenance = BTreeMap::new();
        let mut barcode = ProvenanceEntry::new(FieldSource::Barcode, 0.95);
        barcode.fields.push(MetadataField::Isbn);
        provenance.insert("barcode".to_string(), barcode);

        AdvancedMetadata {
            extracted_at: Utc::now(),
            source: ImageLocator::new("uploads", "book-1.jpg"),
            metadata: BookMetadata::new().with_isbn("9780132350884"),
            confidence: BTreeMap::from([(MetadataField::Isbn, 0.95)]),
            field_sources: BTreeMap::from([(MetadataField::Isbn, FieldSource::Barcode)]),
            provenance,
            overall_confidence: 1.0,
        }
    }

    #[test]
    fn test_fully_attributed() {
        assert!(sample().unattributed_fields().is_empty());
    }

    #[test]
    fn test_detects_missing_attribution() {
        let mut advanced = sample();
        advanced.metadata.title = Some("Clean Code".to_string());
        assert_eq!(advanced.unattributed_fields(), vec![MetadataField::Title]);
    }

    #[test]
    fn test_event_payload_shape() {
        let event = MetadataExtractedEvent::new("book-1", "user-9", &sample());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["bookId"], "book-1");
        assert_eq!(json["s3Bucket"], "uploads");
        assert_eq!(json["s3Key"], "book-1.jpg");
        assert_eq!(json["hasISBN"], true);
        assert_eq!(json["hasTitle"], false);
        assert_eq!(json["hasAuthor"], false);
    }

    #[test]
    fn test_advanced_metadata_uses_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("extractedAt").is_some());
        assert!(json.get("overallConfidence").is_some());
    }
}
