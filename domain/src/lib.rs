//! Domain layer for coverscan
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Strands
//!
//! A strand is one recognizer run against a cover image: a barcode scan,
//! OCR, or one of several vision models. Each reports partial metadata with
//! a confidence score.
//!
//! ## Agents and strategies
//!
//! An agent owns one extraction request. Its [`ExtractionStrategy`] fixes
//! which strands run and in what order; its [`AgentConfig`] decides between
//! sequential fallback and parallel fan-out.
//!
//! ## Consensus
//!
//! Successful strand outputs are merged into one record
//! ([`create_consensus_metadata`]) and scored
//! ([`calculate_aggregate_confidence`]). The catalog-aware pipeline uses a
//! field-weighted score instead ([`calculate_field_weighted_confidence`]).

pub mod agent;
pub mod book;
pub mod consensus;
pub mod core;
pub mod extraction;
pub mod ocr;
pub mod orchestration;
pub mod strand;

// Re-export commonly used types
pub use agent::{
    config::{AgentConfig, AgentConfigOverrides},
    entities::{Agent, AgentId, AgentState, AgentStatus, FailedStrand},
    validation::{ConfigIssue, ConfigIssueCode, Severity},
};
pub use book::{
    catalog::{CATALOG_CONFIDENCE, CatalogEnrichment, CatalogMatch, CatalogQuery, CatalogRecord},
    isbn::Isbn,
    metadata::{BookMetadata, MetadataField},
};
pub use consensus::{
    builder::{ConsensusMetadata, create_consensus_metadata},
    confidence::{
        AggregateConfidence, FieldScore, FieldSource, FieldWeightedConfidence,
        IndividualConfidence, calculate_aggregate_confidence, calculate_field_weighted_confidence,
    },
};
pub use core::error::DomainError;
pub use extraction::{
    advanced::{AdvancedMetadata, METADATA_EXTRACTED_EVENT, MetadataExtractedEvent, ProvenanceEntry},
    locator::ImageLocator,
    result::{ExecutionResult, Workflow},
};
pub use ocr::candidates::{CoverTextCandidates, OcrLine, TextCandidate};
pub use orchestration::strategy::{ExtractionStrategy, strand_order};
pub use strand::{
    result::{StrandAnalysis, StrandConfidence, StrandResult, normalize_confidence},
    strand_id::StrandId,
};
