//! Consensus and confidence
//!
//! Strands report partial, sometimes conflicting metadata. This module
//! merges them into one record and scores how much that record can be
//! trusted.

pub mod builder;
pub mod confidence;

pub use builder::{ConsensusMetadata, create_consensus_metadata};
pub use confidence::{
    AGREEMENT_BONUS, AggregateConfidence, FieldScore, FieldSource, FieldWeightedConfidence,
    IndividualConfidence, calculate_aggregate_confidence, calculate_field_weighted_confidence,
    field_weight,
};
