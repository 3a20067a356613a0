//! Result of one orchestration run

use crate::agent::entities::{AgentState, FailedStrand};
use crate::book::catalog::CatalogEnrichment;
use crate::book::metadata::{BookMetadata, MetadataField};
use crate::consensus::confidence::AggregateConfidence;
use crate::strand::{StrandId, StrandResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Error reported when no strand produced a result
pub const ALL_STRANDS_FAILED: &str = "All vision analysis strands failed";

/// Name recorded in `field_sources` for catalog-supplied values
pub const CATALOG_SOURCE: &str = "catalog";

/// Which strands completed and which failed during a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub completed_strands: Vec<StrandId>,
    pub failed_strands: Vec<FailedStrand>,
}

impl From<&AgentState> for Workflow {
    fn from(state: &AgentState) -> Self {
        Self {
            completed_strands: state.completed_strands.clone(),
            failed_strands: state.failed_strands.clone(),
        }
    }
}

/// Outcome of `execute_analysis`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BookMetadata>,
    /// Per-field confidence of the final metadata (0.0-1.0)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub field_confidence: BTreeMap<MetadataField, f64>,
    /// Strand ids (or `"catalog"`) that supplied each field
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub field_sources: BTreeMap<MetadataField, Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<AggregateConfidence>,
    /// Whether the aggregate confidence reached the agent's threshold
    #[serde(default)]
    pub meets_threshold: bool,
    pub workflow: Workflow,
    /// Every strand outcome, in execution order
    #[serde(default)]
    pub strand_results: Vec<StrandResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<CatalogEnrichment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    pub processing_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionResult {
    /// Terminal failure: no strand succeeded
    pub fn all_failed(workflow: Workflow, strand_results: Vec<StrandResult>, elapsed_ms: u64) -> Self {
        Self {
            success: false,
            workflow,
            strand_results,
            processing_time_ms: elapsed_ms,
            error: Some(ALL_STRANDS_FAILED.to_string()),
            ..Default::default()
        }
    }

    pub fn overall_confidence(&self) -> f64 {
        self.confidence.as_ref().map(|c| c.overall).unwrap_or(0.0)
    }
}
