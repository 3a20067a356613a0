//! Progress notification port
//!
//! Defines the interface for reporting progress during an extraction run.

use coverscan_domain::{AgentId, StrandId};

/// Callback for progress updates during `execute_analysis`
///
/// Implementations live in the presentation layer.
pub trait StrandProgressNotifier: Send + Sync {
    /// Called once the strand order is resolved
    fn on_execution_start(&self, agent: &AgentId, strands: &[StrandId], parallel: bool);

    /// Called when a strand settles
    fn on_strand_complete(&self, strand: &StrandId, success: bool);

    /// Called when the run has a final outcome
    fn on_execution_complete(&self, agent: &AgentId, success: bool);

    /// Called before the catalog lookup starts
    fn on_enrichment_start(&self) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl StrandProgressNotifier for NoProgress {
    fn on_execution_start(&self, _agent: &AgentId, _strands: &[StrandId], _parallel: bool) {}
    fn on_strand_complete(&self, _strand: &StrandId, _success: bool) {}
    fn on_execution_complete(&self, _agent: &AgentId, _success: bool) {}
}
