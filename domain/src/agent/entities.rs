//! Agent domain entities
//!
//! An agent is one orchestrated extraction request. Its execution state
//! moves through an explicit sequence:
//!
//! ```text
//! Created ──begin_run──▶ Running ──finish(true)──▶ Succeeded
//!                           │
//!                           └──────finish(false)─▶ Failed
//! ```
//!
//! A finished agent may be run again; a running agent may not.

use super::config::AgentConfig;
use crate::core::error::DomainError;
use crate::strand::StrandId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for an agent
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<T: Into<String>> From<T> for AgentId {
    fn from(s: T) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    #[default]
    Created,
    Running,
    Succeeded,
    Failed,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Created => "created",
            AgentStatus::Running => "running",
            AgentStatus::Succeeded => "succeeded",
            AgentStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentStatus::Succeeded | AgentStatus::Failed)
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A strand that failed during a run, with its error message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedStrand {
    pub strand: StrandId,
    pub error: String,
}

impl FailedStrand {
    pub fn new(strand: StrandId, error: impl Into<String>) -> Self {
        Self {
            strand,
            error: error.into(),
        }
    }
}

/// Execution state of an agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub status: AgentStatus,
    pub completed_strands: Vec<StrandId>,
    pub failed_strands: Vec<FailedStrand>,
}

/// One extraction agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub config: AgentConfig,
    pub state: AgentState,
    pub created_at: DateTime<Utc>,
}

impl Agent {
    pub fn new(id: impl Into<AgentId>, config: AgentConfig) -> Self {
        Self {
            id: id.into(),
            config,
            state: AgentState::default(),
            created_at: Utc::now(),
        }
    }

    /// Enter `Running`, clearing the previous run's bookkeeping.
    ///
    /// Fails with [`DomainError::AgentBusy`] if a run is already in flight.
    pub fn begin_run(&mut self) -> Result<(), DomainError> {
        if self.state.status == AgentStatus::Running {
            return Err(DomainError::AgentBusy(self.id.to_string()));
        }
        self.state = AgentState {
            status: AgentStatus::Running,
            completed_strands: Vec::new(),
            failed_strands: Vec::new(),
        };
        Ok(())
    }

    pub fn record_success(&mut self, strand: StrandId) {
        self.state.completed_strands.push(strand);
    }

    pub fn record_failure(&mut self, strand: StrandId, error: impl Into<String>) {
        self.state.failed_strands.push(FailedStrand::new(strand, error));
    }

    /// Leave `Running` for a terminal status
    pub fn finish(&mut self, success: bool) {
        self.state.status = if success {
            AgentStatus::Succeeded
        } else {
            AgentStatus::Failed
        };
    }

    pub fn is_running(&self) -> bool {
        self.state.status == AgentStatus::Running
    }
}
