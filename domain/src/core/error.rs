//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// These represent programmer or configuration mistakes (unknown strategy,
/// missing agent, ...). External-service failures such as a strand timing out
/// are never surfaced through this type; they are recorded on the workflow.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Unknown extraction strategy: {0}")]
    UnknownStrategy(String),

    #[error("Unknown strand: {0}")]
    UnknownStrand(String),

    #[error("Agent {0} not found")]
    AgentNotFound(String),

    #[error("Agent {0} already exists")]
    AgentAlreadyExists(String),

    #[error("Agent {0} is already running an analysis")]
    AgentBusy(String),

    #[error("Invalid agent configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid ISBN: {0}")]
    InvalidIsbn(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }

    /// Check if this error comes from a misconfiguration rather than a
    /// runtime condition
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DomainError::UnknownStrategy(_)
                | DomainError::UnknownStrand(_)
                | DomainError::InvalidConfig(_)
        )
    }
}
