//! Extraction agent domain
//!
//! An agent owns the configuration and execution state of a single
//! extraction request. Agents are created explicitly and released
//! explicitly; nothing expires them.

pub mod config;
pub mod entities;
pub mod validation;

pub use config::{
    AgentConfig, AgentConfigOverrides, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_MAX_STRAND_ATTEMPTS,
};
pub use entities::{Agent, AgentId, AgentState, AgentStatus, FailedStrand};
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
