//! In-memory registries owned by the extraction service

pub mod agent_registry;
pub mod strand_registry;

pub use agent_registry::AgentRegistry;
pub use strand_registry::{StrandConfiguration, StrandRegistry};
