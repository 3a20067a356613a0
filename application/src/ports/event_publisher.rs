//! Port for domain event publication.
//!
//! Publishing is fire-and-forget: the method is synchronous and
//! non-fallible so a broken event bus never fails an extraction.

use serde_json::Value;

/// A named event with a JSON payload
#[derive(Debug, Clone, PartialEq)]
pub struct DomainEvent {
    /// Event name (e.g. `book.metadata.extracted`)
    pub name: &'static str,
    pub payload: Value,
}

impl DomainEvent {
    pub fn new(name: &'static str, payload: Value) -> Self {
        Self { name, payload }
    }
}

pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: DomainEvent);
}

