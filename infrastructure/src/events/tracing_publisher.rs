//! Event publisher that emits domain events as structured log records

use coverscan_application::{DomainEvent, EventPublisher};
use tracing::info;

/// [`EventPublisher`] that logs every event at `info` level.
///
/// Nothing is retained after the log record is written.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventPublisher;

impl TracingEventPublisher {
    pub fn new() -> Self {
        Self
    }
}

impl EventPublisher for TracingEventPublisher {
    fn publish(&self, event: DomainEvent) {
        info!(event = event.name, payload = %event.payload, "Domain event published");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coverscan_domain::METADATA_EXTRACTED_EVENT;

    #[test]
    fn test_publish_keeps_no_state() {
        let publisher = TracingEventPublisher::new();
        for i in 0..1_000 {
            publisher.publish(DomainEvent::new(
                METADATA_EXTRACTED_EVENT,
                serde_json::json!({"bookId": format!("book-{}", i)}),
            ));
        }

        assert_eq!(std::mem::size_of::<TracingEventPublisher>(), 0);
    }
}
