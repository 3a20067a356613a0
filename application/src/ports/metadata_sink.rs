//! Persistence port for extracted metadata

use async_trait::async_trait;
use coverscan_domain::AdvancedMetadata;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SinkError {
    #[error("Failed to write metadata: {0}")]
    Io(String),

    #[error("Failed to serialize metadata: {0}")]
    Serialization(String),
}

/// Receives the final record of every completed extraction
#[async_trait]
pub trait MetadataSink: Send + Sync {
    async fn persist(
        &self,
        book_id: &str,
        user_id: &str,
        metadata: &AdvancedMetadata,
    ) -> Result<(), SinkError>;
}

/// Discards everything. Used when no sink is configured.
pub struct NoMetadataSink;

#[async_trait]
impl MetadataSink for NoMetadataSink {
    async fn persist(&self, _: &str, _: &str, _: &AdvancedMetadata) -> Result<(), SinkError> {
        Ok(())
    }
}
