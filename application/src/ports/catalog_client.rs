//! Bibliographic catalog port

use async_trait::async_trait;
use coverscan_domain::{CatalogQuery, CatalogRecord};
use thiserror::Error;

/// Errors that can occur during a catalog lookup
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Catalog request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid catalog response: {0}")]
    InvalidResponse(String),

    #[error("Catalog lookup timed out")]
    Timeout,
}

/// Authoritative bibliographic source (e.g. Google Books)
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Find the best record for `query`; `Ok(None)` when nothing matched
    async fn search(&self, query: &CatalogQuery) -> Result<Option<CatalogRecord>, CatalogError>;
}
