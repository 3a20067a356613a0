//! Image storage port

use async_trait::async_trait;
use coverscan_domain::ImageLocator;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImageStoreError {
    #[error("Image not found: {0}")]
    NotFound(String),

    #[error("Image store error: {0}")]
    Io(String),
}

/// Object storage holding uploaded cover images
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn fetch(&self, locator: &ImageLocator) -> Result<Vec<u8>, ImageStoreError>;
}
