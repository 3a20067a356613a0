//! Local file system image store
//!
//! Maps `bucket/key` onto `<root>/<bucket>/<key>`. Absolute buckets (as
//! produced by [`ImageLocator::from_path`]) are used directly.

use async_trait::async_trait;
use coverscan_application::{ImageStore, ImageStoreError};
use coverscan_domain::ImageLocator;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a locator to a file path.
    ///
    /// Keys may not climb out of their bucket, and relative buckets may not
    /// climb out of the root.
    pub fn resolve(&self, locator: &ImageLocator) -> Result<PathBuf, ImageStoreError> {
        let key = Path::new(&locator.key);
        if key.is_absolute() || escapes(key) {
            return Err(ImageStoreError::Io(format!(
                "invalid image key: {}",
                locator.key
            )));
        }

        let bucket = Path::new(&locator.bucket);
        let base = if bucket.is_absolute() {
            bucket.to_path_buf()
        } else if escapes(bucket) {
            return Err(ImageStoreError::Io(format!(
                "invalid image bucket: {}",
                locator.bucket
            )));
        } else {
            self.root.join(bucket)
        };
        Ok(base.join(key))
    }
}

fn escapes(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn fetch(&self, locator: &ImageLocator) -> Result<Vec<u8>, ImageStoreError> {
        let path = self.resolve(locator)?;
        debug!("Reading image {}", path.display());

        tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => ImageStoreError::NotFound(locator.to_string()),
            _ => ImageStoreError::Io(format!("{}: {}", path.display(), e)),
        })
    }
}
