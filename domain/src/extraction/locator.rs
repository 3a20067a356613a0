//! Image locator value object

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where a cover image lives in object storage
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageLocator {
    pub bucket: String,
    pub key: String,
}

impl ImageLocator {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Build a locator from a local path: the parent directory acts as the
    /// bucket and the file name as the key.
    pub fn from_path(path: &Path) -> Option<Self> {
        let key = path.file_name()?.to_str()?.to_string();
        let bucket = path
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| ".".to_string());
        Some(Self { bucket, key })
    }

    /// File extension of the key, lowercased
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.key)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
    }
}

impl std::fmt::Display for ImageLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_from_path() {
        let locator = ImageLocator::from_path(&PathBuf::from("covers/clean-code.JPG")).unwrap();
        assert_eq!(locator.bucket, "covers");
        assert_eq!(locator.key, "clean-code.JPG");
        assert_eq!(locator.extension().as_deref(), Some("jpg"));
    }

    #[test]
    fn test_from_bare_file_name() {
        let locator = ImageLocator::from_path(&PathBuf::from("cover.png")).unwrap();
        assert_eq!(locator.bucket, ".");
        assert_eq!(locator.to_string(), "./cover.png");
    }
}
