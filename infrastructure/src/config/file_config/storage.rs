//! Image storage configuration from TOML (`[storage]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw storage configuration from TOML
///
/// Buckets are resolved as directories under `root`; an absolute bucket
/// path is used as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    pub root: PathBuf,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}
