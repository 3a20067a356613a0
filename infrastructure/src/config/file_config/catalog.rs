//! Catalog configuration from TOML (`[catalog]` section)

use serde::{Deserialize, Serialize};

/// Google Books volumes endpoint
pub const DEFAULT_CATALOG_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// Raw catalog configuration from TOML
///
/// ```toml
/// [catalog]
/// enabled = true
/// base_url = "https://www.googleapis.com/books/v1/volumes"
/// api_key = "..."            # optional
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCatalogConfig {
    pub enabled: bool,
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Default for FileCatalogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_CATALOG_URL.to_string(),
            api_key: None,
        }
    }
}
