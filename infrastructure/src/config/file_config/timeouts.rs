//! Timeout configuration from TOML (`[timeouts]` section)

use coverscan_application::BehaviorConfig;
use coverscan_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Raw timeout configuration from TOML
///
/// ```toml
/// [timeouts]
/// strand_seconds = 30
/// catalog_seconds = 15
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTimeoutsConfig {
    /// Per-strand call timeout
    pub strand_seconds: u64,
    /// Catalog lookup timeout
    pub catalog_seconds: u64,
}

impl Default for FileTimeoutsConfig {
    fn default() -> Self {
        Self {
            strand_seconds: 30,
            catalog_seconds: 15,
        }
    }
}

impl FileTimeoutsConfig {
    pub fn to_behavior_config(&self) -> BehaviorConfig {
        BehaviorConfig::from_seconds(self.strand_seconds, self.catalog_seconds)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        [
            ("timeouts.strand_seconds", self.strand_seconds),
            ("timeouts.catalog_seconds", self.catalog_seconds),
        ]
        .into_iter()
        .filter(|(_, value)| *value == 0)
        .map(|(field, _)| {
            ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: field.to_string(),
                    value: "0".to_string(),
                },
                format!("{} cannot be 0", field),
            )
        })
        .collect()
    }
}
