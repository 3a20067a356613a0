//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Strings stay strings here; parsing into domain types happens in the
//! `parse_*`/`to_*` helpers, which report a [`ConfigIssue`] instead of
//! failing.

mod agent;
mod catalog;
mod output;
mod storage;
mod strands;
mod timeouts;

pub use agent::FileAgentConfig;
pub use catalog::{DEFAULT_CATALOG_URL, FileCatalogConfig};
pub use output::FileOutputConfig;
pub use storage::FileStorageConfig;
pub use strands::{FileStrandConfig, FileStrandsConfig, enabled_strands, validate_strands};
pub use timeouts::FileTimeoutsConfig;

use coverscan_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Default agent settings
    pub agent: FileAgentConfig,
    /// Strand and catalog timeouts
    pub timeouts: FileTimeoutsConfig,
    /// Book catalog settings
    pub catalog: FileCatalogConfig,
    /// Remote recognizer endpoints keyed by strand id
    pub strands: FileStrandsConfig,
    /// Local image storage
    pub storage: FileStorageConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks:
    /// 1. Unknown strategy name
    /// 2. Numeric ranges (threshold, attempts, timeouts)
    /// 3. Strand ids and strategy coverage
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        let (strategy, strategy_issues) = self.agent.parse_strategy();
        issues.extend(strategy_issues);

        issues.extend(self.agent.range_issues());
        issues.extend(self.timeouts.validate());

        issues.extend(validate_strands(&self.strands, strategy));

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coverscan_domain::{ConfigIssueCode, ExtractionStrategy};

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[agent]
strategy = "accuracy-first"
parallel_execution = true
enrich_with_google = false
confidence_threshold = 0.8

[timeouts]
strand_seconds = 10

[catalog]
api_key = "secret"

[strands.vision-a]
endpoint = "http://localhost:8090/a"
cost_per_call = 0.002

[storage]
root = "/srv/covers"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.agent.parse_strategy().0,
            ExtractionStrategy::AccuracyFirst
        );
        assert!(config.agent.parallel_execution);
        assert!(!config.agent.enrich_with_catalog);
        assert_eq!(config.agent.confidence_threshold, 0.8);
        assert_eq!(config.timeouts.strand_seconds, 10);
        assert_eq!(config.timeouts.catalog_seconds, 15);
        assert_eq!(config.catalog.api_key.as_deref(), Some("secret"));
        assert_eq!(config.catalog.base_url, DEFAULT_CATALOG_URL);
        assert_eq!(config.strands["vision-a"].cost_per_call, 0.002);
        assert_eq!(config.storage.root.to_string_lossy(), "/srv/covers");
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[agent]
strategy = "cost-optimized"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.agent.fallback_enabled);
        assert!(config.catalog.enabled);
        assert!(config.strands.is_empty());
        assert!(config.output.metadata_log.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_collects_every_issue() {
        let toml_str = r#"
[agent]
strategy = "fastest"
confidence_threshold = -0.1
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 2);
        assert!(matches!(
            issues[0].code,
            ConfigIssueCode::InvalidEnumValue { .. }
        ));
        assert!(issues[1].is_error());
    }
}
