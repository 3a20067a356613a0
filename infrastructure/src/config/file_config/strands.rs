//! Strand endpoint configuration from TOML (`[strands.<id>]` tables)

use coverscan_domain::{ConfigIssue, ConfigIssueCode, ExtractionStrategy, StrandId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One remote recognizer
///
/// ```toml
/// [strands.barcode]
/// endpoint = "http://localhost:8081/decode"
///
/// [strands.vision-a]
/// endpoint = "http://localhost:8090/analyze"
/// cost_per_call = 0.002
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStrandConfig {
    pub endpoint: Option<String>,
    pub cost_per_call: f64,
}

impl FileStrandConfig {
    pub fn is_enabled(&self) -> bool {
        self.endpoint.as_deref().is_some_and(|e| !e.trim().is_empty())
    }
}

/// All `[strands.*]` tables keyed by strand id
pub type FileStrandsConfig = BTreeMap<String, FileStrandConfig>;

/// Strand tables that have an endpoint, with their parsed ids.
///
/// Ids that fail to parse are skipped; [`validate_strands`] reports them.
pub fn enabled_strands(strands: &FileStrandsConfig) -> Vec<(StrandId, &FileStrandConfig)> {
    strands
        .iter()
        .filter(|(_, config)| config.is_enabled())
        .filter_map(|(id, config)| id.parse::<StrandId>().ok().map(|id| (id, config)))
        .collect()
}

/// Report unparseable ids, and strategy strands left without an endpoint
/// once any vision strand is configured.
pub fn validate_strands(
    strands: &FileStrandsConfig,
    strategy: ExtractionStrategy,
) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();

    for id in strands.keys() {
        if id.parse::<StrandId>().is_err() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::UnknownStrand { id: id.clone() },
                format!("strands.{}: invalid strand id, section ignored", id),
            ));
        }
    }

    let enabled: Vec<StrandId> = enabled_strands(strands)
        .into_iter()
        .map(|(id, _)| id)
        .collect();
    if enabled.iter().any(StrandId::is_vision) {
        for strand in strategy.strand_order() {
            if !enabled.contains(&strand) {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::MissingStrand {
                        strategy: strategy.to_string(),
                        strand: strand.to_string(),
                    },
                    format!(
                        "strategy '{}' uses strand '{}' but [strands.{}] has no endpoint",
                        strategy, strand, strand
                    ),
                ));
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strand(endpoint: &str) -> FileStrandConfig {
        FileStrandConfig {
            endpoint: Some(endpoint.to_string()),
            cost_per_call: 0.0,
        }
    }

    #[test]
    fn test_enabled_strands_skip_missing_endpoint() {
        let strands = FileStrandsConfig::from([
            ("barcode".to_string(), strand("http://localhost/decode")),
            ("ocr".to_string(), FileStrandConfig::default()),
        ]);
        let enabled = enabled_strands(&strands);
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].0, StrandId::Barcode);
    }

    #[test]
    fn test_invalid_id_reported() {
        let strands = FileStrandsConfig::from([("two words".to_string(), strand("http://x"))]);
        let issues = validate_strands(&strands, ExtractionStrategy::CostOptimized);
        assert_eq!(issues.len(), 1);
        assert!(matches!(issues[0].code, ConfigIssueCode::UnknownStrand { .. }));
    }

    #[test]
    fn test_missing_strategy_strand_reported() {
        let strands = FileStrandsConfig::from([("vision-a".to_string(), strand("http://x"))]);
        let issues = validate_strands(&strands, ExtractionStrategy::BestEffort);
        let missing: Vec<_> = issues
            .iter()
            .filter_map(|i| match &i.code {
                ConfigIssueCode::MissingStrand { strand, .. } => Some(strand.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(missing, vec!["vision-b", "vision-c"]);
    }

    #[test]
    fn test_no_vision_strands_is_not_an_issue() {
        let strands = FileStrandsConfig::from([("ocr".to_string(), strand("http://x"))]);
        assert!(validate_strands(&strands, ExtractionStrategy::BestEffort).is_empty());
    }
}
