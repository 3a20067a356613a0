//! Agent configuration from TOML (`[agent]` section)

use coverscan_domain::agent::config::{DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_MAX_STRAND_ATTEMPTS};
use coverscan_domain::{AgentConfig, ConfigIssue, ConfigIssueCode, ExtractionStrategy};
use serde::{Deserialize, Serialize};

/// Raw agent configuration from TOML
///
/// # Example
///
/// ```toml
/// [agent]
/// strategy = "best-effort"        # "best-effort", "cost-optimized", "accuracy-first"
/// fallback_enabled = true
/// parallel_execution = false
/// enrich_with_catalog = true
/// confidence_threshold = 0.7
/// max_strand_attempts = 3
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    /// Extraction strategy name
    pub strategy: String,
    /// Stop at the first successful strand in sequential mode
    pub fallback_enabled: bool,
    /// Run strands concurrently
    pub parallel_execution: bool,
    /// Cross-check results against the book catalog
    #[serde(alias = "enrich_with_google")]
    pub enrich_with_catalog: bool,
    /// Minimum confidence reported as meeting the threshold
    pub confidence_threshold: f64,
    /// Upper bound on strands attempted per run
    pub max_strand_attempts: usize,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        Self {
            strategy: ExtractionStrategy::default().as_str().to_string(),
            fallback_enabled: true,
            parallel_execution: false,
            enrich_with_catalog: true,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            max_strand_attempts: DEFAULT_MAX_STRAND_ATTEMPTS,
        }
    }
}

impl FileAgentConfig {
    /// Parse the strategy name, falling back to `best-effort` with a warning.
    pub fn parse_strategy(&self) -> (ExtractionStrategy, Vec<ConfigIssue>) {
        match self.strategy.parse::<ExtractionStrategy>() {
            Ok(strategy) => (strategy, vec![]),
            Err(_) => {
                let fallback = ExtractionStrategy::default();
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "agent.strategy".to_string(),
                        value: self.strategy.clone(),
                        valid_values: ExtractionStrategy::valid_names(),
                    },
                    format!(
                        "agent.strategy: unknown value '{}', falling back to '{}'",
                        self.strategy, fallback
                    ),
                );
                (fallback, vec![issue])
            }
        }
    }

    /// Range checks for the numeric fields
    pub fn range_issues(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "agent.confidence_threshold".to_string(),
                    value: self.confidence_threshold.to_string(),
                },
                format!(
                    "agent.confidence_threshold must be within 0.0-1.0, got {}",
                    self.confidence_threshold
                ),
            ));
        }

        if self.max_strand_attempts == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "agent.max_strand_attempts".to_string(),
                    value: "0".to_string(),
                },
                "agent.max_strand_attempts must be at least 1",
            ));
        }

        issues
    }

    /// Resolve into a domain [`AgentConfig`]; an unknown strategy falls back.
    pub fn to_agent_config(&self) -> AgentConfig {
        AgentConfig {
            strategy: self.parse_strategy().0,
            fallback_enabled: self.fallback_enabled,
            confidence_threshold: self.confidence_threshold,
            parallel_execution: self.parallel_execution,
            enrich_with_catalog: self.enrich_with_catalog,
            max_strand_attempts: self.max_strand_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coverscan_domain::Severity;

    #[test]
    fn test_defaults_match_domain() {
        let config = FileAgentConfig::default().to_agent_config();
        assert_eq!(config, AgentConfig::default());
    }

    #[test]
    fn test_parse_strategy_valid() {
        let config = FileAgentConfig {
            strategy: "accuracy-first".to_string(),
            ..Default::default()
        };
        let (strategy, issues) = config.parse_strategy();
        assert_eq!(strategy, ExtractionStrategy::AccuracyFirst);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_parse_strategy_unknown_warns() {
        let config = FileAgentConfig {
            strategy: "cheapest".to_string(),
            ..Default::default()
        };
        let (strategy, issues) = config.parse_strategy();
        assert_eq!(strategy, ExtractionStrategy::BestEffort);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(issues[0].message.contains("cheapest"));
    }

    #[test]
    fn test_range_issues() {
        let config = FileAgentConfig {
            confidence_threshold: 1.5,
            max_strand_attempts: 0,
            ..Default::default()
        };
        let issues = config.range_issues();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(ConfigIssue::is_error));
    }
}
