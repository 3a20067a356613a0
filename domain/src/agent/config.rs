//! Agent configuration
//!
//! [`AgentConfig`] is the fully-resolved configuration of one extraction
//! agent. Callers usually supply an [`AgentConfigOverrides`], which is
//! layered over the documented defaults.

use crate::core::error::DomainError;
use crate::orchestration::strategy::ExtractionStrategy;
use serde::{Deserialize, Serialize};

/// Default minimum confidence an extraction should reach
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Default cap on how many strands one run may attempt
pub const DEFAULT_MAX_STRAND_ATTEMPTS: usize = 3;

/// Resolved configuration of one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Which strands run, and in what order
    pub strategy: ExtractionStrategy,
    /// Sequential mode: stop at the first successful strand
    pub fallback_enabled: bool,
    /// Informational threshold reported on the result (0.0-1.0)
    pub confidence_threshold: f64,
    /// Run every strand concurrently instead of one after another
    pub parallel_execution: bool,
    /// Cross-check the consensus against the bibliographic catalog
    #[serde(alias = "enrich_with_google")]
    pub enrich_with_catalog: bool,
    /// Upper bound on strands attempted per run
    pub max_strand_attempts: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            strategy: ExtractionStrategy::BestEffort,
            fallback_enabled: true,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            parallel_execution: false,
            enrich_with_catalog: true,
            max_strand_attempts: DEFAULT_MAX_STRAND_ATTEMPTS,
        }
    }
}

impl AgentConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(DomainError::InvalidConfig(format!(
                "confidence_threshold must be within 0.0-1.0, got {}",
                self.confidence_threshold
            )));
        }
        if self.max_strand_attempts == 0 {
            return Err(DomainError::InvalidConfig(
                "max_strand_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Partial configuration supplied by a caller
///
/// Every `Some` value replaces the corresponding base value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfigOverrides {
    pub strategy: Option<ExtractionStrategy>,
    pub fallback_enabled: Option<bool>,
    pub confidence_threshold: Option<f64>,
    pub parallel_execution: Option<bool>,
    #[serde(alias = "enrich_with_google")]
    pub enrich_with_catalog: Option<bool>,
    pub max_strand_attempts: Option<usize>,
}

impl AgentConfigOverrides {
    /// Layer these overrides over `base`
    pub fn apply_to(&self, base: &AgentConfig) -> AgentConfig {
        AgentConfig {
            strategy: self.strategy.unwrap_or(base.strategy),
            fallback_enabled: self.fallback_enabled.unwrap_or(base.fallback_enabled),
            confidence_threshold: self
                .confidence_threshold
                .unwrap_or(base.confidence_threshold),
            parallel_execution: self.parallel_execution.unwrap_or(base.parallel_execution),
            enrich_with_catalog: self.enrich_with_catalog.unwrap_or(base.enrich_with_catalog),
            max_strand_attempts: self.max_strand_attempts.unwrap_or(base.max_strand_attempts),
        }
    }

    /// Resolve over the documented defaults
    pub fn resolve(&self) -> AgentConfig {
        self.apply_to(&AgentConfig::default())
    }
}

impl From<AgentConfig> for AgentConfigOverrides {
    fn from(config: AgentConfig) -> Self {
        Self {
            strategy: Some(config.strategy),
            fallback_enabled: Some(config.fallback_enabled),
            confidence_threshold: Some(config.confidence_threshold),
            parallel_execution: Some(config.parallel_execution),
            enrich_with_catalog: Some(config.enrich_with_catalog),
            max_strand_attempts: Some(config.max_strand_attempts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.strategy, ExtractionStrategy::BestEffort);
        assert!(config.fallback_enabled);
        assert!(config.enrich_with_catalog);
        assert!(!config.parallel_execution);
        assert_eq!(config.confidence_threshold, 0.7);
        assert_eq!(config.max_strand_attempts, 3);
    }

    #[test]
    fn test_overrides_merge_over_defaults() {
        let overrides = AgentConfigOverrides {
            strategy: Some(ExtractionStrategy::CostOptimized),
            parallel_execution: Some(true),
            ..Default::default()
        };
        let config = overrides.resolve();
        assert_eq!(config.strategy, ExtractionStrategy::CostOptimized);
        assert!(config.parallel_execution);
        assert!(config.fallback_enabled);
        assert_eq!(config.confidence_threshold, 0.7);
    }

    #[test]
    fn test_validate_ranges() {
        assert!(AgentConfig::default().validate().is_ok());

        let config = AgentConfig {
            confidence_threshold: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(DomainError::InvalidConfig(_))
        ));

        let config = AgentConfig {
            max_strand_attempts: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides_accept_google_alias() {
        let overrides: AgentConfigOverrides =
            serde_json::from_str(r#"{"enrich_with_google": false, "strategy": "accuracy-first"}"#)
                .unwrap();
        assert_eq!(overrides.enrich_with_catalog, Some(false));
        assert_eq!(overrides.strategy, Some(ExtractionStrategy::AccuracyFirst));
    }
}
