//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave,
//! such as timeouts on external calls.

use std::time::Duration;

/// Default upper bound for a single strand call
pub const DEFAULT_STRAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Default upper bound for a catalog lookup
pub const DEFAULT_CATALOG_TIMEOUT: Duration = Duration::from_secs(15);

/// Application behavior configuration.
///
/// Every external call made by a use case is bounded by one of these
/// timeouts. A strand that times out is recorded as failed; a catalog lookup
/// that times out is skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviorConfig {
    pub strand_timeout: Duration,
    pub catalog_timeout: Duration,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            strand_timeout: DEFAULT_STRAND_TIMEOUT,
            catalog_timeout: DEFAULT_CATALOG_TIMEOUT,
        }
    }
}

impl BehaviorConfig {
    /// Creates a BehaviorConfig from timeouts specified in seconds.
    pub fn from_seconds(strand_seconds: u64, catalog_seconds: u64) -> Self {
        Self {
            strand_timeout: Duration::from_secs(strand_seconds),
            catalog_timeout: Duration::from_secs(catalog_seconds),
        }
    }

    pub fn with_strand_timeout(mut self, timeout: Duration) -> Self {
        self.strand_timeout = timeout;
        self
    }

    pub fn with_catalog_timeout(mut self, timeout: Duration) -> Self {
        self.catalog_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BehaviorConfig::default();
        assert_eq!(config.strand_timeout, Duration::from_secs(30));
        assert_eq!(config.catalog_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_from_seconds() {
        let config = BehaviorConfig::from_seconds(5, 2);
        assert_eq!(config.strand_timeout, Duration::from_secs(5));
        assert_eq!(config.catalog_timeout, Duration::from_secs(2));
    }
}
