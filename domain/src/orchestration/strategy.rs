//! Extraction strategies
//!
//! A strategy is a named policy that decides which strands run for an
//! agent and in what order. The table is fixed:
//!
//! | strategy         | order                              |
//! |------------------|------------------------------------|
//! | `best-effort`    | vision-a, vision-b, vision-c       |
//! | `cost-optimized` | vision-a                           |
//! | `accuracy-first` | vision-c, vision-a, vision-b       |

use crate::core::error::DomainError;
use crate::strand::StrandId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Named strand-ordering policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExtractionStrategy {
    /// Try every vision model, cheapest-first
    #[default]
    BestEffort,
    /// Only the cheapest vision model
    CostOptimized,
    /// Most accurate model first, then the rest
    AccuracyFirst,
}

impl ExtractionStrategy {
    pub const ALL: [ExtractionStrategy; 3] = [
        ExtractionStrategy::BestEffort,
        ExtractionStrategy::CostOptimized,
        ExtractionStrategy::AccuracyFirst,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionStrategy::BestEffort => "best-effort",
            ExtractionStrategy::CostOptimized => "cost-optimized",
            ExtractionStrategy::AccuracyFirst => "accuracy-first",
        }
    }

    /// Ordered list of strands to try
    pub fn strand_order(&self) -> Vec<StrandId> {
        match self {
            ExtractionStrategy::BestEffort => {
                vec![StrandId::VisionA, StrandId::VisionB, StrandId::VisionC]
            }
            ExtractionStrategy::CostOptimized => vec![StrandId::VisionA],
            ExtractionStrategy::AccuracyFirst => {
                vec![StrandId::VisionC, StrandId::VisionA, StrandId::VisionB]
            }
        }
    }

    /// Names accepted by [`FromStr`](std::str::FromStr)
    pub fn valid_names() -> Vec<String> {
        Self::ALL.iter().map(|s| s.as_str().to_string()).collect()
    }
}

/// Resolve a strategy name to its strand order.
///
/// Unknown names are a configuration error, never a silent fallback.
pub fn strand_order(strategy: &str) -> Result<Vec<StrandId>, DomainError> {
    strategy
        .parse::<ExtractionStrategy>()
        .map(|s| s.strand_order())
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ExtractionStrategy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "best-effort" => Ok(ExtractionStrategy::BestEffort),
            "cost-optimized" => Ok(ExtractionStrategy::CostOptimized),
            "accuracy-first" => Ok(ExtractionStrategy::AccuracyFirst),
            _ => Err(DomainError::UnknownStrategy(s.to_string())),
        }
    }
}

impl Serialize for ExtractionStrategy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ExtractionStrategy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
