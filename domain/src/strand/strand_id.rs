//! Strand identifier value object

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of one recognition technique (Value Object)
///
/// A strand is an independent way of reading metadata off a cover image.
/// The built-in ids cover the barcode scanner, the OCR engine and three
/// vision-model analyzers; anything else registered at runtime is `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StrandId {
    Barcode,
    Ocr,
    VisionA,
    VisionB,
    VisionC,
    Custom(String),
}

impl StrandId {
    /// Get the string identifier for this strand
    pub fn as_str(&self) -> &str {
        match self {
            StrandId::Barcode => "barcode",
            StrandId::Ocr => "ocr",
            StrandId::VisionA => "vision-a",
            StrandId::VisionB => "vision-b",
            StrandId::VisionC => "vision-c",
            StrandId::Custom(s) => s,
        }
    }

    /// All vision-model strands, in declaration order
    pub fn vision_strands() -> Vec<StrandId> {
        vec![StrandId::VisionA, StrandId::VisionB, StrandId::VisionC]
    }

    /// Check if this is a vision-model strand
    pub fn is_vision(&self) -> bool {
        matches!(
            self,
            StrandId::VisionA | StrandId::VisionB | StrandId::VisionC
        )
    }
}

impl std::fmt::Display for StrandId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StrandId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if normalized.is_empty() || normalized.chars().any(char::is_whitespace) {
            return Err(DomainError::UnknownStrand(s.to_string()));
        }

        Ok(match normalized.as_str() {
            "barcode" => StrandId::Barcode,
            "ocr" => StrandId::Ocr,
            "vision-a" => StrandId::VisionA,
            "vision-b" => StrandId::VisionB,
            "vision-c" => StrandId::VisionC,
            _ => StrandId::Custom(normalized),
        })
    }
}

impl Serialize for StrandId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StrandId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
