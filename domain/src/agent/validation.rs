//! Configuration issues detected while loading agent settings.
//!
//! Loaders never abort on a bad value; they fall back to the default and
//! report a [`ConfigIssue`] so the caller can decide whether to warn or stop.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A string field did not parse into its enum.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// A strand section names an id that cannot be parsed.
    UnknownStrand { id: String },
    /// A numeric field is outside its allowed range.
    OutOfRange { field: String, value: String },
    /// A strategy references strands that have no configured endpoint.
    MissingStrand { strategy: String, strand: String },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_severity() {
        let warning = ConfigIssue::warning(
            ConfigIssueCode::UnknownStrand { id: "x y".into() },
            "bad id",
        );
        assert!(!warning.is_error());

        let error = ConfigIssue::error(
            ConfigIssueCode::OutOfRange {
                field: "agent.confidence_threshold".into(),
                value: "2".into(),
            },
            "out of range",
        );
        assert!(error.is_error());
        assert_eq!(error.message, "out of range");
    }
}
