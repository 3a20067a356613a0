//! Output configuration from TOML (`[output]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw output configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Output format name (`full`, `summary`, `json`)
    pub format: Option<String>,
    /// Enable colored terminal output
    pub color: bool,
    /// JSONL file that receives every persisted metadata record
    pub metadata_log: Option<PathBuf>,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
            metadata_log: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_deserialize() {
        let toml_str = r#"
[output]
format = "json"
metadata_log = "/tmp/covers.jsonl"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output.format.as_deref(), Some("json"));
        assert_eq!(
            config.output.metadata_log,
            Some(PathBuf::from("/tmp/covers.jsonl"))
        );
        assert!(config.output.color);
    }
}
