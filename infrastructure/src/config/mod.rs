//! Configuration file loading for coverscan
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `COVERSCAN_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./coverscan.toml` or `./.coverscan.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/coverscan/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    DEFAULT_CATALOG_URL, FileAgentConfig, FileCatalogConfig, FileConfig, FileOutputConfig,
    FileStorageConfig, FileStrandConfig, FileStrandsConfig, FileTimeoutsConfig, enabled_strands,
    validate_strands,
};
pub use loader::{ConfigError, ConfigLoader};
