//! CLI command definitions

use clap::{Parser, ValueEnum};
use coverscan_domain::{AgentConfigOverrides, ExtractionStrategy, ImageLocator};
use std::path::{Component, PathBuf};

/// Output format for extraction results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Everything: metadata, per-field confidence, strands, provenance
    Full,
    /// Metadata and the overall confidence only
    Summary,
    /// JSON output
    Json,
}

/// CLI arguments for coverscan
#[derive(Parser, Debug)]
#[command(name = "coverscan")]
#[command(author, version, about = "Extract book metadata from cover images")]
#[command(long_about = r#"
coverscan reads book metadata (title, authors, ISBN, publisher) off a
cover image by running several recognizers ("strands") and merging what
they report.

By default only the vision strands run, ordered by --strategy. With
--pipeline the barcode and OCR strands run too, the results are merged
per field, cross-checked against the book catalog, persisted and
announced as a `book.metadata.extracted` event.

Configuration files are loaded from (in priority order):
1. COVERSCAN_* environment variables
2. --config <path>     Explicit config file
3. ./coverscan.toml    Project-level config
4. ~/.config/coverscan/config.toml   Global config

Example:
  coverscan ./covers/clean-code.jpg
  coverscan --strategy accuracy-first --parallel ./covers/dune.png
  coverscan --pipeline --book-id b-42 --user-id u-7 --bucket uploads --key b-42.jpg
"#)]
pub struct Cli {
    /// Local cover image (parent directory = bucket, file name = key)
    #[arg(required_unless_present_any = ["bucket", "show_config"], conflicts_with_all = ["bucket", "key"])]
    pub image: Option<PathBuf>,

    /// Storage bucket of the cover image
    #[arg(long, requires = "key")]
    pub bucket: Option<String>,

    /// Storage key of the cover image
    #[arg(long, requires = "bucket")]
    pub key: Option<String>,

    /// Extraction strategy (best-effort, cost-optimized, accuracy-first)
    #[arg(short, long, value_name = "STRATEGY", value_parser = parse_strategy)]
    pub strategy: Option<ExtractionStrategy>,

    /// Run strands concurrently
    #[arg(long)]
    pub parallel: bool,

    /// Try every strand instead of stopping at the first success
    #[arg(long)]
    pub no_fallback: bool,

    /// Skip catalog enrichment
    #[arg(long)]
    pub no_enrich: bool,

    /// Run the full pipeline (barcode, OCR, vision, catalog, persist)
    #[arg(long)]
    pub pipeline: bool,

    /// Book id recorded by the pipeline (defaults to the image key)
    #[arg(long, value_name = "ID")]
    pub book_id: Option<String>,

    /// User id recorded by the pipeline
    #[arg(long, value_name = "ID", default_value = "local")]
    pub user_id: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

fn parse_strategy(value: &str) -> Result<ExtractionStrategy, String> {
    value.parse().map_err(|e: coverscan_domain::DomainError| {
        format!(
            "{} (expected one of: {})",
            e,
            ExtractionStrategy::valid_names().join(", ")
        )
    })
}

impl Cli {
    /// Where the cover lives, from the positional path or `--bucket/--key`
    ///
    /// Positional paths that climb through `..` are made absolute, since the
    /// image store rejects relative buckets outside its root.
    pub fn locator(&self) -> Option<ImageLocator> {
        match (&self.image, &self.bucket, &self.key) {
            (Some(path), _, _) if path.components().any(|c| c == Component::ParentDir) => {
                ImageLocator::from_path(&std::path::absolute(path).ok()?)
            }
            (Some(path), _, _) => ImageLocator::from_path(path),
            (None, Some(bucket), Some(key)) => Some(ImageLocator::new(bucket, key)),
            _ => None,
        }
    }

    /// Flags that override the configured agent settings
    pub fn agent_overrides(&self) -> AgentConfigOverrides {
        AgentConfigOverrides {
            strategy: self.strategy,
            fallback_enabled: self.no_fallback.then_some(false),
            parallel_execution: self.parallel.then_some(true),
            enrich_with_catalog: self.no_enrich.then_some(false),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_image() {
        let cli = Cli::try_parse_from(["coverscan", "covers/dune.jpg"]).unwrap();
        let locator = cli.locator().unwrap();
        assert_eq!(locator.bucket, "covers");
        assert_eq!(locator.key, "dune.jpg");
        assert_eq!(cli.output, OutputFormat::Summary);
        assert_eq!(cli.agent_overrides(), AgentConfigOverrides::default());
    }

    #[test]
    fn test_parent_relative_image_becomes_absolute() {
        let cli = Cli::try_parse_from(["coverscan", "../covers/dune.jpg"]).unwrap();
        let locator = cli.locator().unwrap();
        assert!(std::path::Path::new(&locator.bucket).is_absolute());
        assert_eq!(locator.key, "dune.jpg");
    }

    #[test]
    fn test_bucket_and_key() {
        let cli =
            Cli::try_parse_from(["coverscan", "--bucket", "uploads", "--key", "b-1.jpg"]).unwrap();
        assert_eq!(cli.locator(), Some(ImageLocator::new("uploads", "b-1.jpg")));
    }

    #[test]
    fn test_bucket_requires_key() {
        assert!(Cli::try_parse_from(["coverscan", "--bucket", "uploads"]).is_err());
    }

    #[test]
    fn test_image_required_without_show_config() {
        assert!(Cli::try_parse_from(["coverscan"]).is_err());
        assert!(Cli::try_parse_from(["coverscan", "--show-config"]).is_ok());
    }

    #[test]
    fn test_flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "coverscan",
            "--strategy",
            "accuracy-first",
            "--parallel",
            "--no-fallback",
            "--no-enrich",
            "cover.jpg",
        ])
        .unwrap();
        let overrides = cli.agent_overrides();
        assert_eq!(overrides.strategy, Some(ExtractionStrategy::AccuracyFirst));
        assert_eq!(overrides.parallel_execution, Some(true));
        assert_eq!(overrides.fallback_enabled, Some(false));
        assert_eq!(overrides.enrich_with_catalog, Some(false));
        assert_eq!(overrides.max_strand_attempts, None);
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let err = Cli::try_parse_from(["coverscan", "--strategy", "fastest", "c.jpg"]).unwrap_err();
        assert!(err.to_string().contains("best-effort"));
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = Cli::try_parse_from(["coverscan", "-vv", "c.jpg"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
