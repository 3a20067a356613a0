//! CLI entrypoint for coverscan
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use coverscan_application::{
    ExtractionContext, ExtractionService, MetadataSink, NoMetadataSink, NoProgress,
    ProcessCoverInput, ProcessCoverUseCase, StrandProgressNotifier,
};
use coverscan_domain::{AgentConfigOverrides, AgentId, DomainError, ImageLocator, Severity};
use coverscan_infrastructure::{
    ConfigLoader, FileConfig, JsonlMetadataSink, LocalImageStore, TracingEventPublisher,
    build_catalog, build_strand_registry,
};
use coverscan_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressReporter};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Install the tracing subscriber; the guard must outlive `main`'s work.
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    match &cli.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()?
    } else {
        ConfigLoader::load(cli.config.as_ref())?
    };

    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            Severity::Warning => warn!("{}", issue.message),
            Severity::Error => eprintln!("config error: {}", issue.message),
        }
    }
    if issues.iter().any(|i| i.is_error()) {
        bail!("invalid configuration");
    }
    Ok(config)
}

fn metadata_sink(config: &FileConfig) -> Arc<dyn MetadataSink> {
    match &config.output.metadata_log {
        Some(path) => match JsonlMetadataSink::new(path) {
            Some(sink) => Arc::new(sink),
            None => {
                warn!("Metadata will not be persisted");
                Arc::new(NoMetadataSink)
            }
        },
        None => Arc::new(NoMetadataSink),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(&cli)?;

    info!("Starting coverscan");

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_ref()) {
            println!("{}", line);
        }
        let config = load_config(&cli)?;
        println!("\nEffective configuration:");
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let config = load_config(&cli)?;
    let Some(locator) = cli.locator() else {
        bail!("An image path or --bucket/--key is required");
    };

    // === Dependency Injection ===
    let store = Arc::new(LocalImageStore::new(config.storage.root.clone()));
    let strands = build_strand_registry(&config.strands, store);
    let catalog = build_catalog(&config.catalog);

    let mut service =
        ExtractionService::new(strands).with_behavior(config.timeouts.to_behavior_config());
    if let Some(catalog) = &catalog {
        service = service.with_catalog(catalog.clone());
    }
    let service = Arc::new(service);

    let agent_config = cli.agent_overrides().apply_to(&config.agent.to_agent_config());
    let overrides = AgentConfigOverrides::from(agent_config.clone());

    let cancellation = CancellationToken::new();
    let ctrl_c_token = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling extraction");
            ctrl_c_token.cancel();
        }
    });
    let context = ExtractionContext::new().with_cancellation(cancellation);

    let progress: Box<dyn StrandProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressReporter::new())
    };

    let book_id = cli.book_id.clone().unwrap_or_else(|| book_id_for(&locator));

    if cli.pipeline {
        let mut use_case = ProcessCoverUseCase::new(
            service.clone(),
            metadata_sink(&config),
            Arc::new(TracingEventPublisher::new()),
        );
        if let Some(catalog) = catalog {
            use_case = use_case.with_catalog(catalog);
        }

        let mut input = ProcessCoverInput::new(&book_id, &cli.user_id, locator);
        if service.strands().has_vision_strands() {
            input = input.with_vision(overrides);
        }
        if !agent_config.enrich_with_catalog {
            input = input.without_enrichment();
        }

        let output = use_case
            .execute_with_progress(input, &context, progress.as_ref())
            .await?;

        let text = match cli.output {
            OutputFormat::Full => ConsoleFormatter::format_pipeline(&output),
            OutputFormat::Summary => ConsoleFormatter::format_pipeline_summary(&output),
            OutputFormat::Json => ConsoleFormatter::format_json(&output),
        };
        println!("{}", text);
        return Ok(());
    }

    if !service.strands().has_vision_strands() {
        bail!(
            "No vision strands configured. Add [strands.vision-a] (or -b/-c) endpoints, or use --pipeline"
        );
    }

    let agent_id = AgentId::new(format!("cli-{}", book_id));
    service
        .create_agent(agent_id.clone(), &overrides)
        .map_err(explain)?;
    let result = service
        .execute_analysis_with_progress(&agent_id, &locator, &context, progress.as_ref())
        .await;
    service.cleanup_agent(&agent_id)?;
    let result = result.map_err(explain)?;

    let text = match cli.output {
        OutputFormat::Full => ConsoleFormatter::format_execution(&result),
        OutputFormat::Summary => ConsoleFormatter::format_execution_summary(&result),
        OutputFormat::Json => ConsoleFormatter::format_json(&result),
    };
    println!("{}", text);

    if !result.success {
        bail!(
            "{}",
            result.error.as_deref().unwrap_or("extraction failed")
        );
    }
    Ok(())
}

/// Point configuration mistakes at the config files
fn explain(error: DomainError) -> anyhow::Error {
    if error.is_configuration() {
        anyhow!("{} (check --show-config)", error)
    } else {
        error.into()
    }
}

/// Default book id: the image key without its extension
fn book_id_for(locator: &ImageLocator) -> String {
    std::path::Path::new(&locator.key)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(&locator.key)
        .to_string()
}
