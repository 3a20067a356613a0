//! Process Cover use case
//!
//! The catalog-aware pipeline run for every uploaded cover:
//!
//! 1. Barcode and OCR strands, concurrently
//! 2. Vision strands through an ephemeral orchestrator agent (optional)
//! 3. Per-field merge: highest confidence wins, ties go to the earlier
//!    source (barcode, then OCR, then vision)
//! 4. Catalog enrichment
//! 5. Field-weighted confidence
//! 6. Persist, then publish `book.metadata.extracted` exactly once

use crate::ports::catalog_client::CatalogClient;
use crate::ports::event_publisher::{DomainEvent, EventPublisher};
use crate::ports::metadata_sink::{MetadataSink, SinkError};
use crate::ports::progress::{NoProgress, StrandProgressNotifier};
use crate::ports::strand_adapter::{AnalysisOptions, StrandAdapter};
use crate::use_cases::enrich_metadata::CatalogEnrichmentResolver;
use crate::use_cases::extraction_service::{ExtractionContext, ExtractionService, invoke_strand};
use chrono::Utc;
use coverscan_domain::{
    AdvancedMetadata, AgentConfigOverrides, AgentId, BookMetadata, CATALOG_CONFIDENCE,
    DomainError, ExecutionResult, FieldScore, FieldSource, ImageLocator,
    METADATA_EXTRACTED_EVENT, MetadataExtractedEvent, MetadataField, ProvenanceEntry, StrandId,
    StrandResult, calculate_field_weighted_confidence,
};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Errors that can occur while processing a cover
#[derive(Error, Debug)]
pub enum ProcessCoverError {
    #[error(transparent)]
    Domain(DomainError),

    #[error("No strand extracted any metadata from {0}")]
    NothingExtracted(String),

    #[error("Failed to persist metadata: {0}")]
    Persist(#[from] SinkError),

    #[error("Operation cancelled")]
    Cancelled,
}

impl ProcessCoverError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ProcessCoverError::Cancelled)
    }
}

impl From<DomainError> for ProcessCoverError {
    fn from(e: DomainError) -> Self {
        if e.is_cancelled() {
            ProcessCoverError::Cancelled
        } else {
            ProcessCoverError::Domain(e)
        }
    }
}

/// Input for the ProcessCover use case
#[derive(Debug, Clone)]
pub struct ProcessCoverInput {
    pub book_id: String,
    pub user_id: String,
    pub source: ImageLocator,
    /// Run the vision strands with this agent configuration
    pub agent: Option<AgentConfigOverrides>,
    /// Cross-check against the catalog
    pub enrich: bool,
}

impl ProcessCoverInput {
    pub fn new(
        book_id: impl Into<String>,
        user_id: impl Into<String>,
        source: ImageLocator,
    ) -> Self {
        Self {
            book_id: book_id.into(),
            user_id: user_id.into(),
            source,
            agent: None,
            enrich: true,
        }
    }

    pub fn with_vision(mut self, agent: AgentConfigOverrides) -> Self {
        self.agent = Some(agent);
        self
    }

    pub fn without_enrichment(mut self) -> Self {
        self.enrich = false;
        self
    }
}

/// Output of the ProcessCover use case
#[derive(Debug, Clone, Serialize)]
pub struct ProcessCoverOutput {
    pub advanced_metadata: AdvancedMetadata,
    pub event: MetadataExtractedEvent,
    /// Barcode, OCR and vision strand outcomes, in that order
    pub strand_results: Vec<StrandResult>,
}

/// Everything one source reported
struct SourceReport {
    source: FieldSource,
    metadata: BookMetadata,
    confidence: BTreeMap<MetadataField, f64>,
    overall: f64,
    details: serde_json::Value,
}

impl SourceReport {
    fn from_strand(result: &StrandResult) -> Option<Self> {
        let metadata = result.metadata.clone().filter(|_| result.success)?;
        let confidence = metadata
            .populated_fields()
            .into_iter()
            .map(|field| (field, result.field_confidence(field)))
            .collect();

        Some(Self {
            source: FieldSource::from_strand(&result.strand),
            metadata,
            confidence,
            overall: result.overall_confidence(),
            details: json!({
                "strand": result.strand,
                "processingTimeMs": result.processing_time_ms,
            }),
        })
    }

    fn from_vision(agent: &AgentId, result: &ExecutionResult) -> Option<Self> {
        let metadata = result.metadata.clone().filter(|_| result.success)?;

        Some(Self {
            source: FieldSource::Vision,
            confidence: result.field_confidence.clone(),
            overall: result.overall_confidence(),
            details: json!({
                "agent": agent.as_str(),
                "strands": result.workflow.completed_strands,
                "failedStrands": result.workflow.failed_strands.len(),
                "cost": result.cost,
            }),
            metadata,
        })
    }
}

/// Field-level merge of every source
#[derive(Default)]
struct MergedFields {
    metadata: BookMetadata,
    confidence: BTreeMap<MetadataField, f64>,
    field_sources: BTreeMap<MetadataField, FieldSource>,
    provenance: BTreeMap<String, ProvenanceEntry>,
}

impl MergedFields {
    /// Per field, the most confident report wins; `reports` is in
    /// precedence order so ties keep the earlier source.
    fn merge(reports: &[SourceReport]) -> Self {
        let mut merged = Self::default();

        for report in reports {
            merged.provenance.insert(
                report.source.to_string(),
                ProvenanceEntry::new(report.source, report.overall)
                    .with_details(report.details.clone()),
            );
        }

        for field in MetadataField::ALL {
            let mut winner: Option<(&SourceReport, f64)> = None;
            for report in reports.iter().filter(|r| r.metadata.has(field)) {
                let confidence = report
                    .confidence
                    .get(&field)
                    .copied()
                    .unwrap_or(report.overall);
                if winner.is_none_or(|(_, best)| confidence > best) {
                    winner = Some((report, confidence));
                }
            }

            let Some((report, confidence)) = winner else {
                continue;
            };
            copy_field(&report.metadata, &mut merged.metadata, field);
            merged.attribute(field, confidence, report.source);
        }

        merged
    }

    fn attribute(&mut self, field: MetadataField, confidence: f64, source: FieldSource) {
        if let Some(previous) = self.field_sources.insert(field, source)
            && let Some(entry) = self.provenance.get_mut(previous.as_str())
        {
            entry.fields.retain(|f| *f != field);
        }
        self.confidence.insert(field, confidence);
        if let Some(entry) = self.provenance.get_mut(source.as_str()) {
            entry.fields.push(field);
        }
    }
}

fn copy_field(from: &BookMetadata, to: &mut BookMetadata, field: MetadataField) {
    if field == MetadataField::PageCount {
        to.page_count = from.page_count;
    } else if let Some(list) = to.list_mut(field) {
        *list = from.list(field).to_vec();
    } else if let Some(value) = from.text(field) {
        to.set_text(field, value);
    }
}

/// Use case for processing one uploaded cover
pub struct ProcessCoverUseCase {
    service: Arc<ExtractionService>,
    catalog: Option<Arc<dyn CatalogClient>>,
    sink: Arc<dyn MetadataSink>,
    events: Arc<dyn EventPublisher>,
}

impl ProcessCoverUseCase {
    pub fn new(
        service: Arc<ExtractionService>,
        sink: Arc<dyn MetadataSink>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            service,
            catalog: None,
            sink,
            events,
        }
    }

    pub fn with_catalog(mut self, catalog: Arc<dyn CatalogClient>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: ProcessCoverInput,
        context: &ExtractionContext,
    ) -> Result<ProcessCoverOutput, ProcessCoverError> {
        self.execute_with_progress(input, context, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: ProcessCoverInput,
        context: &ExtractionContext,
        progress: &dyn StrandProgressNotifier,
    ) -> Result<ProcessCoverOutput, ProcessCoverError> {
        info!("Processing cover {} for book {}", input.source, input.book_id);

        let mut strand_results = self
            .run_direct_strands(&input.book_id, &input.source, context, progress)
            .await?;
        let mut reports: Vec<SourceReport> =
            strand_results.iter().filter_map(SourceReport::from_strand).collect();

        if let Some(overrides) = &input.agent {
            if self.service.strands().has_vision_strands() {
                let agent = AgentId::new(format!("{}-vision", input.book_id));
                let vision = self
                    .run_vision(&agent, overrides, &input.source, context, progress)
                    .await?;
                reports.extend(SourceReport::from_vision(&agent, &vision));
                strand_results.extend(vision.strand_results);
            } else {
                debug!("No vision strands registered; skipping vision analysis");
            }
        }

        if reports.iter().all(|r| r.metadata.is_empty()) {
            warn!("Nothing extracted from {}", input.source);
            return Err(ProcessCoverError::NothingExtracted(input.source.to_string()));
        }

        let mut merged = MergedFields::merge(&reports);

        if input.enrich
            && let Some(catalog) = &self.catalog
        {
            progress.on_enrichment_start();
            let resolver = CatalogEnrichmentResolver::new(
                Arc::clone(catalog),
                self.service.behavior().catalog_timeout,
            );
            let enrichment = resolver
                .enrich(&mut merged.metadata, context.cancellation.as_ref())
                .await;
            if context
                .cancellation
                .as_ref()
                .is_some_and(|t| t.is_cancelled())
            {
                return Err(ProcessCoverError::Cancelled);
            }

            if let Some(enrichment) = enrichment {
                merged.provenance.insert(
                    FieldSource::Catalog.to_string(),
                    ProvenanceEntry::new(FieldSource::Catalog, CATALOG_CONFIDENCE).with_details(
                        json!({
                            "query": enrichment.query,
                            "matched_by": enrichment.matched_by,
                            "fields": enrichment.fields,
                            "source_id": enrichment.record.source_id,
                        }),
                    ),
                );
                for field in &enrichment.fields {
                    merged.attribute(*field, CATALOG_CONFIDENCE, FieldSource::Catalog);
                }
            }
        }

        let scores: Vec<FieldScore> = merged
            .field_sources
            .iter()
            .map(|(field, source)| {
                FieldScore::new(*field, merged.confidence[field], *source)
            })
            .collect();
        let weighted = calculate_field_weighted_confidence(&scores);

        let advanced_metadata = AdvancedMetadata {
            extracted_at: Utc::now(),
            source: input.source.clone(),
            metadata: merged.metadata,
            confidence: merged.confidence,
            field_sources: merged.field_sources,
            provenance: merged.provenance,
            overall_confidence: weighted.overall,
        };
        info!(
            "Book {}: {} field(s), confidence {}%",
            input.book_id,
            advanced_metadata.metadata.populated_fields().len(),
            weighted.percent
        );

        self.sink
            .persist(&input.book_id, &input.user_id, &advanced_metadata)
            .await?;

        let event = MetadataExtractedEvent::new(&input.book_id, &input.user_id, &advanced_metadata);
        match serde_json::to_value(&event) {
            Ok(payload) => self
                .events
                .publish(DomainEvent::new(METADATA_EXTRACTED_EVENT, payload)),
            Err(e) => warn!("Failed to serialize {}: {}", METADATA_EXTRACTED_EVENT, e),
        }

        Ok(ProcessCoverOutput {
            advanced_metadata,
            event,
            strand_results,
        })
    }

    /// Barcode and OCR, whichever are registered, run concurrently
    async fn run_direct_strands(
        &self,
        book_id: &str,
        source: &ImageLocator,
        context: &ExtractionContext,
        progress: &dyn StrandProgressNotifier,
    ) -> Result<Vec<StrandResult>, ProcessCoverError> {
        let strands = self.service.strands();
        let timeout = self.service.behavior().strand_timeout;
        let options = AnalysisOptions {
            timeout: Some(timeout),
            cancellation: context.cancellation.clone(),
        };

        let order = [StrandId::Barcode, StrandId::Ocr];
        let registered: Vec<(usize, StrandId, Arc<dyn StrandAdapter>)> = order
            .iter()
            .enumerate()
            .filter_map(|(index, strand)| match strands.get(strand) {
                Some(adapter) => Some((index, strand.clone(), adapter)),
                None => {
                    debug!("Strand {} not registered", strand);
                    None
                }
            })
            .collect();
        if registered.is_empty() {
            return Ok(Vec::new());
        }

        let run = AgentId::new(format!("{}-direct", book_id));
        let ids: Vec<StrandId> = registered.iter().map(|(_, id, _)| id.clone()).collect();
        progress.on_execution_start(&run, &ids, true);

        let mut join_set = JoinSet::new();
        for (index, strand, adapter) in registered {
            let locator = source.clone();
            let options = options.clone();
            join_set.spawn(async move {
                (index, invoke_strand(strand, adapter, locator, options, timeout).await)
            });
        }

        let mut slots: Vec<Option<StrandResult>> = vec![None; order.len()];
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, outcome)) => {
                    if outcome.is_cancelled() {
                        join_set.abort_all();
                        progress.on_execution_complete(&run, false);
                        return Err(ProcessCoverError::Cancelled);
                    }
                    let result = outcome.into_result();
                    match &result.error {
                        Some(e) => warn!("Strand {} failed: {}", result.strand, e),
                        None => info!("Strand {} succeeded", result.strand),
                    }
                    progress.on_strand_complete(&result.strand, result.success);
                    slots[index] = Some(result);
                }
                Err(e) => {
                    warn!("Strand task join error: {}", e);
                }
            }
        }

        let results: Vec<StrandResult> = slots.into_iter().flatten().collect();
        progress.on_execution_complete(&run, results.iter().any(|r| r.success));
        Ok(results)
    }

    /// Vision strands through an ephemeral agent, always cleaned up
    async fn run_vision(
        &self,
        agent: &AgentId,
        overrides: &AgentConfigOverrides,
        source: &ImageLocator,
        context: &ExtractionContext,
        progress: &dyn StrandProgressNotifier,
    ) -> Result<ExecutionResult, ProcessCoverError> {
        let overrides = AgentConfigOverrides {
            enrich_with_catalog: Some(false),
            ..overrides.clone()
        };
        self.service.create_agent(agent.clone(), &overrides)?;

        let result = self
            .service
            .execute_analysis_with_progress(agent, source, context, progress)
            .await;

        if let Err(e) = self.service.cleanup_agent(agent) {
            warn!("Failed to clean up agent {}: {}", agent, e);
        }

        let result = result?;
        if !result.success {
            warn!(
                "Vision analysis failed: {}",
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
        Ok(result)
    }
}
