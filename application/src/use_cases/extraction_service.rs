//! Extraction orchestrator
//!
//! Owns the agent registry and drives strand execution:
//!
//! 1. Resolve the agent's strategy to an ordered strand list
//! 2. Run the strands, sequentially with fallback or all in parallel
//! 3. Merge the successful outputs into one consensus record
//! 4. Optionally overwrite fields from the bibliographic catalog
//! 5. Score the result and settle the agent's status

use crate::config::BehaviorConfig;
use crate::ports::catalog_client::CatalogClient;
use crate::ports::progress::{NoProgress, StrandProgressNotifier};
use crate::ports::strand_adapter::{AnalysisOptions, StrandAdapter, StrandError};
use crate::registry::{AgentRegistry, StrandConfiguration, StrandRegistry};
use crate::use_cases::enrich_metadata::CatalogEnrichmentResolver;
use coverscan_domain::{
    Agent, AgentConfig, AgentConfigOverrides, AgentId, AgentState, CATALOG_CONFIDENCE,
    DomainError, ExecutionResult, ImageLocator, MetadataField, StrandAnalysis, StrandId,
    StrandResult, Workflow, calculate_aggregate_confidence, create_consensus_metadata,
    extraction::result::CATALOG_SOURCE,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Per-call context for `execute_analysis`
#[derive(Debug, Clone, Default)]
pub struct ExtractionContext {
    pub cancellation: Option<CancellationToken>,
}

impl ExtractionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

/// Snapshot returned by `get_service_stats`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceStats {
    pub total_agents: usize,
    pub available_strands: Vec<StrandId>,
    pub strand_configurations: Vec<StrandConfiguration>,
}

/// Settled strand call, before it is turned into a [`StrandResult`]
pub(crate) struct StrandOutcome {
    pub(crate) strand: StrandId,
    pub(crate) outcome: Result<StrandAnalysis, StrandError>,
    pub(crate) elapsed_ms: u64,
}

impl StrandOutcome {
    pub(crate) fn is_cancelled(&self) -> bool {
        matches!(&self.outcome, Err(e) if e.is_cancelled())
    }

    pub(crate) fn into_result(self) -> StrandResult {
        match self.outcome {
            Ok(mut analysis) => {
                if analysis.processing_time_ms == 0 {
                    analysis.processing_time_ms = self.elapsed_ms;
                }
                StrandResult::success(self.strand, analysis)
            }
            Err(e) => StrandResult::failure(self.strand, e.to_string())
                .with_processing_time_ms(self.elapsed_ms),
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Multi-strand extraction service
pub struct ExtractionService {
    strands: StrandRegistry,
    agents: AgentRegistry,
    catalog: Option<Arc<dyn CatalogClient>>,
    behavior: BehaviorConfig,
}

impl ExtractionService {
    pub fn new(strands: StrandRegistry) -> Self {
        Self {
            strands,
            agents: AgentRegistry::new(),
            catalog: None,
            behavior: BehaviorConfig::default(),
        }
    }

    pub fn with_catalog(mut self, catalog: Arc<dyn CatalogClient>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_behavior(mut self, behavior: BehaviorConfig) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn strands(&self) -> &StrandRegistry {
        &self.strands
    }

    pub fn behavior(&self) -> &BehaviorConfig {
        &self.behavior
    }

    /// Create an agent, layering `overrides` over the documented defaults
    pub fn create_agent(
        &self,
        id: impl Into<AgentId>,
        overrides: &AgentConfigOverrides,
    ) -> Result<Agent, DomainError> {
        let config = overrides.resolve();
        config.validate()?;

        let agent = Agent::new(id, config);
        self.agents.insert(agent.clone())?;
        debug!("Created agent {} ({})", agent.id, agent.config.strategy);
        Ok(agent)
    }

    pub fn get_agent_status(&self, id: &AgentId) -> Option<AgentState> {
        self.agents.state(id)
    }

    /// Release an agent. Its state is gone afterwards.
    pub fn cleanup_agent(&self, id: &AgentId) -> Result<(), DomainError> {
        self.agents
            .remove(id)
            .map(|_| debug!("Cleaned up agent {}", id))
            .ok_or_else(|| DomainError::AgentNotFound(id.to_string()))
    }

    pub fn get_service_stats(&self) -> ServiceStats {
        ServiceStats {
            total_agents: self.agents.len(),
            available_strands: self.strands.ids(),
            strand_configurations: self.strands.configurations(),
        }
    }

    /// Run the agent's strands against the image at `locator`
    pub async fn execute_analysis(
        &self,
        agent_id: &AgentId,
        locator: &ImageLocator,
        context: &ExtractionContext,
    ) -> Result<ExecutionResult, DomainError> {
        self.execute_analysis_with_progress(agent_id, locator, context, &NoProgress)
            .await
    }

    /// Run the agent's strands with progress callbacks
    pub async fn execute_analysis_with_progress(
        &self,
        agent_id: &AgentId,
        locator: &ImageLocator,
        context: &ExtractionContext,
        progress: &dyn StrandProgressNotifier,
    ) -> Result<ExecutionResult, DomainError> {
        let started = Instant::now();

        let agent = self
            .agents
            .get(agent_id)
            .ok_or_else(|| DomainError::AgentNotFound(agent_id.to_string()))?;
        let strands = self.resolve_strands(&agent.config)?;
        let config = self.agents.begin_run(agent_id)?;

        let order: Vec<StrandId> = strands.iter().map(|(id, _)| id.clone()).collect();
        info!(
            "Agent {}: running {} strand(s) {} [{}]",
            agent_id,
            order.len(),
            if config.parallel_execution {
                "in parallel"
            } else {
                "sequentially"
            },
            order
                .iter()
                .map(StrandId::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
        progress.on_execution_start(agent_id, &order, config.parallel_execution);

        let options = AnalysisOptions {
            timeout: Some(self.behavior.strand_timeout),
            cancellation: context.cancellation.clone(),
        };

        let results = if config.parallel_execution {
            self.run_parallel(agent_id, strands, locator, &options, progress)
                .await
        } else {
            self.run_sequential(agent_id, &config, strands, locator, &options, progress)
                .await
        };
        let results = match results {
            Ok(results) => results,
            Err(e) => return Err(self.fail_run(agent_id, e, progress)),
        };

        let workflow = self
            .agents
            .state(agent_id)
            .map(|state| Workflow::from(&state))
            .unwrap_or_default();

        if !results.iter().any(|r| r.success) {
            warn!("Agent {}: all strands failed", agent_id);
            self.settle(agent_id, false, progress);
            return Ok(ExecutionResult::all_failed(
                workflow,
                results,
                elapsed_ms(started),
            ));
        }

        let consensus = create_consensus_metadata(&results);
        let mut metadata = consensus.metadata;
        let mut field_confidence = consensus.field_confidence;
        let mut field_sources: BTreeMap<MetadataField, Vec<String>> = consensus
            .field_sources
            .into_iter()
            .map(|(field, ids)| (field, ids.iter().map(StrandId::to_string).collect()))
            .collect();

        let mut enrichment = None;
        if config.enrich_with_catalog
            && let Some(catalog) = &self.catalog
            && CatalogEnrichmentResolver::can_enrich(&metadata)
        {
            progress.on_enrichment_start();
            let resolver =
                CatalogEnrichmentResolver::new(Arc::clone(catalog), self.behavior.catalog_timeout);
            enrichment = resolver
                .enrich(&mut metadata, context.cancellation.as_ref())
                .await;
            if context.is_cancelled() {
                return Err(self.fail_run(agent_id, DomainError::Cancelled, progress));
            }
        }
        if let Some(enrichment) = &enrichment {
            for field in &enrichment.fields {
                field_confidence.insert(*field, CATALOG_CONFIDENCE);
                field_sources.insert(*field, vec![CATALOG_SOURCE.to_string()]);
            }
        }

        let confidence = calculate_aggregate_confidence(&results);
        let meets_threshold = confidence.overall >= config.confidence_threshold;
        let cost = results
            .iter()
            .filter_map(|r| r.cost)
            .reduce(|total, cost| total + cost);

        info!(
            "Agent {}: {} strand(s) succeeded, confidence {:.2}{}",
            agent_id,
            workflow.completed_strands.len(),
            confidence.overall,
            if meets_threshold {
                ""
            } else {
                " (below threshold)"
            }
        );
        self.settle(agent_id, true, progress);

        Ok(ExecutionResult {
            success: true,
            metadata: Some(metadata),
            field_confidence,
            field_sources,
            confidence: Some(confidence),
            meets_threshold,
            workflow,
            strand_results: results,
            enrichment,
            cost,
            processing_time_ms: elapsed_ms(started),
            error: None,
        })
    }

    /// Strategy order, truncated to the attempt budget, looked up in the registry
    fn resolve_strands(
        &self,
        config: &AgentConfig,
    ) -> Result<Vec<(StrandId, Arc<dyn StrandAdapter>)>, DomainError> {
        let mut order = config.strategy.strand_order();
        order.truncate(config.max_strand_attempts);
        self.strands.resolve(&order)
    }

    /// Sequential mode: first success wins when fallback is enabled,
    /// otherwise every strand is attempted.
    async fn run_sequential(
        &self,
        agent_id: &AgentId,
        config: &AgentConfig,
        strands: Vec<(StrandId, Arc<dyn StrandAdapter>)>,
        locator: &ImageLocator,
        options: &AnalysisOptions,
        progress: &dyn StrandProgressNotifier,
    ) -> Result<Vec<StrandResult>, DomainError> {
        let mut results = Vec::new();

        for (strand, adapter) in strands {
            if options.is_cancelled() {
                return Err(DomainError::Cancelled);
            }

            let outcome = invoke_strand(
                strand,
                adapter,
                locator.clone(),
                options.clone(),
                self.behavior.strand_timeout,
            )
            .await;
            if outcome.is_cancelled() {
                return Err(DomainError::Cancelled);
            }

            let result = outcome.into_result();
            self.record(agent_id, &result, progress);
            let success = result.success;
            results.push(result);

            if success && config.fallback_enabled {
                debug!("Agent {}: stopping at first successful strand", agent_id);
                break;
            }
        }

        Ok(results)
    }

    /// Parallel mode: fan out every strand, fan in after all settle.
    ///
    /// Results are returned in strand order, not completion order.
    async fn run_parallel(
        &self,
        agent_id: &AgentId,
        strands: Vec<(StrandId, Arc<dyn StrandAdapter>)>,
        locator: &ImageLocator,
        options: &AnalysisOptions,
        progress: &dyn StrandProgressNotifier,
    ) -> Result<Vec<StrandResult>, DomainError> {
        let order: Vec<StrandId> = strands.iter().map(|(id, _)| id.clone()).collect();
        let mut join_set = JoinSet::new();

        for (index, (strand, adapter)) in strands.into_iter().enumerate() {
            let locator = locator.clone();
            let options = options.clone();
            let timeout = self.behavior.strand_timeout;

            join_set.spawn(async move {
                let outcome = invoke_strand(strand, adapter, locator, options, timeout).await;
                (index, outcome)
            });
        }

        let mut slots: Vec<Option<StrandResult>> = vec![None; order.len()];

        loop {
            let joined = match &options.cancellation {
                Some(token) => tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        join_set.abort_all();
                        return Err(DomainError::Cancelled);
                    }
                    joined = join_set.join_next() => joined,
                },
                None => join_set.join_next().await,
            };
            let Some(joined) = joined else {
                break;
            };

            match joined {
                Ok((index, outcome)) => {
                    if outcome.is_cancelled() {
                        join_set.abort_all();
                        return Err(DomainError::Cancelled);
                    }
                    let result = outcome.into_result();
                    self.record(agent_id, &result, progress);
                    slots[index] = Some(result);
                }
                Err(e) => {
                    warn!("Strand task join error: {}", e);
                }
            }
        }

        Ok(order
            .into_iter()
            .zip(slots)
            .map(|(strand, slot)| {
                slot.unwrap_or_else(|| {
                    let result = StrandResult::failure(strand, "strand task aborted");
                    self.record(agent_id, &result, progress);
                    result
                })
            })
            .collect())
    }

    fn record(
        &self,
        agent_id: &AgentId,
        result: &StrandResult,
        progress: &dyn StrandProgressNotifier,
    ) {
        if result.success {
            info!(
                "Strand {} succeeded (confidence {:.2})",
                result.strand,
                result.overall_confidence()
            );
        } else {
            warn!(
                "Strand {} failed: {}",
                result.strand,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }

        self.agents.update(agent_id, |agent| {
            if result.success {
                agent.record_success(result.strand.clone());
            } else {
                agent.record_failure(
                    result.strand.clone(),
                    result.error.clone().unwrap_or_default(),
                );
            }
        });
        progress.on_strand_complete(&result.strand, result.success);
    }

    fn settle(&self, agent_id: &AgentId, success: bool, progress: &dyn StrandProgressNotifier) {
        self.agents.update(agent_id, |agent| agent.finish(success));
        progress.on_execution_complete(agent_id, success);
    }

    fn fail_run(
        &self,
        agent_id: &AgentId,
        error: DomainError,
        progress: &dyn StrandProgressNotifier,
    ) -> DomainError {
        if error.is_cancelled() {
            info!("Agent {}: analysis cancelled", agent_id);
        }
        self.settle(agent_id, false, progress);
        error
    }
}

/// One bounded, cancellable adapter call
pub(crate) async fn invoke_strand(
    strand: StrandId,
    adapter: Arc<dyn StrandAdapter>,
    locator: ImageLocator,
    options: AnalysisOptions,
    timeout: Duration,
) -> StrandOutcome {
    let started = Instant::now();
    debug!("Invoking strand {} ({})", strand, adapter.name());

    let call = tokio::time::timeout(timeout, adapter.analyze(&locator, &options));
    let outcome = match &options.cancellation {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => Err(StrandError::Cancelled),
            settled = call => settled.unwrap_or(Err(StrandError::Timeout(timeout))),
        },
        None => call.await.unwrap_or(Err(StrandError::Timeout(timeout))),
    };

    StrandOutcome {
        strand,
        outcome,
        elapsed_ms: elapsed_ms(started),
    }
}
