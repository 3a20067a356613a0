//! Strand registry
//!
//! Maps strand ids to their adapters. Built once at startup and read-only
//! afterwards, so it needs no locking.

use crate::ports::strand_adapter::StrandAdapter;
use coverscan_domain::{DomainError, StrandId};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Static description of a registered strand
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrandConfiguration {
    pub strand: StrandId,
    pub name: String,
    pub cost_per_call: f64,
}

#[derive(Default, Clone)]
pub struct StrandRegistry {
    adapters: HashMap<StrandId, Arc<dyn StrandAdapter>>,
}

impl StrandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter, replacing any previous one for `id`
    pub fn register(&mut self, id: StrandId, adapter: Arc<dyn StrandAdapter>) {
        self.adapters.insert(id, adapter);
    }

    pub fn with(mut self, id: StrandId, adapter: Arc<dyn StrandAdapter>) -> Self {
        self.register(id, adapter);
        self
    }

    pub fn get(&self, id: &StrandId) -> Option<Arc<dyn StrandAdapter>> {
        self.adapters.get(id).cloned()
    }

    /// Registered ids, sorted
    pub fn ids(&self) -> Vec<StrandId> {
        let mut ids: Vec<StrandId> = self.adapters.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn has_vision_strands(&self) -> bool {
        self.adapters.keys().any(StrandId::is_vision)
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Look up every strand in `order`, failing on the first unregistered one
    pub fn resolve(
        &self,
        order: &[StrandId],
    ) -> Result<Vec<(StrandId, Arc<dyn StrandAdapter>)>, DomainError> {
        order
            .iter()
            .map(|id| {
                self.get(id)
                    .map(|adapter| (id.clone(), adapter))
                    .ok_or_else(|| DomainError::UnknownStrand(id.to_string()))
            })
            .collect()
    }

    pub fn configurations(&self) -> Vec<StrandConfiguration> {
        self.ids()
            .into_iter()
            .filter_map(|id| {
                self.adapters.get(&id).map(|adapter| StrandConfiguration {
                    name: adapter.name().to_string(),
                    cost_per_call: adapter.cost_per_call(),
                    strand: id,
                })
            })
            .collect()
    }
}

impl std::fmt::Debug for StrandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrandRegistry")
            .field("strands", &self.ids())
            .finish()
    }
}
