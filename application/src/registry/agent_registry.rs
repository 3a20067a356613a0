//! Agent registry
//!
//! Maps agent ids to live agents. Uses `std::sync::RwLock` so every
//! operation is synchronous; the lock is never held across an `.await`.

use coverscan_domain::{Agent, AgentConfig, AgentId, AgentState, DomainError};
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct AgentRegistry {
    agents: RwLock<HashMap<AgentId, Agent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new agent; fails if the id is taken
    pub fn insert(&self, agent: Agent) -> Result<(), DomainError> {
        let mut agents = self.agents.write().unwrap_or_else(|e| e.into_inner());
        if agents.contains_key(&agent.id) {
            return Err(DomainError::AgentAlreadyExists(agent.id.to_string()));
        }
        agents.insert(agent.id.clone(), agent);
        Ok(())
    }

    pub fn get(&self, id: &AgentId) -> Option<Agent> {
        let agents = self.agents.read().unwrap_or_else(|e| e.into_inner());
        agents.get(id).cloned()
    }

    pub fn state(&self, id: &AgentId) -> Option<AgentState> {
        let agents = self.agents.read().unwrap_or_else(|e| e.into_inner());
        agents.get(id).map(|agent| agent.state.clone())
    }

    /// Move the agent to `Running` and hand back its configuration.
    ///
    /// The check and the transition happen under one write lock, so two
    /// concurrent callers cannot both start a run.
    pub fn begin_run(&self, id: &AgentId) -> Result<AgentConfig, DomainError> {
        let mut agents = self.agents.write().unwrap_or_else(|e| e.into_inner());
        let agent = agents
            .get_mut(id)
            .ok_or_else(|| DomainError::AgentNotFound(id.to_string()))?;
        agent.begin_run()?;
        Ok(agent.config.clone())
    }

    /// Apply `f` to the agent, if it still exists
    pub fn update<R>(&self, id: &AgentId, f: impl FnOnce(&mut Agent) -> R) -> Option<R> {
        let mut agents = self.agents.write().unwrap_or_else(|e| e.into_inner());
        agents.get_mut(id).map(f)
    }

    pub fn remove(&self, id: &AgentId) -> Option<Agent> {
        let mut agents = self.agents.write().unwrap_or_else(|e| e.into_inner());
        agents.remove(id)
    }

    pub fn len(&self) -> usize {
        self.agents.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coverscan_domain::AgentStatus;

    #[test]
    fn test_insert_rejects_duplicates() {
        let registry = AgentRegistry::new();
        registry
            .insert(Agent::new("a", AgentConfig::default()))
            .unwrap();
        assert_eq!(
            registry.insert(Agent::new("a", AgentConfig::default())),
            Err(DomainError::AgentAlreadyExists("a".to_string()))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_begin_run_is_exclusive() {
        let registry = AgentRegistry::new();
        registry
            .insert(Agent::new("a", AgentConfig::default()))
            .unwrap();
        let id = AgentId::new("a");

        assert!(registry.begin_run(&id).is_ok());
        assert_eq!(
            registry.state(&id).unwrap().status,
            AgentStatus::Running
        );
        assert!(matches!(
            registry.begin_run(&id),
            Err(DomainError::AgentBusy(_))
        ));
    }

    #[test]
    fn test_unknown_agent() {
        let registry = AgentRegistry::new();
        let err = registry.begin_run(&AgentId::new("ghost")).unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert!(registry.state(&AgentId::new("ghost")).is_none());
    }

    #[test]
    fn test_remove() {
        let registry = AgentRegistry::new();
        registry
            .insert(Agent::new("a", AgentConfig::default()))
            .unwrap();
        assert!(registry.remove(&AgentId::new("a")).is_some());
        assert!(registry.is_empty());
        assert!(registry.remove(&AgentId::new("a")).is_none());
    }
}
