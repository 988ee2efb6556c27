//! In-memory variable store.
//!
//! Behaves like the HTTP store as far as the sync engine can observe:
//! sorted prefix listing, check-and-set conflicts for `WriteMode::Create`,
//! and monotonically increasing indexes. Failures can be injected per path.

use crate::error::{NomadError, NomadResult};
use crate::store::VariableStore;
use crate::types::{Variable, VariableMetadata, WriteMode};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use tokio::sync::RwLock;

#[derive(Default)]
struct MemoryState {
    vars: BTreeMap<String, Variable>,
    index: u64,
    /// Every successful write, in call order.
    write_log: Vec<String>,
    failing_reads: HashSet<String>,
    failing_writes: HashSet<String>,
}

/// Variable store held entirely in process memory.
#[derive(Default)]
pub struct MemoryVariableStore {
    state: RwLock<MemoryState>,
}

impl MemoryVariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent read of `path` fail with an API error.
    pub async fn fail_reads_of(&self, path: impl Into<String>) {
        self.state.write().await.failing_reads.insert(path.into());
    }

    /// Makes every subsequent write to `path` fail with an API error.
    pub async fn fail_writes_to(&self, path: impl Into<String>) {
        self.state.write().await.failing_writes.insert(path.into());
    }

    /// Inserts a variable directly, bypassing write modes and failure hooks.
    pub async fn insert(&self, mut variable: Variable) {
        let mut state = self.state.write().await;
        state.index += 1;
        let index = state.index;
        variable.create_index = index;
        variable.modify_index = index;
        state.vars.insert(variable.path.clone(), variable);
    }

    pub async fn get(&self, path: &str) -> Option<Variable> {
        self.state.read().await.vars.get(path).cloned()
    }

    pub async fn paths(&self) -> Vec<String> {
        self.state.read().await.vars.keys().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.vars.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.vars.is_empty()
    }

    /// Paths of successful writes, in the order they happened.
    pub async fn write_log(&self) -> Vec<String> {
        self.state.read().await.write_log.clone()
    }
}

#[async_trait]
impl VariableStore for MemoryVariableStore {
    async fn create(&self, variable: &Variable, mode: WriteMode) -> NomadResult<()> {
        let mut state = self.state.write().await;

        if state.failing_writes.contains(&variable.path) {
            return Err(NomadError::Api(format!("write {}: injected failure", variable.path)));
        }

        let existing = state.vars.get(&variable.path).map(|v| v.create_index);
        if mode == WriteMode::Create && existing.is_some() {
            return Err(NomadError::Conflict(variable.path.clone()));
        }

        state.index += 1;
        let index = state.index;
        let mut stored = variable.clone();
        stored.create_index = existing.unwrap_or(index);
        stored.modify_index = index;
        state.write_log.push(stored.path.clone());
        state.vars.insert(stored.path.clone(), stored);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> NomadResult<Vec<VariableMetadata>> {
        let state = self.state.read().await;
        Ok(state
            .vars
            .values()
            .filter(|v| v.path.starts_with(prefix))
            .map(Variable::metadata)
            .collect())
    }

    async fn read(&self, path: &str) -> NomadResult<Variable> {
        let state = self.state.read().await;
        if state.failing_reads.contains(path) {
            return Err(NomadError::Api(format!("read {path}: injected failure")));
        }
        state
            .vars
            .get(path)
            .cloned()
            .ok_or_else(|| NomadError::NotFound(path.to_string()))
    }
}
