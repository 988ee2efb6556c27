//! The key-value service interface the sync engine runs against.

use crate::error::NomadResult;
use crate::types::{Variable, VariableMetadata, WriteMode};
use async_trait::async_trait;

/// A remote store of path-addressed variables.
///
/// Implementations must be usable behind `Arc<dyn VariableStore>`.
#[async_trait]
pub trait VariableStore: Send + Sync {
    /// Stores `variable` at `variable.path`.
    async fn create(&self, variable: &Variable, mode: WriteMode) -> NomadResult<()>;

    /// Lists every variable whose path starts with `prefix`.
    async fn list(&self, prefix: &str) -> NomadResult<Vec<VariableMetadata>>;

    /// Reads the full variable at `path`.
    async fn read(&self, path: &str) -> NomadResult<Variable>;
}
