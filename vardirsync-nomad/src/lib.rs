//! Nomad variable store access for nomad-var-dirsync.
//!
//! Provides:
//! - Wire types for variables and their list metadata
//! - The `VariableStore` trait the sync engine is written against
//! - `NomadApiClient`, an HTTP implementation over the Nomad variables API
//! - `MemoryVariableStore`, an in-process implementation for tests and dry runs

pub mod api_client;
pub mod config;
pub mod error;
pub mod memory;
pub mod store;
pub mod types;

pub use api_client::NomadApiClient;
pub use config::NomadConfig;
pub use error::{NomadError, NomadResult};
pub use memory::MemoryVariableStore;
pub use store::VariableStore;
pub use types::*;
