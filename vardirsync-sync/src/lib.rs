//! Snapshot a directory tree into Nomad variables and restore it.
//!
//! One variable per regular file, holding the file's original path, its
//! permission bits and its contents. Keys are derived from paths by the
//! lossy `codec`; restores rely on the embedded path instead.

pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod perms;
pub mod record;
pub mod report;

pub use codec::encode_key;
pub use config::{FailurePolicy, SyncConfig};
pub use engine::SyncEngine;
pub use error::{SyncError, SyncResult};
pub use record::FileRecord;
pub use report::{Direction, SyncReport};
