//! Sync engine configuration.

use serde::{Deserialize, Serialize};
use vardirsync_nomad::WriteMode;

use crate::codec;
use crate::error::{SyncError, SyncResult};

/// Mode for directories created during import unless configured otherwise.
pub const DEFAULT_DIR_MODE: u32 = 0o777;

/// What to do when a single file or record fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop the run at the first failing item.
    #[default]
    Abort,
    /// Skip the failing item, record why, keep going.
    SkipAndReport,
}

/// Settings for one export or import run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Key prefix scoping every variable of the tree.
    pub root: String,

    /// Permission bits for directories created during import.
    pub new_dir_mode: u32,

    pub failure_policy: FailurePolicy,

    /// How exported records treat keys that already exist.
    pub write_mode: WriteMode,
}

impl SyncConfig {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            new_dir_mode: DEFAULT_DIR_MODE,
            failure_policy: FailurePolicy::default(),
            write_mode: WriteMode::default(),
        }
    }

    pub fn with_new_dir_mode(mut self, mode: u32) -> Self {
        self.new_dir_mode = mode;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_write_mode(mut self, mode: WriteMode) -> Self {
        self.write_mode = mode;
        self
    }

    pub fn validate(&self) -> SyncResult<()> {
        if self.root.trim().is_empty() {
            return Err(SyncError::Config("root must not be empty".to_string()));
        }
        if codec::normalize_root(&self.root).is_empty() {
            return Err(SyncError::Config(format!(
                "root {:?} does not name any key prefix",
                self.root
            )));
        }
        if self.new_dir_mode > 0o7777 {
            return Err(SyncError::Config(format!(
                "directory mode {:o} has bits outside 7777",
                self.new_dir_mode
            )));
        }
        Ok(())
    }
}
