//! Per-run summary of what was transferred and what was skipped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Export,
    Import,
}

/// A file that made it across.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferredEntry {
    pub key: String,
    pub path: String,
}

/// An item left behind under `FailurePolicy::SkipAndReport`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEntry {
    /// Source path on export, variable key on import.
    pub item: String,
    pub reason: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyncReport {
    pub direction: Direction,
    pub root: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub transferred: Vec<TransferredEntry>,
    pub skipped: Vec<SkippedEntry>,
}

impl SyncReport {
    pub fn new(direction: Direction, root: impl Into<String>) -> Self {
        Self {
            direction,
            root: root.into(),
            started_at: Utc::now(),
            finished_at: None,
            transferred: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn record_transfer(&mut self, key: impl Into<String>, path: impl Into<String>) {
        self.transferred.push(TransferredEntry {
            key: key.into(),
            path: path.into(),
        });
    }

    pub fn record_skip(&mut self, item: impl Into<String>, reason: impl ToString) {
        self.skipped.push(SkippedEntry {
            item: item.into(),
            reason: reason.to_string(),
        });
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// True when every item made it across.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
