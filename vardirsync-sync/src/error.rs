//! Sync error types.

use std::path::PathBuf;

use thiserror::Error;
use vardirsync_nomad::NomadError;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors raised while exporting or importing a tree.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("could not walk to {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed getting info for {}: {source}", path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed reading file {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("path {} is not valid UTF-8", path.display())]
    NonUtf8Path { path: PathBuf },

    #[error("file {} is not valid UTF-8 and cannot be stored as a variable", path.display())]
    NonUtf8Contents { path: PathBuf },

    #[error("key {key} for file {second} collides with file {first}")]
    KeyCollision {
        key: String,
        first: String,
        second: String,
    },

    #[error("failed creating var {key} for file {path}: {source}")]
    CreateVariable {
        key: String,
        path: String,
        #[source]
        source: NomadError,
    },

    #[error("failed listing vars under root {root}: {source}")]
    ListVariables {
        root: String,
        #[source]
        source: NomadError,
    },

    #[error("failed reading var {key}: {source}")]
    ReadVariable {
        key: String,
        #[source]
        source: NomadError,
    },

    #[error("var {key} is missing field `{field}`")]
    MissingField { key: String, field: &'static str },

    #[error("failed parsing file mode {mode:?} for var {key}: not a 32-bit octal number")]
    InvalidMode { key: String, mode: String },

    #[error("var {key} has path {path:?} which escapes the target directory")]
    UnsafePath { key: String, path: String },

    #[error("failed creating parent dir for file {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed writing file {}: {source}", path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
