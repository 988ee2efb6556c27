//! File record <-> variable items.
//!
//! A record is exactly three items: `path`, `mode` and `contents`. There is
//! no version field; changing the layout breaks existing snapshots.

use std::collections::BTreeMap;
use std::path::Path;

use vardirsync_nomad::Variable;

use crate::error::{SyncError, SyncResult};
use crate::perms::PERMISSION_MASK;

pub const PATH_FIELD: &str = "path";
pub const MODE_FIELD: &str = "mode";
pub const CONTENTS_FIELD: &str = "contents";

/// One regular file as stored in the variable store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileRecord {
    /// Path as seen during export, relative to the exported directory.
    pub original_path: String,
    /// Permission bits.
    pub mode: u32,
    pub contents: String,
}

impl FileRecord {
    /// Builds a record from raw file bytes.
    ///
    /// Items are strings, so bytes that are not UTF-8 cannot be stored
    /// without loss and are rejected.
    pub fn from_file(
        original_path: impl Into<String>,
        mode: u32,
        bytes: Vec<u8>,
        source: &Path,
    ) -> SyncResult<Self> {
        let contents = String::from_utf8(bytes).map_err(|_| SyncError::NonUtf8Contents {
            path: source.to_path_buf(),
        })?;

        Ok(Self {
            original_path: original_path.into(),
            mode: mode & PERMISSION_MASK,
            contents,
        })
    }

    /// Mode as written to the store: bare octal, e.g. `"640"`.
    pub fn mode_string(&self) -> String {
        format!("{:o}", self.mode)
    }

    pub fn to_items(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (PATH_FIELD.to_string(), self.original_path.clone()),
            (MODE_FIELD.to_string(), self.mode_string()),
            (CONTENTS_FIELD.to_string(), self.contents.clone()),
        ])
    }

    pub fn to_variable(&self, key: impl Into<String>) -> Variable {
        Variable::new(key, self.to_items())
    }

    /// Decodes a record from a variable read back from the store.
    pub fn from_variable(variable: &Variable) -> SyncResult<Self> {
        let field = |name: &'static str| {
            variable
                .items
                .get(name)
                .ok_or_else(|| SyncError::MissingField {
                    key: variable.path.clone(),
                    field: name,
                })
        };

        let original_path = field(PATH_FIELD)?.clone();
        let mode_str = field(MODE_FIELD)?;
        let contents = field(CONTENTS_FIELD)?.clone();

        let mode = parse_octal_mode(mode_str).ok_or_else(|| SyncError::InvalidMode {
            key: variable.path.clone(),
            mode: mode_str.clone(),
        })?;

        Ok(Self {
            original_path,
            mode,
            contents,
        })
    }
}

/// Parses a stored mode: octal digits only, no sign or prefix, and the
/// value must fit in 32 bits.
pub fn parse_octal_mode(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| matches!(b, b'0'..=b'7')) {
        return None;
    }
    u32::from_str_radix(s, 8).ok()
}
