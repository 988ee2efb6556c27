//! Export and import of a directory tree.
//!
//! Both directions run strictly sequentially: one file or record is fully
//! handled before the next is touched. Per-item failures go through the
//! configured `FailurePolicy`; listing failures always end the run.

use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};
use vardirsync_nomad::VariableStore;
use walkdir::{DirEntry, WalkDir};

use crate::codec;
use crate::config::{FailurePolicy, SyncConfig};
use crate::error::{SyncError, SyncResult};
use crate::perms;
use crate::record::FileRecord;
use crate::report::{Direction, SyncReport};

/// Moves trees between the local filesystem and a variable store.
pub struct SyncEngine {
    store: Arc<dyn VariableStore>,
    config: SyncConfig,
}

impl SyncEngine {
    /// Validates `config` and stores its root in normalized form, so export
    /// keys and the import listing prefix always agree.
    pub fn new(store: Arc<dyn VariableStore>, mut config: SyncConfig) -> SyncResult<Self> {
        config.validate()?;
        config.root = codec::normalize_root(&config.root);
        Ok(Self { store, config })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Writes one variable per regular file under `source_dir`.
    ///
    /// Files are visited depth-first in file-name order. Keys come from
    /// the path relative to `source_dir`; two files mapping to the same key
    /// in one run are a `KeyCollision` and the first one wins.
    pub async fn export(&self, source_dir: &Path) -> SyncResult<SyncReport> {
        info!(
            "exporting {} under root {}",
            source_dir.display(),
            self.config.root
        );

        let mut report = SyncReport::new(Direction::Export, &self.config.root);
        // key -> relative path that claimed it
        let mut claimed: HashMap<String, String> = HashMap::new();

        for entry in WalkDir::new(source_dir).follow_links(false).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(source) => {
                    let path = source
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| source_dir.to_path_buf());
                    let item = path.display().to_string();
                    self.handle_failure(&mut report, item, SyncError::Walk { path, source })?;
                    continue;
                }
            };

            match self.export_entry(&entry, source_dir, &mut claimed).await {
                Ok(Some((key, path))) => report.record_transfer(key, path),
                Ok(None) => {}
                Err(e) => {
                    let item = entry.path().display().to_string();
                    self.handle_failure(&mut report, item, e)?;
                }
            }
        }

        report.finish();
        info!(
            "exported {} files under {} ({} skipped)",
            report.transferred.len(),
            self.config.root,
            report.skipped.len()
        );
        Ok(report)
    }

    /// Exports a single walk entry. Returns the `(key, path)` written, or
    /// `None` for entries that are not exported.
    async fn export_entry(
        &self,
        entry: &DirEntry,
        source_dir: &Path,
        claimed: &mut HashMap<String, String>,
    ) -> SyncResult<Option<(String, String)>> {
        let path = entry.path();
        let file_type = entry.file_type();

        if file_type.is_dir() {
            return Ok(None);
        }

        // Symlinks are exported as the file they point at.
        let metadata = (if file_type.is_symlink() {
            tokio::fs::metadata(path).await
        } else {
            entry.metadata().map_err(io::Error::from)
        })
        .map_err(|source| SyncError::Stat {
            path: path.to_path_buf(),
            source,
        })?;

        if !metadata.is_file() {
            debug!("skipping non-regular entry {}", path.display());
            return Ok(None);
        }

        let relative = relative_path(source_dir, path)?;
        let key = codec::encode_key(&self.config.root, &relative);

        if let Some(first) = claimed.get(&key) {
            return Err(SyncError::KeyCollision {
                key,
                first: first.clone(),
                second: relative,
            });
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| SyncError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;
        let record = FileRecord::from_file(relative.clone(), perms::mode_of(&metadata), bytes, path)?;

        self.store
            .create(&record.to_variable(&key), self.config.write_mode)
            .await
            .map_err(|source| SyncError::CreateVariable {
                key: key.clone(),
                path: relative.clone(),
                source,
            })?;

        debug!("exported {relative} as {key} (mode {})", record.mode_string());
        claimed.insert(key.clone(), relative.clone());
        Ok(Some((key, relative)))
    }

    /// Recreates every file stored under the root inside `target_dir`.
    ///
    /// Destinations come from each record's `path` item, never from its key.
    pub async fn import(&self, target_dir: &Path) -> SyncResult<SyncReport> {
        let root = &self.config.root;
        let listed = self
            .store
            .list(root)
            .await
            .map_err(|source| SyncError::ListVariables {
                root: root.clone(),
                source,
            })?;

        info!(
            "importing {} variables under {root} into {}",
            listed.len(),
            target_dir.display()
        );

        let mut report = SyncReport::new(Direction::Import, root);
        for meta in listed {
            info!("reading variable {}", meta.path);
            match self.import_one(&meta.path, target_dir).await {
                Ok(path) => report.record_transfer(meta.path, path),
                Err(e) => self.handle_failure(&mut report, meta.path, e)?,
            }
        }

        report.finish();
        info!(
            "imported {} files from {root} ({} skipped)",
            report.transferred.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    async fn import_one(&self, key: &str, target_dir: &Path) -> SyncResult<String> {
        let variable = self
            .store
            .read(key)
            .await
            .map_err(|source| SyncError::ReadVariable {
                key: key.to_string(),
                source,
            })?;

        let record = FileRecord::from_variable(&variable)?;
        let dest = destination(target_dir, key, &record.original_path)?;

        if let Some(parent) = dest.parent() {
            create_missing_dirs(parent, self.config.new_dir_mode)
                .await
                .map_err(|source| SyncError::CreateDir {
                    path: dest.clone(),
                    source,
                })?;
        }

        write_file(&dest, record.contents.as_bytes(), record.mode)
            .await
            .map_err(|source| SyncError::WriteFile {
                path: dest.clone(),
                source,
            })?;

        debug!("wrote {} (mode {})", dest.display(), record.mode_string());
        Ok(record.original_path)
    }

    fn handle_failure(
        &self,
        report: &mut SyncReport,
        item: String,
        err: SyncError,
    ) -> SyncResult<()> {
        match self.config.failure_policy {
            FailurePolicy::Abort => Err(err),
            FailurePolicy::SkipAndReport => {
                warn!("skipping {item}: {err}");
                report.record_skip(item, err);
                Ok(())
            }
        }
    }
}

/// `path` relative to `base`, `/`-separated.
fn relative_path(base: &Path, path: &Path) -> SyncResult<String> {
    let rel = match path.strip_prefix(base) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel,
        // The walk root itself is a file.
        _ => Path::new(path.file_name().unwrap_or(path.as_os_str())),
    };

    let mut parts = Vec::new();
    for component in rel.components() {
        if let Component::Normal(part) = component {
            let part = part.to_str().ok_or_else(|| SyncError::NonUtf8Path {
                path: path.to_path_buf(),
            })?;
            parts.push(part);
        }
    }
    Ok(parts.join("/"))
}

/// Resolves a record's path inside `target_dir`. Leading separators and `.`
/// segments are ignored; `..` may not climb above `target_dir`.
fn destination(target_dir: &Path, key: &str, original: &str) -> SyncResult<PathBuf> {
    let unsafe_path = || SyncError::UnsafePath {
        key: key.to_string(),
        path: original.to_string(),
    };

    let mut rel = PathBuf::new();
    for component in Path::new(original).components() {
        match component {
            Component::Normal(part) => rel.push(part),
            Component::ParentDir => {
                if !rel.pop() {
                    return Err(unsafe_path());
                }
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    if rel.as_os_str().is_empty() {
        return Err(unsafe_path());
    }
    Ok(target_dir.join(rel))
}

/// Creates `dir` and every missing ancestor, each with exactly `mode`.
async fn create_missing_dirs(dir: &Path, mode: u32) -> io::Result<()> {
    let mut missing = Vec::new();
    let mut current = Some(dir);
    while let Some(d) = current {
        if d.as_os_str().is_empty() || tokio::fs::try_exists(d).await? {
            break;
        }
        missing.push(d);
        current = d.parent();
    }

    for d in missing.into_iter().rev() {
        match tokio::fs::create_dir(d).await {
            Ok(()) => {
                perms::set_mode(d, mode).await?;
                debug!("created directory {} (mode {mode:o})", d.display());
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Replaces `dest` with `contents` carrying exactly `mode`.
///
/// Goes through a sibling temp file and a rename, so an existing read-only
/// file at `dest` is replaced rather than failing the write.
async fn write_file(dest: &Path, contents: &[u8], mode: u32) -> io::Result<()> {
    let file_name = dest
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "destination has no file name"))?;
    let mut temp_name = std::ffi::OsString::from(".");
    temp_name.push(file_name);
    temp_name.push(format!(".vardirsync-tmp.{}", std::process::id()));
    let temp_path = dest.with_file_name(temp_name);

    let result = async {
        tokio::fs::write(&temp_path, contents).await?;
        perms::set_mode(&temp_path, mode).await?;
        tokio::fs::rename(&temp_path, dest).await
    }
    .await;

    if result.is_err() {
        if let Err(e) = tokio::fs::remove_file(&temp_path).await {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("failed to clean up temp file {}: {e}", temp_path.display());
            }
        }
    }
    result
}
