//! Promotes an extracted version directory to the active `default` slot.
//!
//! The slot is replaced by a copy-then-rename swap, so `default/` never holds a
//! mix of two versions. Between the two renames of a swap `default/` is briefly
//! absent; a reader in that window sees no active SDK, and an activation that
//! finds a swap interrupted there restores the previous slot first. The active
//! version is recorded in `.active.yaml` beside the slot.

use crate::core::path::{validate_segment, ACTIVE_DIR_NAME};
use crate::core::{SdkLayout, SwitchyError, SwitchyResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const STAGING_PREFIX: &str = ".default.staging-";
const OLD_PREFIX: &str = ".default.old-";

/// Contents of `.active.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveRecord {
    pub version: String,
    pub activated_at: DateTime<Utc>,
}

pub struct VersionActivator {
    layout: SdkLayout,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl VersionActivator {
    pub fn new(layout: SdkLayout) -> Self {
        Self {
            layout,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn layout(&self) -> &SdkLayout {
        &self.layout
    }

    /// Make `version` the active SDK for `sdk_type`.
    ///
    /// The version must already be extracted; this never downloads. Activating
    /// the version that is already active is a no-op.
    pub fn activate(&self, sdk_type: &str, version: &str) -> SwitchyResult<()> {
        self.activate_cancellable(sdk_type, version, &CancellationToken::new())
    }

    pub fn activate_cancellable(
        &self,
        sdk_type: &str,
        version: &str,
        cancel: &CancellationToken,
    ) -> SwitchyResult<()> {
        validate_segment("SDK type", sdk_type)?;
        validate_segment("version", version)?;

        let version_dir = self.layout.version_dir(sdk_type, version);
        if !version_dir.is_dir() {
            return Err(SwitchyError::fs(
                &version_dir,
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("{} {} is not installed", sdk_type, version),
                ),
            ));
        }

        let type_lock = self.type_lock(sdk_type);
        let result = {
            let _guard = lock_ignoring_poison(&type_lock);
            self.activate_locked(sdk_type, version, &version_dir, cancel)
        };
        drop(type_lock);
        self.release_type_lock(sdk_type);
        result
    }

    fn activate_locked(
        &self,
        sdk_type: &str,
        version: &str,
        version_dir: &Path,
        cancel: &CancellationToken,
    ) -> SwitchyResult<()> {
        let type_dir = self.layout.type_dir(sdk_type);
        let active_dir = self.layout.active_dir(sdk_type);
        let record_path = self.layout.active_record(sdk_type);

        recover_interrupted_swap(&type_dir, &active_dir)?;
        remove_prefixed(&type_dir, STAGING_PREFIX)?;

        if active_dir.is_dir() {
            if let Some(record) = read_record(&record_path)? {
                if record.version == version {
                    info!(sdk_type, version, "Already active");
                    return Ok(());
                }
            }
        }

        let staging = StagingDir::new(
            type_dir.join(format!("{}{}", STAGING_PREFIX, uuid::Uuid::new_v4())),
        );
        copy_tree(version_dir, staging.path(), cancel)?;

        if cancel.is_cancelled() {
            return Err(SwitchyError::Cancelled);
        }

        // A stale record must never vouch for a slot that is being replaced.
        let previous = read_record(&record_path)?;
        remove_if_exists(&record_path)?;
        if let Err(e) = swap_into_place(staging, &active_dir, &type_dir) {
            if let (Some(previous), true) = (previous, active_dir.is_dir()) {
                write_record(&record_path, &previous)?;
            }
            return Err(e);
        }

        write_record(
            &record_path,
            &ActiveRecord {
                version: version.to_string(),
                activated_at: Utc::now(),
            },
        )?;

        info!(sdk_type, version, slot = %active_dir.display(), "Activated SDK");
        Ok(())
    }

    /// Version currently in the active slot, if any
    pub fn active_version(&self, sdk_type: &str) -> SwitchyResult<Option<String>> {
        if !self.layout.active_dir(sdk_type).is_dir() {
            return Ok(None);
        }
        Ok(read_record(&self.layout.active_record(sdk_type))?.map(|r| r.version))
    }

    pub fn active_record(&self, sdk_type: &str) -> SwitchyResult<Option<ActiveRecord>> {
        read_record(&self.layout.active_record(sdk_type))
    }

    fn type_lock(&self, sdk_type: &str) -> Arc<Mutex<()>> {
        lock_ignoring_poison(&self.locks)
            .entry(sdk_type.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Forget the lock for `sdk_type` once nobody holds or waits on it.
    fn release_type_lock(&self, sdk_type: &str) {
        let mut locks = lock_ignoring_poison(&self.locks);
        if locks
            .get(sdk_type)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(sdk_type);
        }
    }
}

fn lock_ignoring_poison<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Swap the staged copy into the active slot, restoring the previous slot if
/// the final rename fails.
///
/// The slot is missing between the two renames. A crash there leaves the
/// previous copy under `.default.old-*` for `recover_interrupted_swap`.
fn swap_into_place(staging: StagingDir, active_dir: &Path, type_dir: &Path) -> SwitchyResult<()> {
    let old = type_dir.join(format!("{}{}", OLD_PREFIX, uuid::Uuid::new_v4()));
    let had_active = active_dir.exists();

    if had_active {
        fs::rename(active_dir, &old).map_err(|e| SwitchyError::fs(active_dir, e))?;
    }

    if let Err(e) = fs::rename(staging.path(), active_dir) {
        if had_active {
            if let Err(restore) = fs::rename(&old, active_dir) {
                warn!(error = %restore, old = %old.display(), "Failed to restore previous SDK");
            }
        }
        return Err(SwitchyError::fs(active_dir, e));
    }
    staging.persisted();

    if had_active {
        if let Err(e) = fs::remove_dir_all(&old) {
            warn!(error = %e, old = %old.display(), "Failed to remove previous SDK copy");
        }
    }
    Ok(())
}

/// Finish or undo a swap that was interrupted between its two renames.
fn recover_interrupted_swap(type_dir: &Path, active_dir: &Path) -> SwitchyResult<()> {
    let leftovers = prefixed_entries(type_dir, OLD_PREFIX)?;
    if leftovers.is_empty() {
        return Ok(());
    }

    let mut leftovers = leftovers.into_iter();
    if !active_dir.exists() {
        if let Some(previous) = leftovers.next() {
            warn!(previous = %previous.display(), "Restoring SDK from interrupted activation");
            fs::rename(&previous, active_dir).map_err(|e| SwitchyError::fs(active_dir, e))?;
        }
    }
    for stale in leftovers {
        debug!(path = %stale.display(), "Removing leftover SDK copy");
        fs::remove_dir_all(&stale).map_err(|e| SwitchyError::fs(&stale, e))?;
    }
    Ok(())
}

fn prefixed_entries(dir: &Path, prefix: &str) -> SwitchyResult<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(SwitchyError::fs(dir, e)),
    };

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SwitchyError::fs(dir, e))?;
        if entry.file_name().to_string_lossy().starts_with(prefix) {
            found.push(entry.path());
        }
    }
    found.sort();
    Ok(found)
}

fn remove_prefixed(dir: &Path, prefix: &str) -> SwitchyResult<()> {
    for path in prefixed_entries(dir, prefix)? {
        debug!(path = %path.display(), "Removing stale staging directory");
        fs::remove_dir_all(&path).map_err(|e| SwitchyError::fs(&path, e))?;
    }
    Ok(())
}

fn remove_if_exists(path: &Path) -> SwitchyResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SwitchyError::fs(path, e)),
    }
}

/// Copy a directory tree, preserving symlinks and file permissions.
fn copy_tree(src: &Path, dst: &Path, cancel: &CancellationToken) -> SwitchyResult<()> {
    for entry in WalkDir::new(src).follow_links(false) {
        if cancel.is_cancelled() {
            return Err(SwitchyError::Cancelled);
        }

        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| SwitchyError::Path(e.to_string()))?;
        let target = dst.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| SwitchyError::fs(&target, e))?;
        } else if file_type.is_symlink() {
            let link = fs::read_link(entry.path()).map_err(|e| SwitchyError::fs(entry.path(), e))?;
            copy_symlink(&link, &target, entry.path())?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| SwitchyError::fs(&target, e))?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path, _source: &Path) -> SwitchyResult<()> {
    std::os::unix::fs::symlink(link, target).map_err(|e| SwitchyError::fs(target, e))
}

#[cfg(windows)]
fn copy_symlink(link: &Path, target: &Path, source: &Path) -> SwitchyResult<()> {
    let result = if source.is_dir() {
        std::os::windows::fs::symlink_dir(link, target)
    } else {
        std::os::windows::fs::symlink_file(link, target)
    };
    result.map_err(|e| SwitchyError::fs(target, e))
}

fn read_record(path: &Path) -> SwitchyResult<Option<ActiveRecord>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(SwitchyError::fs(path, e)),
    };
    match serde_yaml::from_str(&content) {
        Ok(record) => Ok(Some(record)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring unreadable active record");
            Ok(None)
        }
    }
}

fn write_record(path: &Path, record: &ActiveRecord) -> SwitchyResult<()> {
    let content = serde_yaml::to_string(record)?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(".active.yaml");
    let temp = path.with_file_name(format!("{}.{}.tmp", file_name, uuid::Uuid::new_v4()));

    fs::write(&temp, content).map_err(|e| SwitchyError::fs(&temp, e))?;
    if let Err(e) = fs::rename(&temp, path) {
        let _ = fs::remove_file(&temp);
        return Err(SwitchyError::fs(path, e));
    }
    Ok(())
}

/// Staging copy of a version, removed on drop unless swapped in.
struct StagingDir {
    path: PathBuf,
    keep: bool,
}

impl StagingDir {
    fn new(path: PathBuf) -> Self {
        Self { path, keep: false }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn persisted(mut self) {
        self.keep = true;
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        if !self.keep {
            let _ = fs::remove_dir_all(&self.path);
        }
    }
}

/// Entries of a type directory that are real installed versions.
pub fn is_version_entry(name: &str) -> bool {
    !name.starts_with('.') && name != ACTIVE_DIR_NAME
}
