//! Archive extraction into a normalized version directory.

pub mod format;
pub mod strategy;

use crate::core::{SwitchyError, SwitchyResult};
use std::fs;
use std::path::{Path, PathBuf};
use strategy::{default_strategies, ExtractContext, ExtractStrategy, Outcome};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Unpacks cached artifacts. Formats are recognized by content, not by name.
pub struct ArchiveExtractor {
    strategies: Vec<Box<dyn ExtractStrategy>>,
}

impl Default for ArchiveExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveExtractor {
    pub fn new() -> Self {
        Self {
            strategies: default_strategies(),
        }
    }

    /// Extract `artifact` so that `destination` holds exactly its contents.
    ///
    /// A single top-level wrapper directory is flattened away. Existing
    /// destination contents are replaced, never merged.
    pub fn extract(&self, artifact: &Path, destination: &Path) -> SwitchyResult<()> {
        self.extract_cancellable(artifact, destination, &CancellationToken::new())
    }

    pub fn extract_cancellable(
        &self,
        artifact: &Path,
        destination: &Path,
        cancel: &CancellationToken,
    ) -> SwitchyResult<()> {
        if !artifact.is_file() {
            return Err(SwitchyError::fs(
                artifact,
                std::io::Error::new(std::io::ErrorKind::NotFound, "artifact not found"),
            ));
        }

        let scratch = ScratchDir::beside(destination)?;
        let mut ctx = ExtractContext {
            artifact,
            tree: scratch.path().join("tree"),
            decoded_dir: scratch.path().join("decoded"),
            decoded: None,
        };
        fs::create_dir_all(&ctx.tree).map_err(|e| SwitchyError::fs(&ctx.tree, e))?;

        let mut outcome = Outcome::NotApplicable;
        for strategy in &self.strategies {
            if cancel.is_cancelled() {
                return Err(SwitchyError::Cancelled);
            }
            outcome = strategy.apply(&mut ctx)?;
            if outcome != Outcome::NotApplicable {
                debug!(strategy = strategy.name(), artifact = %artifact.display(), "Strategy applied");
                break;
            }
        }

        if outcome == Outcome::NotApplicable {
            return Err(SwitchyError::Extraction(format!(
                "unrecognized archive format: {}",
                artifact.display()
            )));
        }
        if cancel.is_cancelled() {
            return Err(SwitchyError::Cancelled);
        }

        let payload = match outcome {
            Outcome::Standalone(file) => standalone_payload(&file, &scratch.path().join("payload"))?,
            _ => tree_payload(&ctx.tree)?,
        };
        install_payload(&payload, destination, &scratch.path().join("previous"))?;

        info!(
            artifact = %artifact.display(),
            destination = %destination.display(),
            "Extracted artifact"
        );
        Ok(())
    }
}

/// The directory whose contents become the destination, dropping a lone
/// wrapper directory.
fn tree_payload(tree: &Path) -> SwitchyResult<PathBuf> {
    let entries = list_dir(tree)?;

    match entries.as_slice() {
        [only] if is_real_dir(only)? => {
            debug!(wrapper = %only.display(), "Flattening single top-level directory");
            Ok(only.clone())
        }
        _ => Ok(tree.to_path_buf()),
    }
}

/// Wrap a decoded standalone file in its own directory, marked executable.
fn standalone_payload(file: &Path, payload: &Path) -> SwitchyResult<PathBuf> {
    let name = file
        .file_name()
        .ok_or_else(|| SwitchyError::Path(format!("No file name: {}", file.display())))?;
    fs::create_dir_all(payload).map_err(|e| SwitchyError::fs(payload, e))?;

    let target = payload.join(name);
    fs::rename(file, &target).map_err(|e| SwitchyError::fs(&target, e))?;
    mark_executable(&target)?;
    Ok(payload.to_path_buf())
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> SwitchyResult<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)
        .map_err(|e| SwitchyError::fs(path, e))?
        .permissions();
    permissions.set_mode(permissions.mode() | 0o755);
    fs::set_permissions(path, permissions).map_err(|e| SwitchyError::fs(path, e))
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> SwitchyResult<()> {
    Ok(())
}

/// Replace `destination` with the `payload` directory in one rename.
///
/// An existing destination is first moved to `previous` (inside the scratch
/// area) and moved back if the payload cannot be renamed into place, so the
/// destination is either absent, the old tree, or the complete new tree.
fn install_payload(payload: &Path, destination: &Path, previous: &Path) -> SwitchyResult<()> {
    let had_previous = match fs::symlink_metadata(destination) {
        Ok(_) => {
            fs::rename(destination, previous).map_err(|e| SwitchyError::fs(destination, e))?;
            true
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => return Err(SwitchyError::fs(destination, e)),
    };

    if let Err(e) = fs::rename(payload, destination) {
        if had_previous {
            if let Err(restore) = fs::rename(previous, destination) {
                warn!(
                    error = %restore,
                    destination = %destination.display(),
                    "Failed to restore previous extraction"
                );
            }
        }
        return Err(SwitchyError::fs(destination, e));
    }
    Ok(())
}

fn list_dir(dir: &Path) -> SwitchyResult<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| SwitchyError::fs(dir, e))? {
        entries.push(entry.map_err(|e| SwitchyError::fs(dir, e))?.path());
    }
    Ok(entries)
}

fn is_real_dir(path: &Path) -> SwitchyResult<bool> {
    let metadata = fs::symlink_metadata(path).map_err(|e| SwitchyError::fs(path, e))?;
    Ok(metadata.is_dir())
}

/// Scratch directory next to the destination, on the same filesystem so the
/// final move is a rename. Removed on drop.
struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    fn beside(destination: &Path) -> SwitchyResult<Self> {
        let parent = destination
            .parent()
            .ok_or_else(|| SwitchyError::Path(format!("No parent: {}", destination.display())))?;
        let name = destination
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| SwitchyError::Path(format!("Invalid destination: {}", destination.display())))?;

        let path = parent.join(format!(".{}.extract-{}", name, uuid::Uuid::new_v4()));
        fs::create_dir_all(&path).map_err(|e| SwitchyError::fs(&path, e))?;
        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}
