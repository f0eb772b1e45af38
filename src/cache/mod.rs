//! Download cache: turns a catalog descriptor into a verified local artifact.

pub mod checksum;
pub mod key;
pub mod progress;

pub use progress::ProgressSink;

use crate::catalog::client::http_client;
use crate::catalog::DownloadDescriptor;
use crate::core::path::{ensure_dir, validate_segment};
use crate::core::{SwitchyError, SwitchyResult};
use futures_util::StreamExt;
use reqwest::Client;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Content cache of downloaded SDK archives.
///
/// A slot only ever appears at its final path after the complete download has
/// been verified; partial data lives in a dot-prefixed `.part` file.
#[derive(Clone)]
pub struct ArtifactCache {
    root: PathBuf,
    client: Client,
    in_flight: InFlight,
}

impl ArtifactCache {
    /// Create a cache rooted at `cache_root` with its own HTTP client
    pub fn new(cache_root: PathBuf, timeout: Duration) -> SwitchyResult<Self> {
        Ok(Self::with_client(cache_root, http_client(timeout)?))
    }

    pub fn with_client(cache_root: PathBuf, client: Client) -> Self {
        Self {
            root: cache_root,
            client,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Final path of the slot for an artifact
    pub fn slot_path(&self, sdk_type: &str, version: &str, url: &str) -> PathBuf {
        self.root.join(key::cache_key(sdk_type, version, url))
    }

    /// Return a verified local copy of the artifact, downloading it if needed.
    ///
    /// A present slot is reused without any network traffic when it matches the
    /// descriptor's checksum (or when there is no checksum). A slot that fails
    /// verification is deleted and downloaded again once.
    ///
    /// # Errors
    ///
    /// `Network` for transport failures, `Integrity` when the fresh download does
    /// not match its checksum, `Filesystem` for local I/O, `Cancelled` when the
    /// token fires. None of them leave a file at the slot path.
    pub async fn acquire(
        &self,
        sdk_type: &str,
        version: &str,
        descriptor: &DownloadDescriptor,
        progress: Option<&dyn ProgressSink>,
        cancel: &CancellationToken,
    ) -> SwitchyResult<PathBuf> {
        validate_segment("SDK type", sdk_type)?;
        validate_segment("version", version)?;

        let key = key::cache_key(sdk_type, version, &descriptor.url);
        let slot = self.root.join(&key);
        ensure_dir(&self.root)?;

        // Callers for the same key queue here; whoever follows the downloader
        // finds a verified slot below.
        let key_lock = self.key_lock(&key);
        let guard = tokio::select! {
            _ = cancel.cancelled() => None,
            guard = Arc::clone(&key_lock).lock_owned() => Some(guard),
        };
        drop(key_lock);
        let lease = KeyLease {
            guard,
            key: key.clone(),
            in_flight: Arc::clone(&self.in_flight),
        };
        if lease.guard.is_none() {
            return Err(SwitchyError::Cancelled);
        }

        if self.reuse_slot(&slot, descriptor.sha256.as_deref()).await? {
            info!(slot = %slot.display(), "Using cached artifact");
            return Ok(slot);
        }

        let temp = PartialFile::new(self.root.join(format!(
            ".{}.{}.part",
            key,
            uuid::Uuid::new_v4()
        )));
        self.download(&descriptor.url, temp.path(), progress, cancel)
            .await?;

        if let Some(expected) = descriptor.sha256.clone() {
            let path = temp.path().to_path_buf();
            run_blocking(move || checksum::verify_file(&path, &expected))
                .await
                .map_err(|e| match e {
                    SwitchyError::Integrity {
                        expected, actual, ..
                    } => SwitchyError::Integrity {
                        path: slot.clone(),
                        expected,
                        actual,
                    },
                    other => other,
                })?;
        }

        temp.persist(&slot).await?;
        info!(slot = %slot.display(), "Cached artifact");
        Ok(slot)
    }

    fn key_lock(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        lock_map(&self.in_flight)
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Decide whether an existing slot can be returned as-is. Unusable slots are
    /// removed so the caller downloads a fresh copy.
    async fn reuse_slot(&self, slot: &Path, sha256: Option<&str>) -> SwitchyResult<bool> {
        let metadata = match tokio::fs::metadata(slot).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(SwitchyError::fs(slot, e)),
        };

        if metadata.len() == 0 {
            debug!(slot = %slot.display(), "Discarding empty cache slot");
            remove_slot(slot).await?;
            return Ok(false);
        }

        let Some(expected) = sha256 else {
            return Ok(true);
        };

        let path = slot.to_path_buf();
        let expected = expected.to_string();
        match run_blocking(move || checksum::verify_file(&path, &expected)).await {
            Ok(()) => Ok(true),
            Err(SwitchyError::Integrity {
                expected, actual, ..
            }) => {
                warn!(
                    slot = %slot.display(),
                    %expected,
                    %actual,
                    "Cached artifact failed verification, downloading again"
                );
                remove_slot(slot).await?;
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn download(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<&dyn ProgressSink>,
        cancel: &CancellationToken,
    ) -> SwitchyResult<()> {
        info!(%url, "Downloading artifact");

        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(SwitchyError::Cancelled),
            response = self.client.get(url).send() => response
                .map_err(|e| SwitchyError::Network(format!("Failed to connect to {}: {}", url, e)))?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(SwitchyError::Network(format!(
                "Download of {} returned HTTP {}",
                url, status
            )));
        }

        let total = response.content_length();
        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| SwitchyError::fs(dest, e))?;
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        loop {
            let next = tokio::select! {
                _ = cancel.cancelled() => return Err(SwitchyError::Cancelled),
                next = stream.next() => next,
            };
            let Some(chunk) = next else { break };
            let chunk = chunk.map_err(|e| {
                SwitchyError::Network(format!("Failed to read chunk from {}: {}", url, e))
            })?;

            file.write_all(&chunk)
                .await
                .map_err(|e| SwitchyError::fs(dest, e))?;
            downloaded += chunk.len() as u64;

            if let Some(sink) = progress {
                sink.on_progress(downloaded, total);
            }
        }

        file.flush().await.map_err(|e| SwitchyError::fs(dest, e))?;
        file.sync_all().await.map_err(|e| SwitchyError::fs(dest, e))?;

        if let Some(sink) = progress {
            sink.finish();
        }
        debug!(%url, bytes = downloaded, "Download complete");
        Ok(())
    }
}

type InFlight = Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>;

fn lock_map<T>(map: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match map.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Holds the per-key download lock. The map entry goes away with the last
/// holder or waiter.
struct KeyLease {
    guard: Option<tokio::sync::OwnedMutexGuard<()>>,
    key: String,
    in_flight: InFlight,
}

impl Drop for KeyLease {
    fn drop(&mut self) {
        self.guard.take();
        let mut in_flight = lock_map(&self.in_flight);
        // entries are only cloned under the map lock, so a count of one is final
        if in_flight
            .get(&self.key)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            in_flight.remove(&self.key);
        }
    }
}

async fn remove_slot(slot: &Path) -> SwitchyResult<()> {
    tokio::fs::remove_file(slot)
        .await
        .map_err(|e| SwitchyError::fs(slot, e))
}

/// Run blocking file work off the async executor.
pub(crate) async fn run_blocking<T, F>(f: F) -> SwitchyResult<T>
where
    F: FnOnce() -> SwitchyResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| SwitchyError::Io(std::io::Error::other(e)))?
}

/// In-progress download file, removed on drop unless persisted.
struct PartialFile {
    path: PathBuf,
    persisted: bool,
}

impl PartialFile {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            persisted: false,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(mut self, slot: &Path) -> SwitchyResult<()> {
        tokio::fs::rename(&self.path, slot)
            .await
            .map_err(|e| SwitchyError::fs(slot, e))?;
        self.persisted = true;
        Ok(())
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if !self.persisted {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
