//! Single-flight artifact cache
//!
//! Artifacts are rendered at most once per key and are never refreshed. A
//! blob existing at the derived storage key is the cache hit; there is no
//! separate metadata.

use crate::cache::KeyedLocks;
use crate::error::{TesseraError, TesseraResult};
use crate::render::Renderer;
use crate::store::BlobStore;
use std::future::Future;
use std::sync::Arc;
use tokio::task;
use tracing::{debug, info};

/// Default file extension for stored artifacts
pub const DEFAULT_EXTENSION: &str = "png";

/// Replace every character outside `[A-Za-z0-9-_.]` with `_`
pub fn sanitize_key(key: &str) -> String {
    key.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Bytes returned by a cache lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub bytes: Vec<u8>,
    /// Whether this call rendered and stored the artifact
    pub created: bool,
}

/// Get-or-create cache over a [`BlobStore`]
pub struct ArtifactCache {
    store: Arc<dyn BlobStore>,
    locks: KeyedLocks,
    extension: String,
}

impl ArtifactCache {
    /// Create a cache storing artifacts with the given extension (no dot)
    pub fn new(store: Arc<dyn BlobStore>, extension: impl Into<String>) -> Self {
        let extension = extension.into().trim_start_matches('.').to_string();
        Self {
            store,
            locks: KeyedLocks::new(),
            extension,
        }
    }

    /// Storage key for a caller key: sanitized, plus the extension
    pub fn storage_key(&self, key: &str) -> String {
        format!("{}.{}", sanitize_key(key), self.extension)
    }

    /// Return the artifact for `key`, rendering `content` on first demand
    ///
    /// `render` is called at most once per key across concurrent callers,
    /// and only when no artifact is stored yet. Errors are not retried and
    /// leave the key absent.
    ///
    /// `render` runs on the calling task while the key lock is held. Use
    /// [`get_or_render`](Self::get_or_render) for renderers that should not
    /// block an async worker.
    pub async fn get_or_create<F>(
        &self,
        key: &str,
        content: &str,
        render: F,
    ) -> TesseraResult<Vec<u8>>
    where
        F: FnOnce(&str) -> TesseraResult<Vec<u8>>,
    {
        let artifact = self
            .fetch(key, move || async move { render(content) })
            .await?;
        Ok(artifact.bytes)
    }

    /// Like [`get_or_create`](Self::get_or_create), with `renderer` run on
    /// the blocking thread pool
    pub async fn get_or_render(
        &self,
        key: &str,
        content: &str,
        renderer: Arc<dyn Renderer>,
    ) -> TesseraResult<Artifact> {
        let content = content.to_string();
        self.fetch(key, move || async move {
            task::spawn_blocking(move || renderer.render(&content))
                .await
                .map_err(|e| TesseraError::Render(format!("render task failed: {}", e)))?
        })
        .await
    }

    async fn fetch<F, Fut>(&self, key: &str, produce: F) -> TesseraResult<Artifact>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = TesseraResult<Vec<u8>>>,
    {
        let storage_key = self.storage_key(key);
        let storage_key = storage_key.as_str();

        if self.store.exists(storage_key).await? {
            debug!("Artifact cache hit: {}", storage_key);
            return self.stored(storage_key).await;
        }

        self.locks
            .with_lock(storage_key, move || async move {
                // Another producer may have finished while we waited.
                if self.store.exists(storage_key).await? {
                    debug!("Artifact {} created by a concurrent caller", storage_key);
                    return self.stored(storage_key).await;
                }

                info!("Rendering artifact {}", storage_key);
                let bytes = produce().await?;
                self.store.write_if_absent(storage_key, &bytes).await?;
                Ok(Artifact {
                    bytes,
                    created: true,
                })
            })
            .await
    }

    async fn stored(&self, storage_key: &str) -> TesseraResult<Artifact> {
        let bytes = self.store.read(storage_key).await?;
        Ok(Artifact {
            bytes,
            created: false,
        })
    }

    /// Whether an artifact is stored for `key`
    pub async fn contains(&self, key: &str) -> TesseraResult<bool> {
        self.store.exists(&self.storage_key(key)).await
    }

    /// Storage keys of every stored artifact
    pub async fn list(&self) -> TesseraResult<Vec<String>> {
        self.store.list().await
    }

    /// Number of keys with a producer in flight
    pub fn in_flight(&self) -> usize {
        self.locks.len()
    }
}
