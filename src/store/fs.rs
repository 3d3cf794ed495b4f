//! Directory-backed blob store
//!
//! Each write lands in `.<key>.tmp-<uuid>` beside the final path, is synced,
//! then renamed into place. Rename within one directory is atomic, so the
//! final path holds either nothing or the whole blob.

use crate::error::{TesseraError, TesseraResult};
use crate::store::{is_temp_name, validate_key, BlobStore, TEMP_MARKER};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

/// Blob store rooted at a directory
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    dir: PathBuf,
}

impl FsBlobStore {
    /// Open a store at `dir`, creating the directory if needed
    pub async fn open(dir: impl Into<PathBuf>) -> TesseraResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await.map_err(|e| {
            TesseraError::io(format!("creating artifact directory {}", dir.display()), e)
        })?;
        Ok(Self { dir })
    }

    /// Directory holding the blobs
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Final path for `key`
    pub fn path_for(&self, key: &str) -> TesseraResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(key))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{}{}{}", key, TEMP_MARKER, Uuid::new_v4()))
    }

    async fn write_temp(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        Ok(())
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn exists(&self, key: &str) -> TesseraResult<bool> {
        let path = self.path_for(key)?;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(TesseraError::io(
                format!("checking artifact {}", path.display()),
                e,
            )),
        }
    }

    async fn read(&self, key: &str) -> TesseraResult<Vec<u8>> {
        let path = self.path_for(key)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(TesseraError::BlobNotFound(key.to_string()))
            }
            Err(e) => Err(TesseraError::io(
                format!("reading artifact {}", path.display()),
                e,
            )),
        }
    }

    async fn write_if_absent(&self, key: &str, bytes: &[u8]) -> TesseraResult<()> {
        let path = self.path_for(key)?;
        if self.exists(key).await? {
            debug!("Artifact {} already stored, skipping write", key);
            return Ok(());
        }

        let tmp = self.temp_path(key);
        if let Err(e) = Self::write_temp(&tmp, bytes).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(TesseraError::io(
                format!("writing temporary artifact {}", tmp.display()),
                e,
            ));
        }

        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(TesseraError::io(
                format!("moving artifact into place at {}", path.display()),
                e,
            ));
        }

        // Best effort: make the rename itself durable.
        if let Ok(dir) = fs::File::open(&self.dir).await {
            if let Err(e) = dir.sync_all().await {
                warn!("Failed to sync artifact directory: {}", e);
            }
        }

        debug!("Stored artifact {} ({} bytes)", key, bytes.len());
        Ok(())
    }

    async fn list(&self) -> TesseraResult<Vec<String>> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(TesseraError::io("reading artifact directory", e)),
        };

        let mut keys = vec![];
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| TesseraError::io("reading artifact entry", e))?
        {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if is_temp_name(&name) {
                continue;
            }
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            if is_file {
                keys.push(name);
            }
        }

        keys.sort();
        Ok(keys)
    }
}
