//! In-process blob store

use crate::error::{TesseraError, TesseraResult};
use crate::store::{validate_key, BlobStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Blob store held in memory; contents are lost on exit
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn exists(&self, key: &str) -> TesseraResult<bool> {
        validate_key(key)?;
        let blobs = self.blobs.read().unwrap_or_else(PoisonError::into_inner);
        Ok(blobs.contains_key(key))
    }

    async fn read(&self, key: &str) -> TesseraResult<Vec<u8>> {
        validate_key(key)?;
        let blobs = self.blobs.read().unwrap_or_else(PoisonError::into_inner);
        blobs
            .get(key)
            .cloned()
            .ok_or_else(|| TesseraError::BlobNotFound(key.to_string()))
    }

    async fn write_if_absent(&self, key: &str, bytes: &[u8]) -> TesseraResult<()> {
        validate_key(key)?;
        let mut blobs = self.blobs.write().unwrap_or_else(PoisonError::into_inner);
        blobs
            .entry(key.to_string())
            .or_insert_with(|| bytes.to_vec());
        Ok(())
    }

    async fn list(&self) -> TesseraResult<Vec<String>> {
        let blobs = self.blobs.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<String> = blobs.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
