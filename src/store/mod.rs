//! Durable key to bytes storage with all-or-nothing writes
//!
//! # Contract
//!
//! - A reader that sees `exists(key) == true` always reads complete bytes
//! - `write_if_absent` never leaves a partial blob at the final key
//! - Temporaries are never reported by `exists`, `read` or `list`

pub mod fs;
pub mod memory;

pub use fs::FsBlobStore;
pub use memory::MemoryBlobStore;

use crate::error::{TesseraError, TesseraResult};
use async_trait::async_trait;

/// Storage backend for rendered artifacts
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Whether a complete blob exists at `key`
    async fn exists(&self, key: &str) -> TesseraResult<bool>;

    /// Read a blob, failing with `BlobNotFound` if absent
    async fn read(&self, key: &str) -> TesseraResult<Vec<u8>>;

    /// Store `bytes` at `key` unless a blob is already there
    async fn write_if_absent(&self, key: &str, bytes: &[u8]) -> TesseraResult<()>;

    /// All stored keys, sorted
    async fn list(&self) -> TesseraResult<Vec<String>>;
}

/// Marker inside temporary file names, `.<key>.tmp-<uuid>`
pub(crate) const TEMP_MARKER: &str = ".tmp-";

/// Whether `name` has the shape of an in-progress write
pub(crate) fn is_temp_name(name: &str) -> bool {
    name.starts_with('.') && name.contains(TEMP_MARKER)
}

/// Reject keys that could escape the store or collide with temporaries
pub(crate) fn validate_key(key: &str) -> TesseraResult<()> {
    if key.is_empty()
        || key == "."
        || key == ".."
        || key.contains('/')
        || key.contains('\\')
        || is_temp_name(key)
    {
        return Err(TesseraError::InvalidStorageKey(key.to_string()));
    }
    Ok(())
}
