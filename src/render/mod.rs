//! Artifact rendering
//!
//! The cache treats rendering as a black box: content string in, raster
//! bytes out, deterministic and free of side effects.

pub mod qr;

pub use qr::{ErrorCorrection, QrRenderer};

use crate::error::TesseraResult;

/// Turns content into artifact bytes
pub trait Renderer: Send + Sync {
    fn render(&self, content: &str) -> TesseraResult<Vec<u8>>;
}
