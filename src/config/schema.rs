//! Configuration schema for Tessera
//!
//! Configuration is stored at `~/.config/tessera/config.toml`

use crate::cache::DEFAULT_EXTENSION;
use crate::render::ErrorCorrection;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Signing secret policy
    pub secret: SecretConfig,

    /// Artifact storage and rendering
    pub artifacts: ArtifactsConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,

    /// Enable audit logging
    pub audit_log: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
            audit_log: true,
        }
    }
}

/// Signing secret policy
///
/// The secret itself is never read from this file; it comes from
/// `TESSERA_SECRET` or `--secret`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretConfig {
    /// Sign with the well-known development key when no secret is set
    pub allow_insecure_default: bool,
}

/// Artifact storage and rendering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    /// Directory holding rendered artifacts (default: data dir)
    pub dir: Option<PathBuf>,

    /// File extension appended to storage keys
    pub extension: String,

    /// Minimum image width in pixels
    pub width: u32,

    /// Minimum image height in pixels
    pub height: u32,

    /// QR error correction level: L, M, Q or H
    pub error_correction: ErrorCorrection,

    /// Surround the code with a quiet zone
    pub quiet_zone: bool,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: None,
            extension: DEFAULT_EXTENSION.to_string(),
            width: 400,
            height: 400,
            error_correction: ErrorCorrection::M,
            quiet_zone: true,
        }
    }
}
