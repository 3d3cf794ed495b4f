//! Error types for Tessera
//!
//! All modules use `TesseraResult<T>` as their return type. Token failures
//! have their own [`TokenError`] so operators can see the exact kind, but it
//! collapses into [`TesseraError::UntrustedToken`] at the trust boundary.

use crate::pass::PayloadError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Tessera operations
pub type TesseraResult<T> = Result<T, TesseraError>;

/// Why a token failed to decode or verify
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is not two dot-separated segments")]
    Format,

    #[error("token segment is not valid base64url")]
    Encoding,

    #[error("token signature does not match")]
    Signature,
}

impl TokenError {
    /// Stable name for logs and audit records
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Format => "format",
            Self::Encoding => "encoding",
            Self::Signature => "signature",
        }
    }
}

/// All errors that can occur in Tessera
#[derive(Error, Debug)]
pub enum TesseraError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Signing secret not configured")]
    SecretMissing,

    // Token errors
    #[error("Untrusted token")]
    UntrustedToken,

    #[error("Invalid payload: {0}")]
    Payload(#[from] PayloadError),

    // Storage errors
    #[error("Artifact not found: {0}")]
    BlobNotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidStorageKey(String),

    #[error("Failed to render artifact: {0}")]
    Render(String),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl From<TokenError> for TesseraError {
    fn from(_: TokenError) -> Self {
        Self::UntrustedToken
    }
}

impl TesseraError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::SecretMissing => Some(
                "Set TESSERA_SECRET, or allow the development key with \
                 secret.allow_insecure_default = true",
            ),
            Self::ConfigInvalid { .. } => Some("Run: tessera config show"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TesseraError::BlobNotFound("A001.png".to_string());
        assert!(err.to_string().contains("A001.png"));
    }

    #[test]
    fn error_hint() {
        assert!(TesseraError::SecretMissing
            .hint()
            .is_some_and(|h| h.contains("TESSERA_SECRET")));
        assert_eq!(TesseraError::UntrustedToken.hint(), None);
    }

    #[test]
    fn token_errors_collapse_to_untrusted() {
        for kind in [TokenError::Format, TokenError::Encoding, TokenError::Signature] {
            let err: TesseraError = kind.into();
            assert!(matches!(err, TesseraError::UntrustedToken));
            assert_eq!(err.to_string(), "Untrusted token");
        }
    }

    #[test]
    fn token_error_kind_names() {
        assert_eq!(TokenError::Format.kind(), "format");
        assert_eq!(TokenError::Encoding.kind(), "encoding");
        assert_eq!(TokenError::Signature.kind(), "signature");
    }
}
