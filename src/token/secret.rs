//! Signing secret provisioning

use crate::error::{TesseraError, TesseraResult};
use std::fmt;
use subtle::ConstantTimeEq;
use tracing::warn;

/// Environment variable the secret is read from
pub const SECRET_ENV: &str = "TESSERA_SECRET";

/// Well-known key used only when insecure defaults are explicitly allowed.
/// Anyone can forge tokens signed with it.
const DEVELOPMENT_SECRET: &[u8] = b"tessera-development-secret-do-not-deploy";

/// Symmetric signing key, immutable once constructed
#[derive(Clone)]
pub struct Secret(Vec<u8>);

impl Secret {
    /// Wrap raw key bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Resolve the process secret from an explicit configuration value
    ///
    /// An absent or empty value is refused unless `allow_insecure_default`
    /// is set, in which case the development key is used.
    pub fn resolve(value: Option<&str>, allow_insecure_default: bool) -> TesseraResult<Self> {
        match value.filter(|v| !v.is_empty()) {
            Some(v) => Ok(Self::new(v.as_bytes())),
            None if allow_insecure_default => {
                warn!(
                    "{} not set, signing with the development key; tokens are forgeable",
                    SECRET_ENV
                );
                Ok(Self::new(DEVELOPMENT_SECRET))
            }
            None => Err(TesseraError::SecretMissing),
        }
    }

    pub(crate) fn expose(&self) -> &[u8] {
        &self.0
    }

    /// Whether this is the well-known development key
    pub fn is_development(&self) -> bool {
        bool::from(self.0.as_slice().ct_eq(DEVELOPMENT_SECRET))
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([REDACTED])")
    }
}
