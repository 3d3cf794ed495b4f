//! HMAC-SHA256 token encoding and verification

use crate::error::TokenError;
use crate::token::Secret;
use base64::prelude::{Engine as _, BASE64_URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

/// Separator between the payload and tag segments
pub const TOKEN_SEPARATOR: char = '.';

/// Encodes and verifies tokens under a single secret
#[derive(Clone)]
pub struct TokenCodec {
    secret: Secret,
}

impl TokenCodec {
    /// Create a codec bound to `secret`
    pub fn new(secret: Secret) -> Self {
        Self { secret }
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC accepts keys of any length; new_from_slice only fails for
        // fixed-key MACs.
        match HmacSha256::new_from_slice(self.secret.expose()) {
            Ok(mac) => mac,
            Err(_) => unreachable!("HMAC-SHA256 takes keys of any length"),
        }
    }

    /// Sign `payload` and return the token string
    pub fn encode(&self, payload: &[u8]) -> String {
        let mut mac = self.mac();
        mac.update(payload);
        let tag = mac.finalize().into_bytes();

        format!(
            "{}{}{}",
            BASE64_URL_SAFE_NO_PAD.encode(payload),
            TOKEN_SEPARATOR,
            BASE64_URL_SAFE_NO_PAD.encode(tag)
        )
    }

    /// Split, decode and authenticate a token, returning the payload bytes
    pub fn decode_and_verify(&self, token: &str) -> Result<Vec<u8>, TokenError> {
        let (payload_b64, tag_b64) = token
            .split_once(TOKEN_SEPARATOR)
            .ok_or(TokenError::Format)?;

        // Anything after a second separator would be unauthenticated.
        if tag_b64.contains(TOKEN_SEPARATOR) {
            return Err(TokenError::Format);
        }

        let payload = BASE64_URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| TokenError::Encoding)?;
        let tag = BASE64_URL_SAFE_NO_PAD
            .decode(tag_b64)
            .map_err(|_| TokenError::Encoding)?;

        let mut mac = self.mac();
        mac.update(&payload);
        mac.verify_slice(&tag).map_err(|_| TokenError::Signature)?;

        Ok(payload)
    }

    /// Like [`decode_and_verify`](Self::decode_and_verify), but the payload
    /// must also be UTF-8
    pub fn verify_str(&self, token: &str) -> Result<String, TokenError> {
        let payload = self.decode_and_verify(token)?;
        String::from_utf8(payload).map_err(|_| TokenError::Encoding)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("secret", &self.secret)
            .finish()
    }
}

/// Short SHA-256 fingerprint of a token for logs, first 12 hex chars
pub fn fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    hex::encode(&digest[..6])
}
