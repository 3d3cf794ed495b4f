//! Signed opaque tokens
//!
//! A token is `base64url(payload) "." base64url(hmac_sha256(secret, payload))`,
//! both segments unpadded. Base64url never emits `.`, so the first dot is
//! always the separator.
//!
//! # Security Model
//!
//! - Tags are compared in constant time
//! - The secret is fixed for the life of a [`TokenCodec`] and never logged
//! - The codec embeds no timestamp or nonce; expiry lives in the payload

pub mod codec;
pub mod secret;

pub use codec::{fingerprint, TokenCodec, TOKEN_SEPARATOR};
pub use secret::{Secret, SECRET_ENV};
