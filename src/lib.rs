//! Tessera - signed entitlement passes
//!
//! Issues tamper-evident pass tokens and renders each pass once as a QR
//! code, cached on disk with atomic writes.

pub mod audit;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod pass;
pub mod render;
pub mod store;
pub mod token;

pub use error::{TesseraError, TesseraResult, TokenError};
