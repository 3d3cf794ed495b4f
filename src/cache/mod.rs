//! Artifact cache
//!
//! Renders each artifact once and keeps it forever.
//!
//! # Lookup
//!
//! | Step | Lock | Description |
//! |------|------|-------------|
//! | Fast path | none | Blob exists, read and return |
//! | Re-check | key | Another producer finished while we waited |
//! | Render | key | True miss: render, write atomically, return |

pub mod artifact;
pub mod locks;

pub use artifact::{sanitize_key, Artifact, ArtifactCache, DEFAULT_EXTENSION};
pub use locks::KeyedLocks;
