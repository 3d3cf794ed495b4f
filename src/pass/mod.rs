//! Entitlement payloads and admission decisions
//!
//! A pass payload is five `|`-separated fields: subject id, display name,
//! route id, expiry date and issue date. The token codec treats the joined
//! string as opaque bytes; this module owns its structure.

pub mod admission;
pub mod payload;

pub use admission::{admit, inspect, Inspection, Verdict};
pub use payload::{PassPayload, PayloadError, FIELD_DELIMITER};
