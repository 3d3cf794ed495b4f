//! Admission decision for a verified pass

use crate::error::TokenError;
use crate::pass::payload::EXPIRY_FIELD;
use crate::pass::{PassPayload, PayloadError};
use crate::token::{fingerprint, TokenCodec};
use chrono::NaiveDate;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;
use tracing::debug;

/// Outcome shown to the verifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Pass is valid for this route today
    Allow,
    /// Authentic pass that does not grant entry
    Deny(&'static str),
    /// Token could not be trusted or understood
    NoEntry(&'static str),
}

impl Verdict {
    /// Single outcome for every token decode or signature failure
    pub const UNTRUSTED: Verdict = Verdict::NoEntry("untrusted-token");

    /// Outcome for an authentic token whose payload is malformed
    pub const INVALID_PAYLOAD: Verdict = Verdict::NoEntry("invalid-payload-format");

    /// Outcome for an authentic token whose expiry date does not parse
    pub const INVALID_EXPIRY: Verdict = Verdict::Deny("invalid-expiry-in-token");

    pub fn result(&self) -> &'static str {
        match self {
            Self::Allow => "ALLOW",
            Self::Deny(_) => "DENY",
            Self::NoEntry(_) => "NO_ENTRY",
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Self::Allow => "ok",
            Self::Deny(reason) | Self::NoEntry(reason) => *reason,
        }
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.result(), self.reason())
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Verdict", 2)?;
        state.serialize_field("result", self.result())?;
        state.serialize_field("reason", self.reason())?;
        state.end()
    }
}

/// Decide whether `payload` admits its bearer on `today`
///
/// The pass is valid through its expiry date. Routes compare ignoring ASCII
/// case; with no expected route only expiry is checked.
pub fn admit(payload: &PassPayload, expected_route: Option<&str>, today: NaiveDate) -> Verdict {
    if payload.expiry_date < today {
        return Verdict::Deny("expired");
    }

    if let Some(route) = expected_route {
        if !payload.route_id.eq_ignore_ascii_case(route.trim()) {
            return Verdict::Deny("route-mismatch");
        }
    }

    Verdict::Allow
}

/// Everything learned from checking one token
#[derive(Debug, Clone)]
pub struct Inspection {
    /// What the verifier is told
    pub verdict: Verdict,
    /// Decoded payload, present once the signature checks out
    pub payload: Option<PassPayload>,
    /// Specific codec failure, for operators only
    pub rejection: Option<TokenError>,
}

/// Verify `token` and decide admission
///
/// Every codec failure yields the same [`Verdict::UNTRUSTED`]; the specific
/// kind is kept in [`Inspection::rejection`] and the debug log.
pub fn inspect(
    codec: &TokenCodec,
    token: &str,
    expected_route: Option<&str>,
    today: NaiveDate,
) -> Inspection {
    let wire = match codec.verify_str(token.trim()) {
        Ok(wire) => wire,
        Err(e) => {
            debug!("Token {} rejected: {}", fingerprint(token), e.kind());
            return Inspection {
                verdict: Verdict::UNTRUSTED,
                payload: None,
                rejection: Some(e),
            };
        }
    };

    match PassPayload::parse(&wire) {
        Ok(payload) => Inspection {
            verdict: admit(&payload, expected_route, today),
            payload: Some(payload),
            rejection: None,
        },
        Err(e) => {
            debug!("Token {} carries a malformed payload: {}", fingerprint(token), e);
            let verdict = match e {
                PayloadError::InvalidDate {
                    field: EXPIRY_FIELD,
                    ..
                } => Verdict::INVALID_EXPIRY,
                _ => Verdict::INVALID_PAYLOAD,
            };
            Inspection {
                verdict,
                payload: None,
                rejection: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Secret;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn pass(expires: &str) -> PassPayload {
        PassPayload::new("A001", "Jane Doe", "R12", date(expires), date("2024-01-01")).unwrap()
    }

    #[test]
    fn valid_pass_allowed() {
        let verdict = admit(&pass("2025-01-01"), Some("R12"), date("2024-06-01"));
        assert_eq!(verdict, Verdict::Allow);
    }

    #[test]
    fn expiry_day_is_inclusive() {
        let verdict = admit(&pass("2025-01-01"), None, date("2025-01-01"));
        assert!(verdict.is_allow());
    }

    #[test]
    fn expired_pass_denied() {
        let verdict = admit(&pass("2025-01-01"), Some("R12"), date("2025-01-02"));
        assert_eq!(verdict, Verdict::Deny("expired"));
    }

    #[test]
    fn route_compared_case_insensitively() {
        assert!(admit(&pass("2025-01-01"), Some("r12"), date("2024-06-01")).is_allow());
        assert_eq!(
            admit(&pass("2025-01-01"), Some("R7"), date("2024-06-01")),
            Verdict::Deny("route-mismatch")
        );
    }

    #[test]
    fn verdict_serializes_result_and_reason() {
        let json = serde_json::to_value(Verdict::UNTRUSTED).unwrap();
        assert_eq!(json["result"], "NO_ENTRY");
        assert_eq!(json["reason"], "untrusted-token");

        let json = serde_json::to_value(Verdict::Allow).unwrap();
        assert_eq!(json["result"], "ALLOW");
        assert_eq!(json["reason"], "ok");
    }

    fn codec() -> TokenCodec {
        TokenCodec::new(Secret::new("k"))
    }

    #[test]
    fn inspect_allows_valid_token() {
        let codec = codec();
        let token = codec.encode(pass("2025-01-01").to_wire().as_bytes());

        let inspection = inspect(&codec, &token, Some("R12"), date("2024-06-01"));
        assert_eq!(inspection.verdict, Verdict::Allow);
        assert_eq!(inspection.payload.unwrap().subject_id, "A001");
        assert!(inspection.rejection.is_none());
    }

    #[test]
    fn inspect_collapses_codec_failures() {
        let codec = codec();
        let token = codec.encode(pass("2025-01-01").to_wire().as_bytes());
        let forged =
            TokenCodec::new(Secret::new("other")).encode(b"A001|x|R12|2099-01-01|2024-01-01");

        let cases = [
            ("no-separator", TokenError::Format),
            ("bad*b64.AAAA", TokenError::Encoding),
            (forged.as_str(), TokenError::Signature),
        ];
        for (input, kind) in cases {
            let inspection = inspect(&codec, input, None, date("2024-06-01"));
            assert_eq!(inspection.verdict, Verdict::UNTRUSTED);
            assert_eq!(inspection.rejection, Some(kind));
            assert!(inspection.payload.is_none());
        }

        // Sanity: the genuine token is not rejected.
        assert!(inspect(&codec, &token, None, date("2024-06-01")).rejection.is_none());
    }

    #[test]
    fn inspect_flags_malformed_payload() {
        let codec = codec();
        let token = codec.encode(b"A001|Jane|R12");

        let inspection = inspect(&codec, &token, None, date("2024-06-01"));
        assert_eq!(inspection.verdict, Verdict::INVALID_PAYLOAD);
        assert!(inspection.rejection.is_none());
    }

    #[test]
    fn inspect_denies_unparseable_expiry() {
        let codec = codec();
        let token = codec.encode(b"A001|Jane|R12|someday|2024-01-01");

        let inspection = inspect(&codec, &token, None, date("2024-06-01"));
        assert_eq!(inspection.verdict, Verdict::INVALID_EXPIRY);
        assert_eq!(inspection.verdict.result(), "DENY");
        assert_eq!(inspection.verdict.reason(), "invalid-expiry-in-token");
        assert!(inspection.rejection.is_none());
    }

    #[test]
    fn inspect_flags_unparseable_issue_date() {
        let codec = codec();
        let token = codec.encode(b"A001|Jane|R12|2025-01-01|whenever");

        let inspection = inspect(&codec, &token, None, date("2024-06-01"));
        assert_eq!(inspection.verdict, Verdict::INVALID_PAYLOAD);
    }

    #[test]
    fn inspect_denies_expired() {
        let codec = codec();
        let token = codec.encode(pass("2025-01-01").to_wire().as_bytes());

        let inspection = inspect(&codec, &token, None, date("2026-01-01"));
        assert_eq!(inspection.verdict, Verdict::Deny("expired"));
        assert!(inspection.payload.is_some());
    }
}
