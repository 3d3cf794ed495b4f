//! Audit logging for token events
//!
//! Writes JSON lines to `<state dir>/tessera/audit.log`. Records name the
//! token by fingerprint only. Rejections keep the specific failure kind here
//! even though verifiers only ever see "untrusted-token".

use crate::config::{schema::Config, ConfigManager};
use crate::error::TokenError;
use crate::pass::{PassPayload, Verdict};
use crate::token::fingerprint;
use chrono::Utc;
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// File-based audit logger that appends JSON lines
pub struct AuditLog {
    enabled: bool,
    path: PathBuf,
}

impl AuditLog {
    /// Create a new audit logger from config
    pub fn new(config: &Config) -> Self {
        Self {
            enabled: config.general.audit_log,
            path: ConfigManager::audit_log_path(),
        }
    }

    /// Create an audit logger writing to a specific file
    pub fn with_path(path: PathBuf, enabled: bool) -> Self {
        Self { enabled, path }
    }

    /// Record a newly issued token
    pub async fn token_issued(&self, token: &str, payload: &PassPayload) {
        self.log(
            "token.issued",
            &serde_json::json!({
                "token": fingerprint(token),
                "subject": payload.subject_id,
                "route": payload.route_id,
                "expires": payload.expiry_date.to_string(),
            }),
        )
        .await;
    }

    /// Record a token that failed decoding or verification
    pub async fn token_rejected(&self, token: &str, error: TokenError) {
        self.log(
            "token.rejected",
            &serde_json::json!({
                "token": fingerprint(token),
                "kind": error.kind(),
            }),
        )
        .await;
    }

    /// Record the verdict for an authentic token
    pub async fn token_verified(&self, token: &str, subject: Option<&str>, verdict: &Verdict) {
        self.log(
            "token.verified",
            &serde_json::json!({
                "token": fingerprint(token),
                "subject": subject,
                "result": verdict.result(),
                "reason": verdict.reason(),
            }),
        )
        .await;
    }

    /// Log an audit event as a JSON line
    ///
    /// Silently drops events on IO failure; audit logging must never block
    /// issuing or verifying.
    pub async fn log(&self, event: &str, data: &serde_json::Value) {
        if !self.enabled {
            return;
        }

        let entry = serde_json::json!({
            "timestamp": Utc::now().to_rfc3339(),
            "event": event,
            "data": data,
        });

        let mut line = match serde_json::to_string(&entry) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to serialize audit event: {}", e);
                return;
            }
        };
        line.push('\n');

        if let Err(e) = self.append(&line).await {
            warn!("Failed to write audit log: {}", e);
        }
    }

    async fn append(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn test_audit_log(dir: &TempDir, enabled: bool) -> AuditLog {
        AuditLog::with_path(dir.path().join("audit.log"), enabled)
    }

    async fn read_lines(audit: &AuditLog) -> Vec<serde_json::Value> {
        let content = tokio::fs::read_to_string(&audit.path).await.unwrap();
        content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn writes_json_line() {
        let dir = TempDir::new().unwrap();
        let audit = test_audit_log(&dir, true);

        audit
            .log("token.issued", &serde_json::json!({"subject": "A001"}))
            .await;

        let lines = read_lines(&audit).await;
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["event"], "token.issued");
        assert_eq!(lines[0]["data"]["subject"], "A001");
        assert!(lines[0]["timestamp"].is_string());
    }

    #[tokio::test]
    async fn records_never_contain_token() {
        let dir = TempDir::new().unwrap();
        let audit = test_audit_log(&dir, true);
        let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let payload = PassPayload::new("A001", "Jane", "R12", day, day).unwrap();
        let token = "QTAwMXxKYW5l.c2lnbmF0dXJl";

        audit.token_issued(token, &payload).await;
        audit.token_rejected(token, TokenError::Signature).await;
        audit
            .token_verified(token, Some("A001"), &Verdict::Deny("expired"))
            .await;

        let content = tokio::fs::read_to_string(&audit.path).await.unwrap();
        assert!(!content.contains(token));

        let lines = read_lines(&audit).await;
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["data"]["token"], fingerprint(token));
        assert_eq!(lines[1]["data"]["kind"], "signature");
        assert_eq!(lines[2]["data"]["result"], "DENY");
        assert_eq!(lines[2]["data"]["reason"], "expired");
    }

    #[tokio::test]
    async fn skips_when_disabled() {
        let dir = TempDir::new().unwrap();
        let audit = test_audit_log(&dir, false);

        audit.log("should.not.appear", &serde_json::json!({})).await;

        assert!(!audit.path.exists());
    }
}
