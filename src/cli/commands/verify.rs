//! Verify command - check a token and decide admission

use crate::audit::AuditLog;
use crate::cli::args::{today, VerifyArgs};
use crate::config::Config;
use crate::error::TesseraResult;
use crate::pass::inspect;
use crate::token::TokenCodec;

/// Execute the verify command, returning whether the bearer is admitted
pub async fn execute(args: VerifyArgs, config: &Config, codec: &TokenCodec) -> TesseraResult<bool> {
    let day = args.today.unwrap_or_else(today);
    let inspection = inspect(codec, &args.token, args.route.as_deref(), day);
    let audit = AuditLog::new(config);

    match inspection.rejection {
        Some(kind) => audit.token_rejected(&args.token, kind).await,
        None => {
            let subject = inspection.payload.as_ref().map(|p| p.subject_id.as_str());
            audit
                .token_verified(&args.token, subject, &inspection.verdict)
                .await
        }
    }

    let verdict = &inspection.verdict;
    let mut body = serde_json::json!({
        "result": verdict.result(),
        "reason": verdict.reason(),
    });
    if let Some(payload) = &inspection.payload {
        body["subject"] = payload.subject_id.clone().into();
        body["name"] = payload.display_name.clone().into();
    }
    println!("{}", serde_json::to_string_pretty(&body)?);

    Ok(verdict.is_allow())
}
