//! Issue command - sign a pass token

use crate::audit::AuditLog;
use crate::cli::args::{IssueArgs, OutputFormat};
use crate::config::Config;
use crate::error::TesseraResult;
use crate::token::TokenCodec;
use tracing::info;

/// Execute the issue command
pub async fn execute(args: IssueArgs, config: &Config, codec: &TokenCodec) -> TesseraResult<()> {
    let payload = args.pass.to_payload()?;
    let wire = payload.to_wire();
    let token = codec.encode(wire.as_bytes());

    info!(
        "Issued pass for {} valid through {}",
        payload.subject_id, payload.expiry_date
    );
    AuditLog::new(config).token_issued(&token, &payload).await;

    match args.format {
        OutputFormat::Json => {
            let body = serde_json::json!({
                "token": token,
                "payload": wire,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Table | OutputFormat::Plain => println!("{}", token),
    }

    Ok(())
}
