//! Artifact command - get or create the QR code for a pass

use crate::audit::AuditLog;
use crate::cache::ArtifactCache;
use crate::cli::args::ArtifactArgs;
use crate::config::{Config, ConfigManager};
use crate::error::{TesseraError, TesseraResult};
use crate::render::QrRenderer;
use crate::store::FsBlobStore;
use crate::token::TokenCodec;
use std::sync::Arc;
use tokio::fs;

/// Execute the artifact command
pub async fn execute(
    args: ArtifactArgs,
    config: &Config,
    codec: &TokenCodec,
) -> TesseraResult<()> {
    let payload = args.pass.to_payload()?;
    let token = codec.encode(payload.to_wire().as_bytes());

    let store = Arc::new(FsBlobStore::open(ConfigManager::artifacts_dir(config)).await?);
    let cache = ArtifactCache::new(store.clone(), config.artifacts.extension.as_str());
    let renderer = Arc::new(QrRenderer::from_config(&config.artifacts));

    let artifact = cache
        .get_or_render(&payload.subject_id, &token, renderer)
        .await?;
    if artifact.created {
        AuditLog::new(config).token_issued(&token, &payload).await;
    }

    if let Some(out) = &args.out {
        fs::write(out, &artifact.bytes)
            .await
            .map_err(|e| TesseraError::io(format!("writing {}", out.display()), e))?;
    }

    let path = store.path_for(&cache.storage_key(&payload.subject_id))?;
    println!("{}", path.display());
    Ok(())
}
