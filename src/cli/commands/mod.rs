//! CLI command implementations

pub mod artifact;
pub mod config;
pub mod issue;
pub mod list;
pub mod verify;

pub use artifact::execute as artifact;
pub use config::execute as config;
pub use issue::execute as issue;
pub use list::execute as list;
pub use verify::execute as verify;

use crate::config::Config;
use crate::error::TesseraResult;
use crate::token::{Secret, TokenCodec};
use console::style;

/// Resolve the signing secret once and build the codec
pub fn codec(config: &Config, secret: Option<&str>) -> TesseraResult<TokenCodec> {
    let secret = Secret::resolve(secret, config.secret.allow_insecure_default)?;
    if secret.is_development() {
        eprintln!(
            "{} Signing with the development key, do not hand these tokens out",
            style("[WARN]").yellow()
        );
    }
    Ok(TokenCodec::new(secret))
}
