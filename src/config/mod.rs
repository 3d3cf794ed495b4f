//! Configuration management for Tessera

pub mod schema;

pub use schema::Config;

use crate::error::{TesseraError, TesseraResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Locates, loads and saves the Tessera config file
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Manager for the config file in the user's config dir
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Manager for an explicit config file (`--config` / `TESSERA_CONFIG`)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// `<config dir>/tessera/config.toml`
    pub fn default_config_path() -> PathBuf {
        Self::user_dir(dirs::config_dir()).join("config.toml")
    }

    /// `<state dir>/tessera`, falling back to the local data dir
    pub fn state_dir() -> PathBuf {
        Self::user_dir(dirs::state_dir().or_else(dirs::data_local_dir))
    }

    /// `<local data dir>/tessera/artifacts`
    pub fn default_artifacts_dir() -> PathBuf {
        Self::user_dir(dirs::data_local_dir()).join("artifacts")
    }

    fn user_dir(base: Option<PathBuf>) -> PathBuf {
        base.unwrap_or_else(|| PathBuf::from(".")).join("tessera")
    }

    /// Artifact directory from config, falling back to the default
    pub fn artifacts_dir(config: &Config) -> PathBuf {
        config
            .artifacts
            .dir
            .clone()
            .unwrap_or_else(Self::default_artifacts_dir)
    }

    pub fn audit_log_path() -> PathBuf {
        Self::state_dir().join("audit.log")
    }

    /// Load the config file; a missing file yields the defaults
    pub async fn load(&self) -> TesseraResult<Config> {
        let present = fs::try_exists(&self.config_path).await.unwrap_or(false);
        if !present {
            debug!(
                "No config at {}, using defaults",
                self.config_path.display()
            );
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Parse a config file, reporting the path on invalid TOML
    pub async fn load_from_file(&self, path: &Path) -> TesseraResult<Config> {
        let raw = fs::read_to_string(path)
            .await
            .map_err(|e| TesseraError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&raw).map_err(|e| TesseraError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Write `config` as TOML, creating the parent directory
    pub async fn save(&self, config: &Config) -> TesseraResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| TesseraError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let rendered = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, rendered).await.map_err(|e| {
            TesseraError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Wrote config to {}", self.config_path.display());
        Ok(())
    }

    /// Path this manager reads and writes
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
