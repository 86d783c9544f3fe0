//! Config file port

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Persistent store for the user's [`AppConfig`]
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Read the stored config. A missing file yields [`AppConfig::empty`].
    async fn load(&self) -> Result<AppConfig, ConfigError>;

    /// Write `config`, creating parent directories
    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError>;

    fn path(&self) -> PathBuf;

    fn exists(&self) -> bool;

    /// Write the defaults. Fails with [`ConfigError::AlreadyExists`].
    async fn init(&self) -> Result<(), ConfigError>;

    /// Like [`load`](Self::load), but an unreadable or malformed file only
    /// logs a warning and contributes nothing to the merge
    async fn load_or_empty(&self) -> AppConfig {
        match self.load().await {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %self.path().display(), "Ignoring config file: {}", e);
                AppConfig::empty()
            }
        }
    }
}
