//! src/config.rs
//! ============================================================================
//! # Config: Application Configuration Loader and Saver
//!
//! User-editable settings for the document exchange client, stored as TOML
//! in the platform config directory located with
//! [`directories`](https://docs.rs/directories).
//!
//! ## Example
//! ```rust,ignore
//! let config = Config::load().await?;
//! config.save().await?;
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use stagr::StagingConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use tokio::fs as TokioFs;

use crate::error::AppError;

/// App theme (color scheme) selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,

    Light,

    Dark,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is not set
    pub level: String,

    /// Directory for the daily rolling log files
    pub directory: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: PathBuf::from("logs"),
        }
    }
}

/// Main configuration struct for the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub theme: Theme,

    /// How long info/success notifications stay on screen
    #[serde(with = "humantime_serde")]
    pub notification_timeout: Duration,

    /// Organization shown in the sidebar header
    pub organization: String,

    /// Signed-in user shown in the sidebar footer
    pub user_name: String,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Upload policy and staging behaviour of the add-document form
    #[serde(default)]
    pub staging: StagingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::Default,
            notification_timeout: Duration::from_secs(3),
            organization: "ИП Дмитриев".to_string(),
            user_name: "Дмитрий Дмитриев".to_string(),
            logging: LoggingConfig::default(),
            staging: StagingConfig::default(),
        }
    }
}

impl Config {
    /// Loads config from the platform config dir, creating it with defaults
    /// when it does not exist yet.
    ///
    /// The config is expected at `$XDG_CONFIG_HOME/docflow/config.toml`
    /// (Linux), or equivalent on Windows/macOS.
    pub async fn load() -> Result<Self, AppError> {
        let path = Self::config_path()?;
        Self::load_from(&path).await
    }

    /// Load from an explicit path; writes defaults there if it is missing.
    pub async fn load_from(path: &Path) -> Result<Self, AppError> {
        if TokioFs::try_exists(path).await.unwrap_or(false) {
            info!("Loading config from {}", path.display());
            let text = TokioFs::read_to_string(path)
                .await
                .map_err(|source| AppError::ConfigIo {
                    path: path.to_path_buf(),
                    source,
                })?;
            let cfg: Self = toml::from_str(&text)?;

            Ok(cfg)
        } else {
            info!(
                "No config file found at {}, using default configuration. Creating it now.",
                path.display()
            );

            let default_config = Self::default();
            default_config.save_to(path).await?;

            Ok(default_config)
        }
    }

    /// Saves config to the platform config dir.
    pub async fn save(&self) -> Result<(), AppError> {
        let path = Self::config_path()?;
        self.save_to(&path).await
    }

    pub async fn save_to(&self, path: &Path) -> Result<(), AppError> {
        info!("Saving config to {}", path.display());

        let io_err = |source: std::io::Error| AppError::ConfigIo {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            TokioFs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        TokioFs::write(path, toml_str).await.map_err(io_err)?;

        Ok(())
    }

    /// Returns the canonical config file path using `directories::ProjectDirs`.
    pub fn config_path() -> Result<PathBuf, AppError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn config_dir() -> Result<PathBuf, AppError> {
        let proj_dirs =
            ProjectDirs::from("org", "docflow", "docflow").ok_or(AppError::ConfigDirUnavailable)?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagr::PolicyMode;

    #[tokio::test]
    async fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).await.expect("load defaults");
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn saved_config_loads_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.theme = Theme::Dark;
        config.notification_timeout = Duration::from_millis(1500);
        config.staging.policy.mode = PolicyMode::Enforced;
        config.save_to(&path).await.expect("save");

        let text = std::fs::read_to_string(&path).expect("read back");
        assert!(text.contains("notification_timeout = \"1s 500ms\""));

        let loaded = Config::load_from(&path).await.expect("load");
        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "theme = 42").expect("write");

        let result = Config::load_from(&path).await;
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
