//! Global configuration management for uplift.
//!
//! The configuration file is optional. When it is missing every setting takes
//! its default, so a fresh install can upgrade itself without any setup.
//!
//! # Configuration File Location
//!
//! The first of these that is set wins:
//!
//! 1. the `--config <path>` command-line flag
//! 2. the `UPLIFT_CONFIG` environment variable (bound to `--config` by the CLI)
//! 3. the platform default:
//!    - **Unix/macOS**: `~/.uplift/config.toml`
//!    - **Windows**: `%LOCALAPPDATA%\uplift\config.toml`
//!
//! # File Format
//!
//! ```toml
//! [upgrade]
//! releases_url = "https://mirror.example.com/uplift/releases.json"
//! download_base_url = "https://mirror.example.com/uplift/releases"
//! elevation_program = "doas"
//! scratch_dir = "/opt/tools/.staging"
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use uplift_cli::config::GlobalConfig;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = GlobalConfig::load_with_optional(None).await?;
//! println!("Releases from {}", config.upgrade.releases_url);
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::upgrade::config::UpgradeConfig;

/// Global configuration structure for uplift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GlobalConfig {
    /// Settings for `uplift upgrade`.
    #[serde(default)]
    pub upgrade: UpgradeConfig,
}

impl GlobalConfig {
    /// Load configuration from `path`, or from the default location when no
    /// path is given.
    ///
    /// A missing file yields the default configuration. An explicitly given
    /// path that does not exist is treated the same way.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file exists but cannot be read
    /// - The file contains invalid TOML syntax
    /// - A setting has an unusable value (e.g. a zero timeout)
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = Self::resolve_path(path)?;
        if path.exists() {
            Self::load_from(&path).await
        } else {
            debug!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load global configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read (permissions, not found, etc.)
    /// - The file contains invalid TOML syntax
    /// - The TOML structure doesn't match the expected schema
    /// - A setting has an unusable value
    pub async fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());

        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read global config from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse global config from {}", path.display()))?;

        config
            .upgrade
            .validate()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Invalid global config in {}", path.display()))?;

        Ok(config)
    }

    /// Get the default file path for global configuration.
    ///
    /// - **Windows**: `%LOCALAPPDATA%\uplift\config.toml`
    /// - **Unix/macOS**: `~/.uplift/config.toml`
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory (or the local data directory on
    /// Windows) cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("uplift")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".uplift")
        };

        Ok(config_dir.join("config.toml"))
    }

    fn resolve_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
        match explicit {
            Some(path) => Ok(path),
            None => Self::default_path(),
        }
    }
}
