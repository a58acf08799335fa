use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_DOWNLOAD_BASE_URL, DEFAULT_ELEVATION_PROGRAM, DEFAULT_RELEASES_URL,
    DEFAULT_REQUEST_TIMEOUT,
};

/// Settings for `uplift upgrade`, read from the `[upgrade]` table of the
/// global configuration file.
///
/// Every field is optional in the file; missing fields fall back to the
/// defaults below.
///
/// ## TOML Example
/// ```toml
/// [upgrade]
/// releases_url = "https://mirror.example.com/uplift/releases.json"
/// download_base_url = "https://mirror.example.com/uplift/releases"
/// elevation_program = "doas"
/// verify_checksum = true
/// scratch_dir = "/var/tmp"
/// request_timeout_secs = 60
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeConfig {
    /// Release feed listing published versions, newest first.
    #[serde(default = "default_releases_url")]
    pub releases_url: String,

    /// Base URL under which `<version>/<artifact>` binaries are published.
    #[serde(default = "default_download_base_url")]
    pub download_base_url: String,

    /// Program used to retry a refused rename on POSIX systems.
    ///
    /// It is invoked as `<program> mv <staged> <target>` and inherits the
    /// terminal so it can prompt for a password.
    #[serde(default = "default_elevation_program")]
    pub elevation_program: String,

    /// Whether to check downloads against their published SHA-256.
    #[serde(default = "default_verify_checksum")]
    pub verify_checksum: bool,

    /// Directory receiving the downloaded binary.
    ///
    /// Defaults to the system temporary directory. The final install step is
    /// a rename, so this must be on the same filesystem as the executable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scratch_dir: Option<PathBuf>,

    /// Timeout for the release feed request and for establishing the download
    /// connection, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self {
            releases_url: default_releases_url(),
            download_base_url: default_download_base_url(),
            elevation_program: default_elevation_program(),
            verify_checksum: default_verify_checksum(),
            scratch_dir: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_releases_url() -> String {
    DEFAULT_RELEASES_URL.to_string()
}

fn default_download_base_url() -> String {
    DEFAULT_DOWNLOAD_BASE_URL.to_string()
}

fn default_elevation_program() -> String {
    DEFAULT_ELEVATION_PROGRAM.to_string()
}

const fn default_verify_checksum() -> bool {
    true
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_secs()
}

impl UpgradeConfig {
    /// Directory the new binary is downloaded to.
    #[must_use]
    pub fn scratch_dir(&self) -> PathBuf {
        self.scratch_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Reject settings that can never work.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.releases_url.trim().is_empty() {
            return Err("upgrade.releases_url must not be empty".to_string());
        }
        if self.download_base_url.trim().is_empty() {
            return Err("upgrade.download_base_url must not be empty".to_string());
        }
        if self.elevation_program.trim().is_empty() {
            return Err("upgrade.elevation_program must not be empty".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("upgrade.request_timeout_secs must be greater than zero".to_string());
        }
        Ok(())
    }
}
