//! Global constants used throughout the uplift codebase.
//!
//! Defaults for the release endpoints, timeouts and environment variable
//! names live here so they are discoverable in one place. Every URL and
//! program name can be overridden in the `[upgrade]` table of the
//! configuration file.

use std::time::Duration;

/// Name of the tool; also the file name of the scratch download.
pub const TOOL_NAME: &str = "uplift";

/// Release feed listing published versions, newest first.
pub const DEFAULT_RELEASES_URL: &str = "https://storage.googleapis.com/uplift-releases/releases.json";

/// Base URL under which `<version>/<artifact>` binaries are published.
pub const DEFAULT_DOWNLOAD_BASE_URL: &str = "https://storage.googleapis.com/uplift-releases/releases";

/// Helper used to retry a refused rename with elevated privileges.
pub const DEFAULT_ELEVATION_PROGRAM: &str = "sudo";

/// Timeout for release feed requests and for establishing download connections (30 seconds).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV_VAR: &str = "UPLIFT_CONFIG";

/// Environment variable that disables progress bars when set.
pub const NO_PROGRESS_ENV_VAR: &str = "UPLIFT_NO_PROGRESS";
