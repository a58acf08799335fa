//! Host platform detection.
//!
//! The swap protocol depends only on the platform *family*: Windows cannot
//! overwrite a running executable, POSIX systems can rename over it safely.
//! Release artifacts, on the other hand, are named after the exact operating
//! system and CPU architecture.

use std::fmt;

/// Platform families with distinct binary-replacement semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformFamily {
    /// Running executables may be renamed but not overwritten or deleted.
    Windows,
    /// Renaming over a running executable keeps the old inode alive.
    Posix,
    /// No swap strategy is known; carries the detected OS name.
    Unsupported(String),
}

impl PlatformFamily {
    /// Classify an operating system name as reported by
    /// [`std::env::consts::OS`].
    #[must_use]
    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => Self::Windows,
            "linux" | "macos" => Self::Posix,
            other => Self::Unsupported(other.to_string()),
        }
    }

    /// Family of the platform this binary was built for.
    #[must_use]
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }
}

impl fmt::Display for PlatformFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Windows => f.write_str("windows"),
            Self::Posix => f.write_str("posix"),
            Self::Unsupported(os) => write!(f, "unsupported ({os})"),
        }
    }
}

/// Operating system name as used in release artifact file names.
#[must_use]
pub fn artifact_os(os: &str) -> &str {
    match os {
        "macos" => "darwin",
        other => other,
    }
}

/// CPU architecture name as used in release artifact file names.
#[must_use]
pub fn artifact_arch(arch: &str) -> &str {
    match arch {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        "powerpc64" => "ppc64le",
        other => other,
    }
}

/// File name of the release artifact for a tool on a given platform.
///
/// ```rust
/// use uplift_cli::upgrade::platform::artifact_name;
///
/// assert_eq!(artifact_name("uplift", "macos", "aarch64"), "uplift-darwin-arm64");
/// assert_eq!(artifact_name("uplift", "windows", "x86_64"), "uplift-windows-amd64.exe");
/// ```
#[must_use]
pub fn artifact_name(tool: &str, os: &str, arch: &str) -> String {
    let suffix = if os == "windows" { ".exe" } else { "" };
    format!("{tool}-{}-{}{suffix}", artifact_os(os), artifact_arch(arch))
}
