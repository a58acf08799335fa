//! Error handling for uplift.
//!
//! The error system is split in two layers:
//!
//! 1. **Typed errors** - [`UpgradeError`] names every way a self-upgrade can
//!    fail. Library code returns it directly so callers can match on the
//!    failing step, and the underlying cause (I/O error, HTTP error, semver
//!    error) is always kept as the error source.
//! 2. **User-facing context** - [`ErrorContext`] wraps an error with the stage
//!    heading, optional details and an actionable suggestion. The CLI converts
//!    any [`anyhow::Error`] into an [`ErrorContext`] through
//!    [`user_friendly_error`] right before exiting.
//!
//! # Stages
//!
//! Every [`UpgradeError`] belongs to an [`UpgradeStage`], which lets the
//! operator tell "could not even check for updates" apart from "found an
//! update but failed to install it":
//!
//! | Stage      | Variants                                                         |
//! |------------|------------------------------------------------------------------|
//! | `Setup`    | `UnsupportedPlatform`                                            |
//! | `Check`    | `Parse`, `Fetch`, `EmptyReleaseList`                             |
//! | `Download` | `Download`, `StagingConflict`                                    |
//! | `Install`  | `ExecutableUnresolved`, `NotARegularFile`, `PermissionRead`,     |
//! |            | `PermissionApply`, `Rename`, `ElevatedMove`, `PartialUpgrade`    |
//!
//! # Examples
//!
//! ```rust,no_run
//! use uplift_cli::core::{UpgradeError, UpgradeStage, user_friendly_error};
//!
//! let error = UpgradeError::EmptyReleaseList;
//! assert_eq!(error.stage(), UpgradeStage::Check);
//!
//! let context = user_friendly_error(anyhow::Error::from(error));
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// The phase of an upgrade attempt in which an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpgradeStage {
    /// Preparing to upgrade, before the release feed is contacted.
    Setup,
    /// Determining the current and latest versions.
    Check,
    /// Retrieving and verifying the new binary.
    Download,
    /// Replacing the running executable.
    Install,
}

impl UpgradeStage {
    /// Short operator-facing description of what failed.
    #[must_use]
    pub const fn headline(self) -> &'static str {
        match self {
            Self::Setup => "could not prepare the upgrade",
            Self::Check => "could not check for updates",
            Self::Download => "found an update but could not download it",
            Self::Install => "found an update but could not install it",
        }
    }
}

impl fmt::Display for UpgradeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Setup => "setup",
            Self::Check => "check",
            Self::Download => "download",
            Self::Install => "install",
        };
        f.write_str(name)
    }
}

/// Failure while retrieving the release list.
#[derive(Error, Debug)]
pub enum FetchFailure {
    /// The request could not be sent or the body could not be decoded.
    #[error("request to {url} failed")]
    Request {
        /// Release feed URL
        url: String,
        /// Underlying HTTP client error
        #[source]
        source: reqwest::Error,
    },

    /// The release feed answered with a non-success status code.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// Release feed URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// The body was not a release feed.
    #[error("{url} did not return a valid release feed")]
    Decode {
        /// Release feed URL
        url: String,
        /// JSON decoding error
        #[source]
        source: serde_json::Error,
    },
}

/// Failure while retrieving or verifying a release artifact.
#[derive(Error, Debug)]
pub enum DownloadFailure {
    /// The HTTP transfer failed.
    #[error("request to {url} failed")]
    Request {
        /// Artifact or checksum URL
        url: String,
        /// Underlying HTTP client error
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status code.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// Artifact or checksum URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Writing the artifact to disk failed.
    #[error("failed to write {}", path.display())]
    Io {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The published checksum file did not contain a digest.
    #[error("checksum file at {url} is empty or malformed")]
    MalformedChecksum {
        /// Checksum URL
        url: String,
    },

    /// The downloaded bytes do not hash to the published digest.
    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Published digest
        expected: String,
        /// Digest of the downloaded file
        actual: String,
    },
}

/// Failure of the privilege-escalation helper.
#[derive(Error, Debug)]
pub enum ElevationFailure {
    /// The helper program is not installed or not on `PATH`.
    #[error("helper not found on PATH")]
    NotFound(#[source] which::Error),

    /// The helper program could not be started at all.
    #[error("could not launch the helper")]
    Spawn(#[source] io::Error),

    /// The helper ran but reported failure.
    #[error("helper exited with {0}")]
    Status(ExitStatus),
}

/// Every way a self-upgrade attempt can fail.
///
/// None of these errors is retried automatically. [`PartialUpgrade`] and
/// [`ElevatedMove`] additionally mean the installation may need manual
/// attention, see [`requires_manual_recovery`].
///
/// [`PartialUpgrade`]: UpgradeError::PartialUpgrade
/// [`ElevatedMove`]: UpgradeError::ElevatedMove
/// [`requires_manual_recovery`]: UpgradeError::requires_manual_recovery
#[derive(Error, Debug)]
pub enum UpgradeError {
    /// A version string could not be parsed, even tolerantly.
    #[error("unable to parse version {input:?}")]
    Parse {
        /// The rejected input
        input: String,
        /// Parser error
        #[source]
        source: semver::Error,
    },

    /// The release list could not be fetched.
    #[error("unable to fetch latest version info")]
    Fetch(#[source] FetchFailure),

    /// The release feed was reachable but listed no releases.
    #[error("update server returned an empty release list")]
    EmptyReleaseList,

    /// The artifact for the new version could not be retrieved or verified.
    #[error("unable to download version {version}")]
    Download {
        /// Version being downloaded
        version: String,
        /// What went wrong
        #[source]
        source: DownloadFailure,
    },

    /// The scratch download path is the running executable itself.
    #[error("download location {} is the running executable", path.display())]
    StagingConflict {
        /// The shared path
        path: PathBuf,
    },

    /// The path of the running executable could not be determined.
    #[error("unable to resolve the path of the running executable")]
    ExecutableUnresolved(#[source] io::Error),

    /// The running executable does not resolve to a regular file.
    #[error("{} is not a regular file", path.display())]
    NotARegularFile {
        /// Resolved executable path
        path: PathBuf,
    },

    /// Permissions of the current executable could not be read.
    #[error("unable to read permissions of {}", path.display())]
    PermissionRead {
        /// Current executable
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Permissions could not be applied to the staged binary.
    #[error("unable to apply permissions to {}", path.display())]
    PermissionApply {
        /// Staged binary
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A rename failed and the executable was not replaced.
    #[error("unable to rename {} to {}", from.display(), to.display())]
    Rename {
        /// Rename source
        from: PathBuf,
        /// Rename destination
        to: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The rename was retried through the elevation helper and that failed.
    #[error("elevated move of {} to {} via `{program}` failed", staged.display(), target.display())]
    ElevatedMove {
        /// Helper program, e.g. `sudo`
        program: String,
        /// Staged binary
        staged: PathBuf,
        /// Current executable
        target: PathBuf,
        /// How the helper failed
        #[source]
        source: ElevationFailure,
    },

    /// The old binary was moved aside but the new one could not be placed.
    #[error(
        "partial upgrade: {} was moved to {} but {} could not be installed in its place",
        target.display(),
        relocated.display(),
        staged.display()
    )]
    PartialUpgrade {
        /// Staged binary that could not be moved
        staged: PathBuf,
        /// Original executable path, now empty
        target: PathBuf,
        /// Where the previous binary now lives
        relocated: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The host platform family has no swap strategy.
    #[error("unsupported platform: {platform}")]
    UnsupportedPlatform {
        /// Detected operating system name
        platform: String,
    },
}

impl UpgradeError {
    /// The stage this error belongs to.
    #[must_use]
    pub const fn stage(&self) -> UpgradeStage {
        match self {
            Self::UnsupportedPlatform { .. } => UpgradeStage::Setup,
            Self::Parse { .. } | Self::Fetch(_) | Self::EmptyReleaseList => UpgradeStage::Check,
            Self::Download { .. } | Self::StagingConflict { .. } => UpgradeStage::Download,
            Self::ExecutableUnresolved(_)
            | Self::NotARegularFile { .. }
            | Self::PermissionRead { .. }
            | Self::PermissionApply { .. }
            | Self::Rename { .. }
            | Self::ElevatedMove { .. }
            | Self::PartialUpgrade { .. } => UpgradeStage::Install,
        }
    }

    /// Whether the installation may be left in a state that needs an operator.
    #[must_use]
    pub const fn requires_manual_recovery(&self) -> bool {
        matches!(self, Self::PartialUpgrade { .. } | Self::ElevatedMove { .. })
    }
}

/// An error prepared for display, with optional details and a suggestion.
#[derive(Debug)]
pub struct ErrorContext {
    /// Main error message, including the cause chain
    pub message: String,
    /// Stage heading, when the error came from an upgrade attempt
    pub stage: Option<UpgradeStage>,
    /// Optional additional details about the error
    pub details: Option<String>,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
}

impl ErrorContext {
    /// Create a context holding only a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stage: None,
            details: None,
            suggestion: None,
        }
    }

    /// Attach the stage the error occurred in.
    #[must_use]
    pub fn with_stage(mut self, stage: UpgradeStage) -> Self {
        self.stage = Some(stage);
        self
    }

    /// Add additional details explaining the error.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Add a suggestion for resolving the error.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Print the context to stderr with terminal colors.
    ///
    /// - Stage heading and error message: red and bold
    /// - Details: yellow
    /// - Suggestion: green
    pub fn display(&self) {
        if let Some(stage) = self.stage {
            eprintln!("{}: {}", "error".red().bold(), stage.headline().red().bold());
            eprintln!("  {}", self.message);
        } else {
            eprintln!("{}: {}", "error".red().bold(), self.message);
        }

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(stage) = self.stage {
            write!(f, "{}: ", stage.headline())?;
        }
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with actionable suggestions.
///
/// The whole cause chain is rendered into the message so the original
/// cause is never lost. When an [`UpgradeError`] is found anywhere in the
/// chain, the stage heading, details and a suggestion specific to that
/// failure are attached.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let message = format!("{error:#}");

    let Some(upgrade_error) = error.chain().find_map(|e| e.downcast_ref::<UpgradeError>()) else {
        if let Some(toml_error) = error.chain().find_map(|e| e.downcast_ref::<toml::de::Error>()) {
            return ErrorContext::new(message)
                .with_details(toml_error.message().to_string())
                .with_suggestion("Fix the syntax of the configuration file or remove it to use defaults");
        }
        return ErrorContext::new(message);
    };

    let context = ErrorContext::new(message).with_stage(upgrade_error.stage());

    match upgrade_error {
        UpgradeError::Parse { .. } => context
            .with_details("Version strings must look like 1.2.3, optionally prefixed (v1.2.3)"),
        UpgradeError::Fetch(_) => context
            .with_suggestion("Check your network connection and the `upgrade.releases_url` setting"),
        UpgradeError::EmptyReleaseList => context
            .with_details("The release feed was reachable but did not list any release")
            .with_suggestion("Check the `upgrade.releases_url` setting"),
        UpgradeError::Download { source, .. } => match source {
            DownloadFailure::ChecksumMismatch { .. } | DownloadFailure::MalformedChecksum { .. } => {
                context
                    .with_details("The downloaded binary did not match its published checksum")
                    .with_suggestion("Run the upgrade again; if it keeps failing, report the release")
            }
            _ => context.with_suggestion("Check your network connection and try again"),
        },
        UpgradeError::StagingConflict { .. } => context
            .with_suggestion("Set `upgrade.scratch_dir` to a directory other than the install directory"),
        UpgradeError::ExecutableUnresolved(_) | UpgradeError::NotARegularFile { .. } => context
            .with_suggestion("Reinstall uplift manually from the release page"),
        UpgradeError::PermissionRead { .. } | UpgradeError::PermissionApply { .. } => context
            .with_details("The running binary was left untouched"),
        UpgradeError::Rename { source, .. } if source.kind() == io::ErrorKind::CrossesDevices => {
            context
                .with_details("The download directory is on a different filesystem than the executable")
                .with_suggestion(
                    "Set `upgrade.scratch_dir` to a directory on the same filesystem as the executable",
                )
        }
        UpgradeError::Rename { .. } => context.with_details("The running binary was left untouched"),
        UpgradeError::ElevatedMove { staged, target, .. } => context
            .with_details("The new version was downloaded but the executable still holds the old one")
            .with_suggestion(format!(
                "Move it into place manually: mv {} {}",
                staged.display(),
                target.display()
            )),
        UpgradeError::PartialUpgrade { target, relocated, .. } => context
            .with_details(format!(
                "No executable is installed at {}; the previous version is at {}",
                target.display(),
                relocated.display()
            ))
            .with_suggestion(format!(
                "Rename {} back to {} to restore the previous version",
                relocated.display(),
                target.display()
            )),
        UpgradeError::UnsupportedPlatform { .. } => context
            .with_suggestion("Download the new release manually for this platform"),
    }
}
