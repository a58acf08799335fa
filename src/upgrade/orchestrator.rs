//! The self-upgrade sequence.
//!
//! [`Upgrader`] ties the pieces together: it compares the running version
//! against the newest published release, downloads the new binary to the
//! scratch path and hands it to the platform's [`BinarySwapper`]. Each step
//! runs once, in order, and the first failure aborts the run. Only
//! [`Upgrader::run`] takes a swapper; [`Upgrader::check`] works on any
//! platform.
//!
//! Progress is reported through a callback so the CLI decides how (and
//! whether) to print it.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::UpgradeError;
use crate::upgrade::download::ArtifactDownloader;
use crate::upgrade::releases::{ReleaseFetcher, latest_release};
use crate::upgrade::swap::{BinarySwapper, resolve_executable, validate_executable};
use crate::upgrade::version::{needs_upgrade, parse_tolerant};

/// Progress notifications emitted while an upgrade runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeEvent {
    /// The running version, reported before anything else.
    CurrentVersion(String),
    /// About to query the release feed.
    CheckingLatest,
    /// A newer release exists and will be installed.
    UpdateAvailable {
        /// Running version
        current: String,
        /// Newest published version
        latest: String,
    },
    /// The new binary is being downloaded.
    Downloading {
        /// Version being downloaded
        version: String,
        /// Scratch path receiving the binary
        destination: PathBuf,
    },
    /// The downloaded binary is replacing the executable.
    Installing {
        /// Path being replaced
        executable: PathBuf,
    },
}

/// Result of a successful [`Upgrader::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeOutcome {
    /// The running version is already the newest (or newer).
    UpToDate {
        /// Running version
        current: String,
        /// Newest published version
        latest: String,
    },
    /// The executable was replaced.
    Upgraded {
        /// Version that was running
        from: String,
        /// Version now installed
        to: String,
        /// Path that now holds the new binary
        executable: PathBuf,
    },
}

/// Result of [`Upgrader::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatus {
    /// Running version
    pub current: String,
    /// Newest published version, as listed in the feed
    pub latest: String,
    /// Whether `latest` is strictly newer than `current`
    pub upgrade_available: bool,
}

/// Drives a single upgrade attempt.
///
/// The fetcher and downloader are generic so tests can substitute in-memory
/// fakes; the swapper is chosen at runtime from the platform family and
/// passed to [`run`](Self::run).
pub struct Upgrader<F, D> {
    current_version: String,
    fetcher: F,
    downloader: D,
    scratch_path: PathBuf,
    executable: Option<PathBuf>,
}

impl<F: ReleaseFetcher, D: ArtifactDownloader> Upgrader<F, D> {
    /// Create an upgrader for the binary currently at `current_version`.
    ///
    /// The new binary is downloaded to `scratch_path`, which must not be the
    /// running executable.
    pub fn new(
        current_version: impl Into<String>,
        fetcher: F,
        downloader: D,
        scratch_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            current_version: current_version.into(),
            fetcher,
            downloader,
            scratch_path: scratch_path.into(),
            executable: None,
        }
    }

    /// Replace `path` instead of the running executable.
    #[must_use]
    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }

    /// The version this upgrader compares against.
    pub fn current_version(&self) -> &str {
        &self.current_version
    }

    /// Where the new binary is downloaded.
    pub fn scratch_path(&self) -> &Path {
        &self.scratch_path
    }

    /// Compare the running version with the newest release without
    /// downloading anything.
    ///
    /// # Errors
    ///
    /// Check-stage errors only: an unparsable version on either side, an
    /// unreachable feed or an empty release list.
    pub async fn check(
        &self,
        mut on_event: impl FnMut(&UpgradeEvent),
    ) -> Result<UpdateStatus, UpgradeError> {
        on_event(&UpgradeEvent::CurrentVersion(self.current_version.clone()));
        parse_tolerant(&self.current_version)?;

        on_event(&UpgradeEvent::CheckingLatest);
        let releases = self
            .fetcher
            .latest_releases()
            .await
            .map_err(UpgradeError::Fetch)?;
        let latest = latest_release(&releases)?.to_string();

        let upgrade_available = needs_upgrade(&self.current_version, &latest)?;
        debug!(
            "Current {}, latest {}, upgrade available: {}",
            self.current_version, latest, upgrade_available
        );

        Ok(UpdateStatus {
            current: self.current_version.clone(),
            latest,
            upgrade_available,
        })
    }

    /// Upgrade the executable to the newest release if it is out of date,
    /// installing it with `swapper`.
    ///
    /// # Errors
    ///
    /// Any [`UpgradeError`]; use [`UpgradeError::stage`] to tell how far the
    /// attempt got. Nothing is retried.
    pub async fn run(
        &self,
        swapper: &dyn BinarySwapper,
        mut on_event: impl FnMut(&UpgradeEvent),
    ) -> Result<UpgradeOutcome, UpgradeError> {
        let status = self.check(&mut on_event).await?;

        if !status.upgrade_available {
            info!("Already running the latest version ({})", status.current);
            return Ok(UpgradeOutcome::UpToDate {
                current: status.current,
                latest: status.latest,
            });
        }

        on_event(&UpgradeEvent::UpdateAvailable {
            current: status.current.clone(),
            latest: status.latest.clone(),
        });

        let executable = match &self.executable {
            Some(path) => validate_executable(path)?,
            None => resolve_executable()?,
        };
        self.ensure_distinct_scratch(&executable)?;

        on_event(&UpgradeEvent::Downloading {
            version: status.latest.clone(),
            destination: self.scratch_path.clone(),
        });
        self.downloader
            .fetch_binary(&status.latest, &self.scratch_path)
            .await
            .map_err(|source| UpgradeError::Download {
                version: status.latest.clone(),
                source,
            })?;

        on_event(&UpgradeEvent::Installing {
            executable: executable.clone(),
        });
        swapper.swap(&self.scratch_path, &executable)?;

        info!("Upgraded {} from {} to {}", executable.display(), status.current, status.latest);
        Ok(UpgradeOutcome::Upgraded {
            from: status.current,
            to: status.latest,
            executable,
        })
    }

    fn ensure_distinct_scratch(&self, executable: &Path) -> Result<(), UpgradeError> {
        let scratch = self
            .scratch_path
            .canonicalize()
            .unwrap_or_else(|_| self.scratch_path.clone());

        if scratch == executable {
            return Err(UpgradeError::StagingConflict { path: scratch });
        }
        Ok(())
    }
}
