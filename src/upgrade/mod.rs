//! Self-upgrade functionality for uplift.
//!
//! This module replaces the running `uplift` binary with the newest published
//! release. The work is split into small pieces that can be tested in
//! isolation and swapped for fakes:
//!
//! - [`config`]: the `[upgrade]` table of the configuration file
//! - [`version`]: tolerant semantic-version parsing and the upgrade decision
//! - [`releases`]: the [`ReleaseFetcher`] seam and the HTTP release feed client
//! - [`download`]: the [`ArtifactDownloader`] seam and the HTTP artifact client
//! - [`verification`]: SHA-256 checks of downloaded artifacts
//! - [`platform`]: platform family detection and artifact naming
//! - [`swap`]: per-platform [`BinarySwapper`] strategies
//! - [`orchestrator`]: the [`Upgrader`] that runs the steps in order
//!
//! # Update Process Flow
//!
//! ```text
//! 1. Check
//!    ├── Parse the running version
//!    ├── Fetch the release feed (newest first)
//!    └── Compare against the first entry; stop if not strictly newer
//!
//! 2. Download
//!    ├── Fetch <artifact>.sha256
//!    ├── Stream the binary to the scratch path
//!    └── Verify the digest
//!
//! 3. Install
//!    ├── POSIX: copy permissions, rename, retry through the elevation helper
//!    │          if the rename is refused
//!    └── Windows: move the running binary to <name>.old, then rename
//! ```
//!
//! Nothing is retried automatically and no backup is taken: the POSIX rename
//! is atomic, and on Windows the previous binary survives as `<name>.old`.
//! An interrupted Windows swap is reported as
//! [`UpgradeError::PartialUpgrade`](crate::core::UpgradeError::PartialUpgrade)
//! together with the paths needed to recover by hand.
//!
//! # Concurrency
//!
//! Two upgrades running at the same time share the scratch path and are not
//! coordinated; the last rename wins.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use uplift_cli::upgrade::{
//!     HttpArtifactDownloader, HttpReleaseFetcher, Upgrader, scratch_path, swapper_for,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let fetcher = HttpReleaseFetcher::new(
//!     "https://example.com/releases.json",
//!     Duration::from_secs(30),
//! )?;
//! let downloader = HttpArtifactDownloader::new(
//!     "https://example.com/releases",
//!     Duration::from_secs(30),
//! )?;
//! let swapper = swapper_for(std::env::consts::OS, "sudo")?;
//! let scratch = scratch_path(&std::env::temp_dir());
//!
//! let upgrader = Upgrader::new(env!("CARGO_PKG_VERSION"), fetcher, downloader, scratch);
//! let outcome = upgrader.run(swapper.as_ref(), |event| println!("{event:?}")).await?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod download;
pub mod orchestrator;
pub mod platform;
pub mod releases;
pub mod swap;
pub mod verification;
pub mod version;

pub use config::UpgradeConfig;
pub use download::{ArtifactDownloader, HttpArtifactDownloader, scratch_path};
pub use orchestrator::{UpdateStatus, UpgradeEvent, UpgradeOutcome, Upgrader};
pub use platform::PlatformFamily;
pub use releases::{HttpReleaseFetcher, ReleaseFetcher};
pub use swap::{BinarySwapper, swapper_for};
pub use verification::ChecksumVerifier;
