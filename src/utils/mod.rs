//! Terminal helpers shared by the CLI and the downloader.
//!
//! # Modules
//!
//! - [`progress`] - Download progress bars that respect `--no-progress`,
//!   `--quiet` and the `UPLIFT_NO_PROGRESS` environment variable

pub mod progress;
