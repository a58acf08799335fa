//! uplift - a command-line tool that keeps itself up to date.
//!
//! `uplift upgrade` compares the running version with the newest entry of a
//! release feed and, when a newer release exists, downloads the binary for the
//! current platform and puts it in place of the running executable.
//!
//! # Architecture Overview
//!
//! - [`upgrade`] - the self-upgrade protocol: version comparison, release
//!   discovery, artifact download and verification, and the per-platform
//!   binary swap, driven by [`upgrade::Upgrader`]
//! - [`config`] - the optional global configuration file
//! - [`cli`] - argument parsing, logging setup and command dispatch
//! - [`core`] - the error taxonomy and its user-facing presentation
//! - [`utils`] - progress bars
//! - [`constants`] - default endpoints and environment variable names
//!
//! # Platform Support
//!
//! - **Linux, macOS**: the new binary is renamed over the old one. If the
//!   install directory is not writable, the rename is retried through
//!   `sudo mv` (configurable).
//! - **Windows**: a running executable cannot be overwritten, so it is first
//!   renamed to `<name>.old` and the new binary takes its place.
//!
//! Other platforms are rejected before anything is downloaded.

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod upgrade;
pub mod utils;

#[cfg(test)]
pub mod test_utils;
