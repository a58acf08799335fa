//! Core types for uplift
//!
//! This module holds the error taxonomy shared by every part of the upgrade
//! pipeline:
//! - **Strongly-typed errors** ([`UpgradeError`]) for precise handling in code,
//!   with nested causes ([`FetchFailure`], [`DownloadFailure`],
//!   [`ElevationFailure`])
//! - **Stage classification** ([`UpgradeStage`]) so operators can tell a failed
//!   check apart from a failed install
//! - **User-friendly contexts** ([`ErrorContext`]) with details and suggestions
//!   for CLI users, built by [`user_friendly_error`]

pub mod error;

pub use error::{
    DownloadFailure, ElevationFailure, ErrorContext, FetchFailure, UpgradeError, UpgradeStage,
    user_friendly_error,
};
