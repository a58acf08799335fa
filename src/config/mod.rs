//! Configuration management for uplift.
//!
//! uplift reads a single optional TOML file. It currently holds one table,
//! `[upgrade]`, described by [`UpgradeConfig`](crate::upgrade::UpgradeConfig).
//!
//! # Modules
//!
//! - `global` - location and loading of the global configuration file

mod global;

pub use global::GlobalConfig;
