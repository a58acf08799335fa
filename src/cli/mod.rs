//! Command-line interface for uplift.
//!
//! # Available Commands
//!
//! - `upgrade` - Replace the running binary with the newest published release
//!
//! # Global Options
//!
//! All commands support these global options:
//! - `--verbose` / `-v` - Enable debug logging
//! - `--quiet` / `-q` - Suppress log output
//! - `--config` / `-c` - Use a custom configuration file (env: `UPLIFT_CONFIG`)
//! - `--no-progress` - Disable the download progress bar
//!
//! Log output goes to stderr. `RUST_LOG`, when set, overrides the level
//! chosen by `--verbose` and `--quiet`.
//!
//! ```bash
//! uplift upgrade --check
//! uplift --verbose upgrade
//! RUST_LOG=uplift_cli::upgrade=trace uplift upgrade
//! ```

mod upgrade;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::constants::CONFIG_ENV_VAR;
use crate::utils::progress::is_progress_disabled;

/// Settings derived from the global flags, passed down to commands.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter directive, `None` when logging is off.
    pub log_level: Option<String>,

    /// Whether progress bars are suppressed (`--no-progress` or `--quiet`).
    pub no_progress: bool,

    /// Configuration file given with `--config`.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Install the global `tracing` subscriber.
    ///
    /// `RUST_LOG` takes precedence over [`log_level`](Self::log_level). Calling
    /// this more than once is harmless; only the first subscriber is kept.
    pub fn init_logging(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if let Some(level) = &self.log_level {
            EnvFilter::new(level)
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Main CLI structure for uplift.
#[derive(Parser, Debug)]
#[command(
    name = "uplift",
    about = "Keep the uplift binary up to date",
    version,
    long_about = "uplift checks a release feed for newer versions of itself, downloads the \
                  matching binary for this platform and replaces the running executable."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress log output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file [default: ~/.uplift/config.toml]
    #[arg(short, long, global = true, value_name = "PATH", env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Disable progress bars
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upgrade uplift to the latest published release
    Upgrade(upgrade::UpgradeArgs),
}

impl Cli {
    /// Execute the parsed command.
    ///
    /// # Errors
    ///
    /// Returns the command's error; `main` turns it into a user-facing
    /// message and exit status 1.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(config).await
    }

    /// Derive the [`CliConfig`] from the global flags.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.quiet {
            None
        } else if self.verbose {
            Some("debug".to_string())
        } else {
            Some("warn".to_string())
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress || self.quiet || is_progress_disabled(),
            config_path: self.config.clone(),
        }
    }

    /// Execute the command with an explicit [`CliConfig`].
    ///
    /// # Errors
    ///
    /// Returns the command's error.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Upgrade(args) => upgrade::execute(args, &config).await,
        }
    }
}
