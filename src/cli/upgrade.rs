//! `uplift upgrade`: replace the running binary with the newest release.
//!
//! ```bash
//! # Upgrade if a newer release exists
//! uplift upgrade
//!
//! # Only report whether one exists
//! uplift upgrade --check
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tracing::debug;

use super::CliConfig;
use crate::config::GlobalConfig;
use crate::upgrade::{
    BinarySwapper, HttpArtifactDownloader, HttpReleaseFetcher, UpgradeEvent, UpgradeOutcome,
    Upgrader, scratch_path, swapper_for,
};

/// Arguments of `uplift upgrade`.
#[derive(Args, Debug)]
pub struct UpgradeArgs {
    /// Only check whether a newer release is available; download nothing
    #[arg(long)]
    pub check: bool,
}

pub async fn execute(args: UpgradeArgs, cli: &CliConfig) -> Result<()> {
    execute_on(args, cli, std::env::consts::OS).await
}

/// Run the command as if on `os`. The swap strategy is only selected when
/// installing, so `--check` works on every platform.
async fn execute_on(args: UpgradeArgs, cli: &CliConfig, os: &str) -> Result<()> {
    let config = GlobalConfig::load_with_optional(cli.config_path.clone()).await?;
    let settings = &config.upgrade;
    debug!("Upgrade settings: {:?}", settings);

    let fetcher = HttpReleaseFetcher::new(&settings.releases_url, settings.request_timeout())
        .context("Failed to initialise the HTTP client")?;
    let downloader =
        HttpArtifactDownloader::new(&settings.download_base_url, settings.request_timeout())
            .context("Failed to initialise the HTTP client")?
            .verify_checksum(settings.verify_checksum)
            .show_progress(!cli.no_progress);

    let upgrader = Upgrader::new(
        env!("CARGO_PKG_VERSION"),
        fetcher,
        downloader,
        scratch_path(&settings.scratch_dir()),
    );

    if args.check {
        return check_for_updates(&upgrader).await;
    }

    let swapper = swapper_for(os, &settings.elevation_program)?;
    perform_upgrade(&upgrader, swapper.as_ref()).await
}

async fn check_for_updates(
    upgrader: &Upgrader<HttpReleaseFetcher, HttpArtifactDownloader>,
) -> Result<()> {
    let status = upgrader.check(print_event).await?;

    if status.upgrade_available {
        println!(
            "{}",
            format!("Update available: {} -> {}", status.current, status.latest).green()
        );
        println!("Run `uplift upgrade` to install it");
    } else {
        println!(
            "{}",
            format!("You are on the latest version ({})", status.current).green()
        );
    }

    Ok(())
}

async fn perform_upgrade(
    upgrader: &Upgrader<HttpReleaseFetcher, HttpArtifactDownloader>,
    swapper: &dyn BinarySwapper,
) -> Result<()> {
    match upgrader.run(swapper, print_event).await? {
        UpgradeOutcome::UpToDate { current, .. } => {
            println!("{}", format!("Already on the latest version ({current})").green());
        }
        UpgradeOutcome::Upgraded { from, to, executable } => {
            println!(
                "{}",
                format!("Upgraded {} from {from} to {to}", executable.display()).green()
            );
        }
    }

    Ok(())
}

fn print_event(event: &UpgradeEvent) {
    match event {
        UpgradeEvent::CurrentVersion(version) => {
            println!("Current version: {}", version.bold());
        }
        UpgradeEvent::CheckingLatest => println!("{}", "Checking for updates...".cyan()),
        UpgradeEvent::UpdateAvailable { latest, .. } => {
            println!("{}", format!("Found newer version {latest}").cyan());
        }
        UpgradeEvent::Downloading { version, .. } => {
            println!("{}", format!("Downloading {version}...").cyan());
        }
        UpgradeEvent::Installing { executable } => {
            println!("{}", format!("Installing to {}...", executable.display()).cyan());
        }
    }
}
