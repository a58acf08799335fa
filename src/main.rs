//! uplift command-line entry point.
//!
//! Parses arguments, runs the command and turns any error into a categorized
//! message on stderr with exit status 1.

use anyhow::Result;
use clap::Parser;
use uplift_cli::cli;
use uplift_cli::core::error::user_friendly_error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
