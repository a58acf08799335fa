//! Progress indicators for long-running transfers.
//!
//! Progress bars are drawn to stderr so they never mix with command output,
//! and are replaced by hidden bars when disabled so callers can update them
//! unconditionally.
//!
//! ```rust,no_run
//! use uplift_cli::utils::progress::download_bar;
//!
//! let bar = download_bar(Some(4096), true);
//! bar.inc(1024);
//! bar.finish_and_clear();
//! ```

use indicatif::{ProgressBar, ProgressStyle};

use crate::constants::NO_PROGRESS_ENV_VAR;

/// Checks if progress bars are disabled through the environment.
///
/// Progress bars are disabled when the `UPLIFT_NO_PROGRESS` environment
/// variable is set to any value. This is useful for CI environments and
/// scripts.
#[must_use]
pub fn is_progress_disabled() -> bool {
    std::env::var_os(NO_PROGRESS_ENV_VAR).is_some()
}

/// Create a byte-counting progress bar for a download.
///
/// `total` is the expected size when the server announced one; without it a
/// spinner with a byte counter is shown instead. When `enabled` is false or
/// progress is disabled through the environment, a hidden bar is returned.
#[must_use]
pub fn download_bar(total: Option<u64>, enabled: bool) -> ProgressBar {
    if !enabled || is_progress_disabled() {
        return ProgressBar::hidden();
    }

    match total {
        Some(len) => {
            let bar = ProgressBar::new(len);
            bar.set_style(download_style());
            bar
        }
        None => {
            let bar = ProgressBar::new_spinner();
            bar.set_style(spinner_style());
            bar
        }
    }
}

fn download_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
        .map(|style| style.progress_chars("━╸━"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {bytes} downloaded")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
