//! Test utilities for uplift.
//!
//! Shared helpers for unit and integration tests: one-time logging setup and
//! fake executables to upgrade.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. With `level` set, that level is used;
/// otherwise `RUST_LOG` is honoured, and without it tests stay silent.
///
/// ```bash
/// RUST_LOG=uplift_cli=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Write `contents` to `dir/uplift[.exe]` as an executable file.
///
/// # Errors
///
/// Any I/O error from writing the file or setting its mode.
pub fn write_fake_executable(dir: &Path, contents: &[u8]) -> io::Result<PathBuf> {
    let path = dir.join(format!("uplift{}", std::env::consts::EXE_SUFFIX));
    fs::write(&path, contents)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    }

    Ok(path)
}
