//! Replacement of the running executable.
//!
//! A swap takes a freshly downloaded binary (the *staged* path) and puts it
//! where the running executable lives (the *target* path). How that can be
//! done safely depends on the platform family, so each family gets its own
//! [`BinarySwapper`] implementation and [`swapper_for`] picks one once, when
//! the upgrader is built.
//!
//! ```text
//! Start ──► PermissionsRead ──► Staged ──► Renamed ──► Done   (POSIX)
//!                                     └──► Elevated ─┘
//! Start ──► Renamed(.old) ──► Renamed(target) ──► Done        (Windows)
//! ```
//!
//! Every state can fail. A swap performs at most two renames and one
//! permission change and never deletes a file explicitly: the staged file is
//! consumed by the rename, and on Windows the previous binary is kept next to
//! the target as `<name>.old`.

mod posix;
mod windows;

pub use posix::{CommandElevator, Elevator, PosixSwapper};
pub use windows::WindowsSwapper;

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::UpgradeError;
use crate::upgrade::platform::PlatformFamily;

/// Suffix appended to the previous binary's file name on Windows.
pub const RELOCATED_SUFFIX: &str = ".old";

/// Strategy for installing a staged binary over the current executable.
pub trait BinarySwapper {
    /// Replace `target` with `staged`.
    ///
    /// On success `staged` no longer exists and `target` holds its content.
    fn swap(&self, staged: &Path, target: &Path) -> Result<(), UpgradeError>;
}

/// Pick the swap strategy for an operating system name.
///
/// # Errors
///
/// Returns [`UpgradeError::UnsupportedPlatform`] for platform families with no
/// known strategy, before anything on disk is touched.
pub fn swapper_for(
    os: &str,
    elevation_program: &str,
) -> Result<Box<dyn BinarySwapper>, UpgradeError> {
    let family = PlatformFamily::from_os(os);
    debug!("Selecting swap strategy for {} ({})", os, family);

    match family {
        PlatformFamily::Windows => Ok(Box::new(WindowsSwapper)),
        PlatformFamily::Posix => {
            Ok(Box::new(PosixSwapper::new(CommandElevator::new(elevation_program))))
        }
        PlatformFamily::Unsupported(platform) => Err(UpgradeError::UnsupportedPlatform { platform }),
    }
}

/// Resolve the absolute path of the running executable.
///
/// Symlinks are followed so the real file is replaced, not the link.
///
/// # Errors
///
/// See [`validate_executable`].
pub fn resolve_executable() -> Result<PathBuf, UpgradeError> {
    let exe = std::env::current_exe().map_err(UpgradeError::ExecutableUnresolved)?;
    validate_executable(&exe)
}

/// Canonicalize `path` and check that it names an existing regular file.
///
/// # Errors
///
/// - [`UpgradeError::ExecutableUnresolved`] if the path cannot be resolved
/// - [`UpgradeError::NotARegularFile`] if it resolves to a directory or other
///   special file
pub fn validate_executable(path: &Path) -> Result<PathBuf, UpgradeError> {
    let resolved = path.canonicalize().map_err(UpgradeError::ExecutableUnresolved)?;
    let metadata = fs::metadata(&resolved).map_err(UpgradeError::ExecutableUnresolved)?;

    if !metadata.is_file() {
        return Err(UpgradeError::NotARegularFile { path: resolved });
    }

    Ok(resolved)
}

/// Sibling path that holds the previous binary during a Windows swap.
///
/// ```rust
/// use std::path::Path;
/// use uplift_cli::upgrade::swap::relocated_path;
///
/// let relocated = relocated_path(Path::new("/opt/tools/uplift.exe"));
/// assert_eq!(relocated, Path::new("/opt/tools/uplift.exe.old"));
/// ```
#[must_use]
pub fn relocated_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(RELOCATED_SUFFIX);
    target.with_file_name(name)
}
