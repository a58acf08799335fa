use colored::Colorize;
use std::fs;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

use super::BinarySwapper;
use crate::core::{ElevationFailure, UpgradeError};

type RenameFn = fn(&Path, &Path) -> io::Result<()>;

fn rename_in_place(from: &Path, to: &Path) -> io::Result<()> {
    fs::rename(from, to)
}

/// Performs a filesystem move with elevated privileges.
pub trait Elevator {
    /// Move `staged` to `target` as a privileged user.
    fn elevated_move(&self, staged: &Path, target: &Path) -> Result<(), UpgradeError>;
}

/// Runs `<program> mv <staged> <target>` with the caller's terminal attached.
///
/// Standard input, output and error are inherited so the helper can prompt
/// for a password. The child is waited on before returning.
#[derive(Debug, Clone)]
pub struct CommandElevator {
    program: String,
}

impl CommandElevator {
    /// Create an elevator around a helper program such as `sudo` or `doas`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The helper program name.
    pub fn program(&self) -> &str {
        &self.program
    }

    fn failure(&self, staged: &Path, target: &Path, source: ElevationFailure) -> UpgradeError {
        UpgradeError::ElevatedMove {
            program: self.program.clone(),
            staged: staged.to_path_buf(),
            target: target.to_path_buf(),
            source,
        }
    }
}

impl Elevator for CommandElevator {
    fn elevated_move(&self, staged: &Path, target: &Path) -> Result<(), UpgradeError> {
        let program = which::which(&self.program)
            .map_err(|e| self.failure(staged, target, ElevationFailure::NotFound(e)))?;

        eprintln!("{}", "Please provide root privileges to continue.".yellow());
        info!("Running {} mv {} {}", program.display(), staged.display(), target.display());

        let status = Command::new(&program)
            .arg("mv")
            .arg(staged)
            .arg(target)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| self.failure(staged, target, ElevationFailure::Spawn(e)))?;

        if !status.success() {
            return Err(self.failure(staged, target, ElevationFailure::Status(status)));
        }

        Ok(())
    }
}

/// Swap strategy for Linux and macOS.
///
/// Renaming over a running executable is safe on POSIX systems: the process
/// keeps the old inode open while the directory entry points at the new file.
///
/// 1. Read the permissions of the current executable.
/// 2. Apply them to the staged binary.
/// 3. Rename the staged binary over the current executable.
/// 4. If the rename is refused with a permission error, retry it once through
///    the [`Elevator`]. Any other rename error is returned as is.
///
/// If step 1 or 2 fails nothing is renamed, so a binary with unknown or
/// default permissions is never installed.
pub struct PosixSwapper<E = CommandElevator> {
    elevator: E,
    rename: RenameFn,
}

impl<E: Elevator> PosixSwapper<E> {
    /// Create a swapper that escalates through `elevator` when needed.
    pub fn new(elevator: E) -> Self {
        Self {
            elevator,
            rename: rename_in_place,
        }
    }

    fn copy_permissions(staged: &Path, target: &Path) -> Result<(), UpgradeError> {
        let permissions = fs::metadata(target)
            .map_err(|source| UpgradeError::PermissionRead {
                path: target.to_path_buf(),
                source,
            })?
            .permissions();

        debug!("Applying permissions of {} to {}", target.display(), staged.display());
        fs::set_permissions(staged, permissions).map_err(|source| {
            UpgradeError::PermissionApply {
                path: staged.to_path_buf(),
                source,
            }
        })
    }
}

impl<E: Elevator> BinarySwapper for PosixSwapper<E> {
    fn swap(&self, staged: &Path, target: &Path) -> Result<(), UpgradeError> {
        Self::copy_permissions(staged, target)?;

        match (self.rename)(staged, target) {
            Ok(()) => {
                info!("Replaced {} with {}", target.display(), staged.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                warn!("Rename into {} was denied, retrying with elevation: {}", target.display(), e);
                self.elevator.elevated_move(staged, target)
            }
            Err(source) => Err(UpgradeError::Rename {
                from: staged.to_path_buf(),
                to: target.to_path_buf(),
                source,
            }),
        }
    }
}
