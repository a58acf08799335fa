use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use super::{BinarySwapper, relocated_path};
use crate::core::UpgradeError;

/// Swap strategy for Windows.
///
/// A running executable cannot be overwritten or deleted on Windows, but it
/// can be renamed. The current binary is moved aside to `<name>.old` in the
/// same directory, then the staged binary is renamed into its place.
///
/// The `.old` file is not cleaned up; it stays in place until removed by
/// hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsSwapper;

impl BinarySwapper for WindowsSwapper {
    fn swap(&self, staged: &Path, target: &Path) -> Result<(), UpgradeError> {
        let relocated = relocated_path(target);

        debug!("Moving {} aside to {}", target.display(), relocated.display());
        fs::rename(target, &relocated).map_err(|source| UpgradeError::Rename {
            from: target.to_path_buf(),
            to: relocated.clone(),
            source,
        })?;

        if let Err(source) = fs::rename(staged, target) {
            warn!(
                "{} was moved to {} but {} could not be installed: {}",
                target.display(),
                relocated.display(),
                staged.display(),
                source
            );
            return Err(UpgradeError::PartialUpgrade {
                staged: staged.to_path_buf(),
                target: target.to_path_buf(),
                relocated,
                source,
            });
        }

        info!(
            "Replaced {}; previous binary kept at {}",
            target.display(),
            relocated.display()
        );
        Ok(())
    }
}
