use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

use crate::core::DownloadFailure;

/// Verifies the integrity of a downloaded binary using its SHA-256 checksum.
///
/// Releases publish a `<artifact>.sha256` file next to every binary. The
/// downloader fetches it, extracts the digest with
/// [`parse_checksum_file`](Self::parse_checksum_file) and checks the
/// downloaded file with [`verify_checksum`](Self::verify_checksum).
pub struct ChecksumVerifier;

impl ChecksumVerifier {
    /// Compute the hex-encoded SHA-256 checksum of a file.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use uplift_cli::upgrade::verification::ChecksumVerifier;
    /// use std::path::Path;
    ///
    /// # async fn example() -> Result<(), uplift_cli::core::DownloadFailure> {
    /// let checksum = ChecksumVerifier::compute_sha256(Path::new("/path/to/binary")).await?;
    /// println!("SHA256: {}", checksum);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn compute_sha256(file_path: &Path) -> Result<String, DownloadFailure> {
        debug!("Computing SHA256 checksum for: {}", file_path.display());

        let contents = fs::read(file_path).await.map_err(|source| DownloadFailure::Io {
            path: file_path.to_path_buf(),
            source,
        })?;

        Ok(hex::encode(Sha256::digest(&contents)))
    }

    /// Verify a file against an expected hex-encoded SHA-256 checksum.
    ///
    /// The comparison is case-insensitive.
    pub async fn verify_checksum(
        file_path: &Path,
        expected_checksum: &str,
    ) -> Result<(), DownloadFailure> {
        info!("Verifying checksum for: {}", file_path.display());

        let actual_checksum = Self::compute_sha256(file_path).await?;

        if !actual_checksum.eq_ignore_ascii_case(expected_checksum) {
            return Err(DownloadFailure::ChecksumMismatch {
                expected: expected_checksum.to_string(),
                actual: actual_checksum,
            });
        }

        info!("Checksum verification successful");
        Ok(())
    }

    /// Extract the digest from the content of a `.sha256` file.
    ///
    /// Both the bare form (`<digest>`) and the `sha256sum` form
    /// (`<digest>  <file name>`) are accepted. Returns `None` if the first
    /// token is not a 64-character hex string.
    ///
    /// ```rust
    /// use uplift_cli::upgrade::verification::ChecksumVerifier;
    ///
    /// let digest = "a".repeat(64);
    /// let content = format!("{digest}  uplift-linux-amd64\n");
    /// assert_eq!(ChecksumVerifier::parse_checksum_file(&content), Some(digest));
    /// ```
    pub fn parse_checksum_file(content: &str) -> Option<String> {
        let token = content.split_whitespace().next()?;
        if token.len() == 64 && token.bytes().all(|b| b.is_ascii_hexdigit()) {
            Some(token.to_ascii_lowercase())
        } else {
            None
        }
    }
}
