//! Retrieval of release artifacts.
//!
//! Artifacts are published per version and platform:
//!
//! ```text
//! <download_base_url>/<version>/uplift-<os>-<arch>[.exe]
//! <download_base_url>/<version>/uplift-<os>-<arch>[.exe].sha256
//! ```
//!
//! The downloader always writes to the same scratch path so a stale partial
//! download from an earlier run is simply overwritten.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::constants::TOOL_NAME;
use crate::core::DownloadFailure;
use crate::upgrade::platform::artifact_name;
use crate::upgrade::verification::ChecksumVerifier;
use crate::utils::progress::download_bar;

/// Source of release binaries.
pub trait ArtifactDownloader {
    /// Download the binary for `version` to `destination`.
    ///
    /// Implementations verify integrity themselves; a returned `Ok` means the
    /// file at `destination` is complete and trusted.
    fn fetch_binary(
        &self,
        version: &str,
        destination: &Path,
    ) -> impl Future<Output = Result<(), DownloadFailure>>;
}

/// Fixed location of the downloaded candidate binary inside `dir`.
///
/// The file is named after the tool itself, without a version suffix.
#[must_use]
pub fn scratch_path(dir: &Path) -> PathBuf {
    dir.join(format!("{TOOL_NAME}{}", std::env::consts::EXE_SUFFIX))
}

/// Downloads release binaries over HTTP and checks their published SHA-256.
pub struct HttpArtifactDownloader {
    client: reqwest::Client,
    base_url: String,
    os: String,
    arch: String,
    verify_checksum: bool,
    show_progress: bool,
}

impl HttpArtifactDownloader {
    /// Create a downloader for artifacts under `base_url`, targeting the
    /// platform this binary was built for.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be initialised.
    pub fn new(base_url: impl Into<String>, connect_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("uplift/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            verify_checksum: true,
            show_progress: true,
        })
    }

    /// Target another operating system and architecture.
    #[must_use]
    pub fn for_platform(mut self, os: impl Into<String>, arch: impl Into<String>) -> Self {
        self.os = os.into();
        self.arch = arch.into();
        self
    }

    /// Enable or disable checksum verification.
    #[must_use]
    pub fn verify_checksum(mut self, verify: bool) -> Self {
        self.verify_checksum = verify;
        self
    }

    /// Enable or disable the progress bar.
    #[must_use]
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// URL of the binary for `version` on the configured platform.
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use uplift_cli::upgrade::download::HttpArtifactDownloader;
    ///
    /// let downloader = HttpArtifactDownloader::new("https://example.com/releases/", Duration::from_secs(5))
    ///     .unwrap()
    ///     .for_platform("linux", "x86_64");
    /// assert_eq!(
    ///     downloader.artifact_url("v1.31.0"),
    ///     "https://example.com/releases/v1.31.0/uplift-linux-amd64"
    /// );
    /// ```
    #[must_use]
    pub fn artifact_url(&self, version: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            version,
            artifact_name(TOOL_NAME, &self.os, &self.arch)
        )
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, DownloadFailure> {
        let response = self.client.get(url).send().await.map_err(|source| {
            DownloadFailure::Request {
                url: url.to_string(),
                source,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadFailure::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    async fn expected_checksum(&self, artifact_url: &str) -> Result<String, DownloadFailure> {
        let url = format!("{artifact_url}.sha256");
        debug!("Fetching checksum from {}", url);

        let body = self.get(&url).await?.text().await.map_err(|source| {
            DownloadFailure::Request {
                url: url.clone(),
                source,
            }
        })?;

        ChecksumVerifier::parse_checksum_file(&body).ok_or(DownloadFailure::MalformedChecksum { url })
    }

    async fn stream_to(&self, url: &str, destination: &Path) -> Result<u64, DownloadFailure> {
        let io_failure = |source| DownloadFailure::Io {
            path: destination.to_path_buf(),
            source,
        };

        let mut response = self.get(url).await?;
        let progress = download_bar(response.content_length(), self.show_progress);
        progress.set_prefix(TOOL_NAME);

        let mut file = fs::File::create(destination).await.map_err(io_failure)?;
        let mut written = 0u64;

        while let Some(chunk) = response.chunk().await.map_err(|source| DownloadFailure::Request {
            url: url.to_string(),
            source,
        })? {
            file.write_all(&chunk).await.map_err(io_failure)?;
            written += chunk.len() as u64;
            progress.inc(chunk.len() as u64);
        }

        file.flush().await.map_err(io_failure)?;
        file.sync_all().await.map_err(io_failure)?;
        progress.finish_and_clear();

        Ok(written)
    }
}

impl ArtifactDownloader for HttpArtifactDownloader {
    async fn fetch_binary(&self, version: &str, destination: &Path) -> Result<(), DownloadFailure> {
        let url = self.artifact_url(version);
        info!("Downloading {} to {}", url, destination.display());

        // Fetched first so a missing checksum fails before the large transfer.
        let expected = if self.verify_checksum {
            Some(self.expected_checksum(&url).await?)
        } else {
            warn!("Checksum verification is disabled");
            None
        };

        let written = self.stream_to(&url, destination).await?;
        debug!("Downloaded {} bytes", written);

        let Some(expected) = expected else {
            return Ok(());
        };

        if let Err(e) = ChecksumVerifier::verify_checksum(destination, &expected).await {
            if let Err(remove_err) = fs::remove_file(destination).await {
                debug!("Failed to remove rejected download: {}", remove_err);
            }
            return Err(e);
        }

        Ok(())
    }
}
