//! Release discovery.
//!
//! The release feed is a JSON array of release objects, newest first. Only
//! the `name` of each entry is used; other fields are ignored:
//!
//! ```json
//! [
//!   { "name": "v1.31.0", "checksums": { "linux-amd64": "..." } },
//!   { "name": "v1.30.1" }
//! ]
//! ```

use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

use crate::core::{FetchFailure, UpgradeError};

/// Source of published release names.
pub trait ReleaseFetcher {
    /// All published release names, newest first.
    fn latest_releases(&self) -> impl Future<Output = Result<Vec<String>, FetchFailure>>;
}

/// Pick the newest release from a list ordered newest first.
///
/// # Errors
///
/// Returns [`UpgradeError::EmptyReleaseList`] if `releases` is empty; an empty
/// feed never means "up to date".
pub fn latest_release(releases: &[String]) -> Result<&str, UpgradeError> {
    releases
        .first()
        .map(String::as_str)
        .ok_or(UpgradeError::EmptyReleaseList)
}

#[derive(Debug, Deserialize)]
struct ReleaseEntry {
    name: String,
}

/// Decode a release feed body into release names, preserving order.
///
/// # Errors
///
/// Returns the JSON error if the body is not an array of objects with a
/// string `name`.
pub fn parse_release_feed(body: &str) -> Result<Vec<String>, serde_json::Error> {
    let entries: Vec<ReleaseEntry> = serde_json::from_str(body)?;
    Ok(entries.into_iter().map(|entry| entry.name).collect())
}

/// Reads the release feed over HTTP.
pub struct HttpReleaseFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpReleaseFetcher {
    /// Create a fetcher for the feed at `url`.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be initialised (e.g. no TLS backend).
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("uplift/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// The feed URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn request_failure(&self, source: reqwest::Error) -> FetchFailure {
        FetchFailure::Request {
            url: self.url.clone(),
            source,
        }
    }
}

impl ReleaseFetcher for HttpReleaseFetcher {
    async fn latest_releases(&self) -> Result<Vec<String>, FetchFailure> {
        debug!("Fetching release feed from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.request_failure(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| self.request_failure(e))?;
        let releases = parse_release_feed(&body).map_err(|source| FetchFailure::Decode {
            url: self.url.clone(),
            source,
        })?;

        debug!("Release feed lists {} releases", releases.len());
        Ok(releases)
    }
}
