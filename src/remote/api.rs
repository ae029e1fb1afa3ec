// src/remote/api.rs

//! Typed HTTP client for the release listing endpoint.

use std::time::Duration;

use bytes::Bytes;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::RemoteSection;

/// Errors from listing releases or downloading assets.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Transport-level failure (DNS, TLS, timeout, connection reset).
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    /// The listing body was not valid release JSON.
    #[error("failed to parse release listing: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One published release as returned by the listing endpoint.
///
/// Only the fields we read are modelled; everything else in the payload is
/// ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// Tag the release was published under. Logging only.
    #[serde(default)]
    pub tag_name: Option<String>,
    /// Downloadable files attached to this release.
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// One downloadable asset attached to a release.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    /// File name the asset was published under.
    pub name: String,
    /// Direct download URL.
    pub browser_download_url: String,
}

/// HTTP client bound to one configured project feed.
#[derive(Debug, Clone)]
pub struct ReleaseClient {
    http: reqwest::Client,
    listing_url: String,
    token: Option<String>,
}

impl ReleaseClient {
    /// Build a client from the `[remote]` config section.
    pub fn new(remote: &RemoteSection) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("hashwatch/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;

        let listing_url = format!(
            "{}/repos/{}/releases",
            remote.api_url.trim_end_matches('/'),
            remote.project
        );

        Ok(Self {
            http,
            listing_url,
            token: remote.bearer_token(),
        })
    }

    /// Fetch all published releases for the configured project.
    ///
    /// The bearer token, when configured, is attached here and only here;
    /// asset downloads use their URLs as-is.
    pub async fn list_releases(&self) -> Result<Vec<Release>, RemoteError> {
        debug!(url = %self.listing_url, "listing releases");

        let mut request = self.http.get(&self.listing_url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                url: self.listing_url.clone(),
                status: status.as_u16(),
            });
        }

        // Body is read as text first so JSON problems surface as a parse
        // error rather than a transport error.
        let body = response.text().await?;
        let releases: Vec<Release> = serde_json::from_str(&body)?;
        Ok(releases)
    }

    /// Download one asset's full content.
    pub async fn download_asset(&self, asset: &ReleaseAsset) -> Result<Bytes, RemoteError> {
        debug!(asset = %asset.name, url = %asset.browser_download_url, "downloading asset");

        let response = self.http.get(&asset.browser_download_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                url: asset.browser_download_url.clone(),
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?)
    }
}
