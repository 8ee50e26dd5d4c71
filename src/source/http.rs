//! Generic HTTP update server.
//!
//! The server publishes a single `latest.json` under a base URL:
//!
//! ```json
//! {"version": "1.2.3", "url": "https://downloads.example.com/app-1.2.3"}
//! ```
//!
//! One GET per check, no retries. Anything other than a `200 OK` carrying
//! both fields fails the call.

use super::{get_ok, read_json};
use crate::constants::{CONNECT_TIMEOUT, LATEST_JSON, REQUEST_TIMEOUT, user_agent};
use crate::core::{Result, UpdaterError};
use crate::models::{RawUpdateInfo, UpdateInfo};
use reqwest::Url;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Client for a generic HTTP update server.
#[derive(Debug, Clone)]
pub struct HttpSource {
    http: reqwest::Client,
}

impl HttpSource {
    /// Create a client with the updater's user agent and timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`UpdaterError::Config`] if the HTTP client cannot be initialised.
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent())
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| UpdaterError::Config {
                message: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self { http })
    }

    /// Fetch and validate `<base_url>/latest.json`.
    ///
    /// # Errors
    ///
    /// - [`UpdaterError::InvalidRepoUrl`] if `base_url` is not an absolute URL
    /// - [`UpdaterError::Network`] or [`UpdaterError::HttpStatus`] for transport failures
    /// - [`UpdaterError::InvalidResponse`] for a malformed body or a missing field
    /// - [`UpdaterError::Cancelled`] if `cancel` fires first
    pub async fn latest_info(&self, base_url: &str, cancel: &CancellationToken) -> Result<UpdateInfo> {
        let url = latest_json_url(base_url)?;
        debug!("Fetching update info from {}", url);

        let response = get_ok(self.http.get(url.clone()), url.as_str(), cancel, "fetch update info").await?;
        let raw: RawUpdateInfo = read_json(response, url.as_str(), cancel, "fetch update info").await?;
        let info = UpdateInfo::try_from(raw).map_err(|reason| UpdaterError::InvalidResponse {
            url: url.to_string(),
            reason,
        })?;

        debug!("Update server reports version {}", info.version);
        Ok(info)
    }
}

/// Append `latest.json` to the path of `base_url`, keeping any query string.
///
/// # Errors
///
/// Returns [`UpdaterError::InvalidRepoUrl`] if `base_url` does not parse.
pub fn latest_json_url(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url).map_err(|e| UpdaterError::InvalidRepoUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    let path = format!("{}/{LATEST_JSON}", url.path().trim_end_matches('/'));
    url.set_path(&path);
    Ok(url)
}
