//! Wire models shared by the release sources.
//!
//! These types mirror the JSON returned by the GitHub REST API and by a
//! generic update server's `latest.json`. Only the fields the updater reads
//! are declared; serde ignores everything else.

use serde::{Deserialize, Serialize};

/// A single downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseAsset {
    /// File name, e.g. `app-linux-amd64.tar.gz`.
    pub name: String,
    /// Direct download URL.
    #[serde(rename = "browser_download_url")]
    pub download_url: String,
}

impl ReleaseAsset {
    /// Create an asset from a name and download URL.
    pub fn new(name: impl Into<String>, download_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            download_url: download_url.into(),
        }
    }
}

/// A release as listed by a GitHub-style release API.
///
/// Sources never hand out a `Release` with an empty tag; "nothing found" is
/// `None` at the call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Git tag the release was cut from, e.g. `v1.2.3-beta.1`.
    pub tag_name: String,
    /// Whether the release is flagged as a pre-release.
    #[serde(default, rename = "prerelease")]
    pub pre_release: bool,
    /// Downloadable assets in the order the API lists them.
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

impl Release {
    /// Create a release with no assets.
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            pre_release: false,
            assets: Vec::new(),
        }
    }

    /// Mark the release as a pre-release.
    #[must_use]
    pub fn with_pre_release(mut self, pre_release: bool) -> Self {
        self.pre_release = pre_release;
        self
    }

    /// Append an asset.
    #[must_use]
    pub fn with_asset(mut self, name: impl Into<String>, download_url: impl Into<String>) -> Self {
        self.assets.push(ReleaseAsset::new(name, download_url));
        self
    }
}

/// Contents of `latest.json` on a generic HTTP update server.
///
/// ```json
/// {"version": "1.2.3", "url": "https://downloads.example.com/app-1.2.3"}
/// ```
///
/// Both fields are mandatory. Decoding goes through [`RawUpdateInfo`] so a
/// missing field and an empty field are rejected the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateInfo {
    /// Version of the published build.
    pub version: String,
    /// Download URL of the published build.
    pub url: String,
}

/// Lenient decoding target for `latest.json`, validated by [`UpdateInfo::try_from`].
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawUpdateInfo {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

impl TryFrom<RawUpdateInfo> for UpdateInfo {
    type Error = String;

    fn try_from(raw: RawUpdateInfo) -> Result<Self, Self::Error> {
        match (raw.version, raw.url) {
            (Some(version), Some(url)) if !version.is_empty() && !url.is_empty() => {
                Ok(Self { version, url })
            }
            _ => Err("version or url is missing".to_string()),
        }
    }
}

/// A repository entry from a user or organization repository listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoListing {
    /// HTTPS clone URL of the repository.
    pub clone_url: String,
}
