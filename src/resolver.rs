//! Update decision: fetch a candidate and compare it with the running version.
//!
//! The resolver is source-agnostic in the sense that matters: it takes any
//! [`GitHubApi`] for release listings, and [`resolve_info`] applies the same
//! comparison to a generic server's `latest.json`.
//!
//! "No release on this channel" is a normal result, reported as
//! `release: None` with `update_available: false`. A candidate that is equal
//! to or older than the running version is "up to date", never an error.

use crate::core::Result;
use crate::models::{Release, UpdateInfo};
use crate::source::GitHubApi;
use crate::version::{Channel, is_newer};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Outcome of a GitHub release lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The latest release on the requested channel, if any.
    pub release: Option<Release>,
    /// Whether `release` is strictly newer than the running version.
    pub update_available: bool,
}

impl Resolution {
    /// A resolution with no candidate release.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            release: None,
            update_available: false,
        }
    }
}

/// Look up the latest `channel` release of `owner/repo` and compare it to `current`.
///
/// # Errors
///
/// Propagates transport errors and cancellation from `api` unchanged.
pub async fn resolve<G: GitHubApi>(
    api: &G,
    owner: &str,
    repo: &str,
    channel: Channel,
    current: &str,
    cancel: &CancellationToken,
) -> Result<Resolution> {
    let Some(release) = api.latest_release(owner, repo, channel, cancel).await? else {
        debug!("No {} release for {}/{}", channel, owner, repo);
        return Ok(Resolution::none());
    };

    let update_available = is_newer(current, &release.tag_name);
    debug!(
        "Compared current {} with candidate {}: update available = {}",
        current, release.tag_name, update_available
    );
    Ok(Resolution {
        release: Some(release),
        update_available,
    })
}

/// Returns `true` when the server-published version is strictly newer than `current`.
#[must_use]
pub fn resolve_info(info: &UpdateInfo, current: &str) -> bool {
    is_newer(current, &info.version)
}
