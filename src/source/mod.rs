//! Release sources: where candidate builds are discovered.
//!
//! Two variants exist and the choice is made once, when a [`ReleaseSource`]
//! is built from the configured repository URL:
//!
//! - [`ReleaseSource::GitHub`]: a GitHub repository, queried through any
//!   [`GitHubApi`] implementation ([`GitHubClient`] in production)
//! - [`ReleaseSource::Http`]: a plain web server publishing `latest.json`,
//!   queried through [`HttpSource`]
//!
//! A URL is GitHub-backed when it contains `github.com`; it must then name an
//! owner and a repository. Every other URL is treated as the base URL of a
//! generic update server.
//!
//! All network calls take a [`CancellationToken`] and stop promptly when it
//! fires, including between pages of a paginated listing.

pub mod github;
pub mod http;

pub use github::{GitHubApi, GitHubClient};
pub use http::HttpSource;

use crate::constants::GITHUB_HOST_MARKER;
use crate::core::{Result, UpdaterError};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::fmt;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Owner and repository name of a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoLocation {
    /// User or organization owning the repository.
    pub owner: String,
    /// Repository name without any `.git` suffix.
    pub repo: String,
}

impl fmt::Display for RepoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Extract the owner and repository name from a GitHub URL.
///
/// Accepts `https://github.com/owner/repo`, with or without a trailing slash,
/// a `.git` suffix or extra path segments, and the SSH form
/// `git@github.com:owner/repo.git`.
///
/// ```rust
/// use updater::source::parse_repo_url;
///
/// let location = parse_repo_url("https://github.com/owner/repo").unwrap();
/// assert_eq!((location.owner.as_str(), location.repo.as_str()), ("owner", "repo"));
/// assert!(parse_repo_url("https://github.com/owner").is_err());
/// ```
///
/// # Errors
///
/// Returns [`UpdaterError::InvalidRepoUrl`] when the URL does not parse or its
/// path has fewer than two segments.
pub fn parse_repo_url(repo_url: &str) -> Result<RepoLocation> {
    let invalid = |reason: String| UpdaterError::InvalidRepoUrl {
        url: repo_url.to_string(),
        reason,
    };

    let path = match repo_url.split_once(':') {
        // SSH form: git@github.com:owner/repo.git
        Some((user_host, rest)) if user_host.contains('@') && !user_host.contains('/') => {
            rest.to_string()
        }
        _ => Url::parse(repo_url).map_err(|e| invalid(e.to_string()))?.path().to_string(),
    };

    let mut segments = path.trim_matches('/').split('/').filter(|s| !s.is_empty());
    match (segments.next(), segments.next()) {
        (Some(owner), Some(repo)) => Ok(RepoLocation {
            owner: owner.to_string(),
            repo: repo.trim_end_matches(".git").to_string(),
        }),
        _ => Err(invalid(format!("expected /<owner>/<repo>, got '{path}'"))),
    }
}

/// Returns `true` when `repo_url` points at GitHub.
#[must_use]
pub fn is_github_url(repo_url: &str) -> bool {
    repo_url.contains(GITHUB_HOST_MARKER)
}

/// Where candidate releases come from, fixed at construction.
#[derive(Debug)]
pub enum ReleaseSource<G> {
    /// GitHub releases of a repository.
    GitHub {
        /// The repository whose releases are listed.
        location: RepoLocation,
        /// API client used for listing.
        api: G,
    },
    /// A generic HTTP server publishing `latest.json`.
    Http {
        /// Base URL under which `latest.json` is published.
        base_url: String,
        /// HTTP client used for the fetch.
        client: HttpSource,
    },
}

impl<G: GitHubApi> ReleaseSource<G> {
    /// Select the source variant for `repo_url`.
    ///
    /// The GitHub API client is only kept when the URL is GitHub-backed.
    ///
    /// # Errors
    ///
    /// Returns [`UpdaterError::InvalidRepoUrl`] for a GitHub URL without an
    /// owner and repository, or a transport-configuration error if the HTTP
    /// client cannot be built.
    pub fn from_repo_url(repo_url: &str, api: G) -> Result<Self> {
        if is_github_url(repo_url) {
            Ok(Self::GitHub {
                location: parse_repo_url(repo_url)?,
                api,
            })
        } else {
            Ok(Self::Http {
                base_url: repo_url.to_string(),
                client: HttpSource::new()?,
            })
        }
    }

    /// Returns `true` for the GitHub variant.
    #[must_use]
    pub const fn is_github(&self) -> bool {
        matches!(self, Self::GitHub { .. })
    }
}

/// Run `future` unless `cancel` fires first.
pub(crate) async fn cancellable<T>(
    cancel: &CancellationToken,
    operation: &str,
    future: impl Future<Output = Result<T>>,
) -> Result<T> {
    if cancel.is_cancelled() {
        return Err(UpdaterError::cancelled(operation));
    }
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(UpdaterError::cancelled(operation)),
        result = future => result,
    }
}

/// Send a GET request and return the response if the status is `200 OK`.
pub(crate) async fn get_ok(
    request: reqwest::RequestBuilder,
    url: &str,
    cancel: &CancellationToken,
    operation: &str,
) -> Result<reqwest::Response> {
    let response = send(request, url, cancel, operation).await?;
    ensure_ok(response, url)
}

/// Send a request, racing it against cancellation.
pub(crate) async fn send(
    request: reqwest::RequestBuilder,
    url: &str,
    cancel: &CancellationToken,
    operation: &str,
) -> Result<reqwest::Response> {
    cancellable(cancel, operation, async {
        request.send().await.map_err(|e| UpdaterError::network(url, &e))
    })
    .await
}

pub(crate) fn ensure_ok(response: reqwest::Response, url: &str) -> Result<reqwest::Response> {
    if response.status() == reqwest::StatusCode::OK {
        Ok(response)
    } else {
        Err(UpdaterError::HttpStatus {
            url: url.to_string(),
            status: response.status().as_u16(),
        })
    }
}

/// Read and decode a JSON body, racing the read against cancellation.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    url: &str,
    cancel: &CancellationToken,
    operation: &str,
) -> Result<T> {
    let body = cancellable(cancel, operation, async {
        response.bytes().await.map_err(|e| UpdaterError::network(url, &e))
    })
    .await?;

    serde_json::from_slice(&body).map_err(|e| UpdaterError::InvalidResponse {
        url: url.to_string(),
        reason: e.to_string(),
    })
}
