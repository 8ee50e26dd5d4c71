//! GitHub release and repository listing.
//!
//! [`GitHubApi`] is the seam the rest of the updater talks to;
//! [`GitHubClient`] implements it over the GitHub REST API with `reqwest`.
//!
//! # Authentication
//!
//! Authentication is optional. Without a token the client sends anonymous
//! requests (60 per hour per IP). With one, every request carries an
//! `Authorization: Bearer` header. [`GitHubClient::from_env`] reads the token
//! from `GITHUB_TOKEN`.
//!
//! # Pagination
//!
//! Repository listings are paginated. The client follows only the
//! `rel="next"` entry of the `Link` response header and stops as soon as a
//! page carries no such entry. `prev`, `first` and `last` relations are
//! ignored.

use super::{cancellable, ensure_ok, get_ok, read_json, send};
use crate::constants::{
    CONNECT_TIMEOUT, GITHUB_ACCEPT, GITHUB_API_URL, GITHUB_TOKEN_ENV, REQUEST_TIMEOUT, user_agent,
};
use crate::core::{Result, UpdaterError};
use crate::models::{Release, RepoListing};
use crate::version::{Channel, classify};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, LINK};
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Read access to GitHub releases and repository listings.
///
/// Implementations must honour `cancel` and must never return a release with
/// an empty tag.
pub trait GitHubApi: Send + Sync {
    /// The first listed release whose classified channel equals `channel`.
    fn latest_release(
        &self,
        owner: &str,
        repo: &str,
        channel: Channel,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Option<Release>>> + Send;

    /// The first listed release whose tag carries the `.pr.<number>` marker.
    fn release_for_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Option<Release>>> + Send;

    /// Clone URLs of every public repository of a user or organization.
    fn public_repos(
        &self,
        owner_or_org: &str,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Vec<String>>> + Send;
}

impl<T: GitHubApi> GitHubApi for Arc<T> {
    fn latest_release(
        &self,
        owner: &str,
        repo: &str,
        channel: Channel,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Option<Release>>> + Send {
        (**self).latest_release(owner, repo, channel, cancel)
    }

    fn release_for_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Option<Release>>> + Send {
        (**self).release_for_pull_request(owner, repo, number, cancel)
    }

    fn public_repos(
        &self,
        owner_or_org: &str,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Vec<String>>> + Send {
        (**self).public_repos(owner_or_org, cancel)
    }
}

/// Pick the first release belonging to `channel`.
#[must_use]
pub fn filter_releases(releases: Vec<Release>, channel: Channel) -> Option<Release> {
    releases
        .into_iter()
        .filter(|release| !release.tag_name.is_empty())
        .find(|release| classify(&release.tag_name, release.pre_release) == channel)
}

/// Returns `true` when `tag` carries the `.pr.<number>` marker.
///
/// The number must end at a non-digit, so PR 12 does not match `v1.0.0-alpha.pr.123`.
#[must_use]
pub fn tag_matches_pull_request(tag: &str, number: u64) -> bool {
    let marker = format!(".pr.{number}");
    tag.match_indices(&marker).any(|(index, _)| {
        !tag[index + marker.len()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit())
    })
}

/// Pick the first release built from pull request `number`.
#[must_use]
pub fn find_pull_request_release(releases: Vec<Release>, number: u64) -> Option<Release> {
    releases
        .into_iter()
        .find(|release| tag_matches_pull_request(&release.tag_name, number))
}

/// Extract the `rel="next"` target from a `Link` header value.
///
/// ```rust
/// use updater::source::github::next_page_url;
///
/// let header = r#"<https://api.github.com/x?page=3>; rel="next", <https://api.github.com/x?page=1>; rel="prev""#;
/// assert_eq!(next_page_url(header).as_deref(), Some("https://api.github.com/x?page=3"));
/// assert_eq!(next_page_url(r#"<https://api.github.com/x?page=1>; rel="prev""#), None);
/// ```
#[must_use]
pub fn next_page_url(link_header: &str) -> Option<String> {
    link_header.split(',').find_map(|link| {
        let mut parts = link.split(';');
        let target = parts.next()?.trim();
        let url = target.strip_prefix('<')?.strip_suffix('>')?;
        let is_next = parts.any(|param| {
            param
                .trim()
                .strip_prefix("rel=")
                .map(|rel| rel.trim_matches('"'))
                .is_some_and(|rel| rel.split_whitespace().any(|r| r == "next"))
        });
        is_next.then(|| url.to_string())
    })
}

/// GitHub REST API client.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
}

impl GitHubClient {
    /// Create a client, authenticated when `token` is a non-empty string.
    ///
    /// # Errors
    ///
    /// Returns [`UpdaterError::Config`] if the token is not a valid header
    /// value or the HTTP client cannot be initialised.
    pub fn new(token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));

        if let Some(token) = token.filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                UpdaterError::Config {
                    message: "GitHub token contains characters not allowed in a header".to_string(),
                }
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
            debug!("Using authenticated GitHub client");
        } else {
            debug!("Using unauthenticated GitHub client");
        }

        let http = reqwest::Client::builder()
            .user_agent(user_agent())
            .default_headers(headers)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| UpdaterError::Config {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            api_url: GITHUB_API_URL.to_string(),
        })
    }

    /// Create a client using the token in `GITHUB_TOKEN`, if any.
    ///
    /// # Errors
    ///
    /// See [`GitHubClient::new`].
    pub fn from_env() -> Result<Self> {
        let token = std::env::var(GITHUB_TOKEN_ENV).ok();
        Self::new(token.as_deref())
    }

    /// Point the client at a different API root (GitHub Enterprise, tests).
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// The API root requests are sent to.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Fetch the first page (up to 100 entries) of a repository's releases,
    /// newest first.
    ///
    /// # Errors
    ///
    /// Transport errors, non-200 statuses and undecodable bodies.
    pub async fn list_releases(
        &self,
        owner: &str,
        repo: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Release>> {
        let url = format!("{}/repos/{owner}/{repo}/releases?per_page=100", self.api_url);
        debug!("Fetching releases from {}", url);

        let response = get_ok(self.http.get(&url), &url, cancel, "fetch releases").await?;
        let releases: Vec<Release> = read_json(response, &url, cancel, "fetch releases").await?;
        debug!("Fetched {} releases for {}/{}", releases.len(), owner, repo);
        Ok(releases)
    }

    async fn fetch_repo_page(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<(Vec<RepoListing>, Option<String>)> {
        let response = get_ok(self.http.get(url), url, cancel, "list repositories").await?;
        let next = next_link(response.headers());
        let repos = read_json(response, url, cancel, "list repositories").await?;
        Ok((repos, next))
    }
}

fn next_link(headers: &HeaderMap) -> Option<String> {
    headers.get(LINK)?.to_str().ok().and_then(next_page_url)
}

impl GitHubApi for GitHubClient {
    async fn latest_release(
        &self,
        owner: &str,
        repo: &str,
        channel: Channel,
        cancel: &CancellationToken,
    ) -> Result<Option<Release>> {
        let releases = self.list_releases(owner, repo, cancel).await?;
        let release = filter_releases(releases, channel);
        match &release {
            Some(r) => debug!("Latest {} release of {}/{} is {}", channel, owner, repo, r.tag_name),
            None => debug!("No {} release found for {}/{}", channel, owner, repo),
        }
        Ok(release)
    }

    async fn release_for_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        cancel: &CancellationToken,
    ) -> Result<Option<Release>> {
        let releases = self.list_releases(owner, repo, cancel).await?;
        Ok(find_pull_request_release(releases, number))
    }

    async fn public_repos(
        &self,
        owner_or_org: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>> {
        let user_url = format!("{}/users/{owner_or_org}/repos", self.api_url);

        // The first page decides between the user and the organization endpoint.
        let response = send(self.http.get(&user_url), &user_url, cancel, "list repositories").await?;
        let (first_url, response) = if response.status() == StatusCode::OK {
            (user_url, response)
        } else {
            debug!(
                "User listing for {} returned {}, trying organization endpoint",
                owner_or_org,
                response.status()
            );
            let org_url = format!("{}/orgs/{owner_or_org}/repos", self.api_url);
            let response = send(self.http.get(&org_url), &org_url, cancel, "list repositories").await?;
            (org_url.clone(), ensure_ok(response, &org_url)?)
        };

        let mut next = next_link(response.headers());
        let first_page: Vec<RepoListing> =
            read_json(response, &first_url, cancel, "list repositories").await?;
        let mut clone_urls: Vec<String> = first_page.into_iter().map(|r| r.clone_url).collect();

        let mut visited = HashSet::from([first_url]);
        while let Some(url) = next.take() {
            if !visited.insert(url.clone()) {
                warn!("Pagination for {} revisited {}, stopping", owner_or_org, url);
                break;
            }
            let (page, following) = cancellable(cancel, "list repositories", async {
                self.fetch_repo_page(&url, cancel).await
            })
            .await?;
            debug!("Fetched {} repositories from {}", page.len(), url);
            clone_urls.extend(page.into_iter().map(|r| r.clone_url));
            next = following;
        }

        Ok(clone_urls)
    }
}
