//! Test doubles for the updater's injection points.
//!
//! - [`MockGitHub`] serves a fixed release and repository list through the
//!   same filtering the real client applies, and records every call
//! - [`RecordingApplier`] records download URLs and can be told to fail
//!
//! Both are available to unit tests and, through the `test-utils` feature,
//! to the integration suite.
//!
//! # Example
//!
//! ```rust,no_run
//! use updater::models::Release;
//! use updater::test_utils::{MockGitHub, RecordingApplier};
//!
//! let api = MockGitHub::new().with_releases(vec![Release::new("v1.1.0")]);
//! let applier = RecordingApplier::succeeding();
//! assert!(api.calls().is_empty());
//! assert!(applier.calls().is_empty());
//! ```

use crate::apply::{ApplyError, Applier};
use crate::core::{Result, UpdaterError};
use crate::models::Release;
use crate::source::GitHubApi;
use crate::source::github::{filter_releases, find_pull_request_release};
use crate::version::Channel;
use std::sync::{Mutex, Once};
use tokio_util::sync::CancellationToken;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Install a test-friendly `tracing` subscriber once per process.
///
/// Uses `level` when given, otherwise `RUST_LOG`; with neither, logging
/// stays off.
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// In-memory [`GitHubApi`].
#[derive(Debug, Default)]
pub struct MockGitHub {
    releases: Vec<Release>,
    repos: Vec<String>,
    failure: Option<UpdaterError>,
    calls: Mutex<Vec<String>>,
}

impl MockGitHub {
    /// A mock with no releases and no repositories.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Releases listed newest first, as the API would.
    #[must_use]
    pub fn with_releases(mut self, releases: Vec<Release>) -> Self {
        self.releases = releases;
        self
    }

    /// Clone URLs returned by [`GitHubApi::public_repos`].
    #[must_use]
    pub fn with_repos(mut self, repos: Vec<String>) -> Self {
        self.repos = repos;
        self
    }

    /// Make every call fail with `error`.
    #[must_use]
    pub fn failing(mut self, error: UpdaterError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Calls received so far, e.g. `latest_release owner/repo stable`.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn record(&self, call: String, cancel: &CancellationToken) -> Result<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if cancel.is_cancelled() {
            return Err(UpdaterError::cancelled("mock GitHub request"));
        }
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl GitHubApi for MockGitHub {
    async fn latest_release(
        &self,
        owner: &str,
        repo: &str,
        channel: Channel,
        cancel: &CancellationToken,
    ) -> Result<Option<Release>> {
        self.record(format!("latest_release {owner}/{repo} {channel}"), cancel)?;
        Ok(filter_releases(self.releases.clone(), channel))
    }

    async fn release_for_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        cancel: &CancellationToken,
    ) -> Result<Option<Release>> {
        self.record(format!("release_for_pull_request {owner}/{repo} {number}"), cancel)?;
        Ok(find_pull_request_release(self.releases.clone(), number))
    }

    async fn public_repos(&self, owner_or_org: &str, cancel: &CancellationToken) -> Result<Vec<String>> {
        self.record(format!("public_repos {owner_or_org}"), cancel)?;
        Ok(self.repos.clone())
    }
}

/// [`Applier`] that records URLs and returns a preset result.
#[derive(Debug, Default)]
pub struct RecordingApplier {
    failure: Option<ApplyError>,
    calls: Mutex<Vec<String>>,
}

impl RecordingApplier {
    /// An applier whose every call succeeds.
    #[must_use]
    pub fn succeeding() -> Self {
        Self::default()
    }

    /// An applier whose every call fails with `error`.
    #[must_use]
    pub fn failing(error: ApplyError) -> Self {
        Self {
            failure: Some(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// URLs passed to [`Applier::apply`], oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

impl Applier for RecordingApplier {
    async fn apply(&self, download_url: &str) -> std::result::Result<(), ApplyError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(download_url.to_string());
        }
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}
