//! The update service: one check-then-apply sequence per `start()`.
//!
//! An [`UpdateService`] is built from an [`UpdateServiceConfig`], a
//! [`GitHubApi`] and an [`Applier`]. The release source is chosen once, at
//! construction, from the repository URL. `start()` then follows the
//! configured [`StartupMode`]:
//!
//! | Mode | GitHub-backed | HTTP-backed |
//! |------|---------------|-------------|
//! | `NoCheck` | nothing | nothing |
//! | `CheckOnly` | resolve the channel's latest release and report | fetch `latest.json` and report |
//! | `CheckAndApply` | resolve, select the asset, apply | fetch, apply `url` |
//!
//! The applier is called at most once per `start()`, and only when an update
//! is available. Its error is returned as [`UpdaterError::Apply`] without
//! retrying.
//!
//! # Pull-request builds
//!
//! With [`UpdateServiceConfig::pull_request`] set, a GitHub-backed service
//! looks up the release tagged `.pr.<number>` instead of the channel's latest
//! release and skips the version comparison: a PR build is installed on
//! request even when its version is lower than the running one.
//!
//! # Caller obligations
//!
//! The configuration is owned by the service and immutable once built.
//! Concurrent `start()` calls run independently and are not deduplicated; at
//! most one apply may be in flight per installed executable.
//!
//! # Example
//!
//! ```rust,no_run
//! use tokio_util::sync::CancellationToken;
//! use updater::apply::DryRunApplier;
//! use updater::service::{StartupMode, UpdateService, UpdateServiceConfig};
//! use updater::source::GitHubClient;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = UpdateServiceConfig::new("https://github.com/owner/repo")
//!     .with_current_version("1.0.0")
//!     .with_startup_mode(StartupMode::CheckOnly);
//! let service = UpdateService::new(config, GitHubClient::from_env()?, DryRunApplier::new())?;
//! println!("{}", service.start(&CancellationToken::new()).await?);
//! # Ok(())
//! # }
//! ```

mod mode;
mod outcome;

pub use mode::StartupMode;
pub use outcome::StartOutcome;

use crate::apply::Applier;
use crate::artifact::select_url;
use crate::constants::CURRENT_VERSION;
use crate::core::{Result, UpdaterError};
use crate::resolver::{resolve, resolve_info};
use crate::source::{GitHubApi, HttpSource, ReleaseSource, RepoLocation};
use crate::utils::platform::Platform;
use crate::version::{Channel, classify, format_for_display};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Configuration of an [`UpdateService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateServiceConfig {
    /// GitHub repository URL, or the base URL of a generic update server.
    pub repo_url: String,
    /// Channel to follow. `None` infers it from `current_version`.
    pub channel: Option<Channel>,
    /// Version of the running executable.
    pub current_version: String,
    /// What `start()` does.
    pub startup_mode: StartupMode,
    /// Display GitHub versions with (`true`) or without (`false`) a leading `v`.
    pub force_semver_prefix: bool,
    /// Download URL template with `{tag}`, `{os}` and `{arch}` placeholders.
    pub release_url_format: Option<String>,
    /// Install the build of this pull request instead of a channel release.
    pub pull_request: Option<u64>,
}

impl UpdateServiceConfig {
    /// A `NoCheck` configuration for `repo_url` with the crate's own version.
    pub fn new(repo_url: impl Into<String>) -> Self {
        Self {
            repo_url: repo_url.into(),
            channel: None,
            current_version: CURRENT_VERSION.to_string(),
            startup_mode: StartupMode::NoCheck,
            force_semver_prefix: true,
            release_url_format: None,
            pull_request: None,
        }
    }

    /// Follow `channel` instead of the channel of the running version.
    #[must_use]
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Compare against `version` instead of this crate's version.
    #[must_use]
    pub fn with_current_version(mut self, version: impl Into<String>) -> Self {
        self.current_version = version.into();
        self
    }

    /// What [`UpdateService::start`] does.
    #[must_use]
    pub fn with_startup_mode(mut self, mode: StartupMode) -> Self {
        self.startup_mode = mode;
        self
    }

    /// Show GitHub versions with (`true`) or without a leading `v`.
    #[must_use]
    pub fn with_force_semver_prefix(mut self, force: bool) -> Self {
        self.force_semver_prefix = force;
        self
    }

    /// Build download URLs from a `{tag}`/`{os}`/`{arch}` template instead of release assets.
    #[must_use]
    pub fn with_release_url_format(mut self, template: impl Into<String>) -> Self {
        self.release_url_format = Some(template.into());
        self
    }

    /// Target the release built for pull request `number`.
    #[must_use]
    pub fn with_pull_request(mut self, number: u64) -> Self {
        self.pull_request = Some(number);
        self
    }

    /// The configured channel, or the channel the running version belongs to.
    ///
    /// `1.2.0` follows stable, `1.3.0-beta.1` beta and `1.3.0-alpha.2` alpha.
    #[must_use]
    pub fn effective_channel(&self) -> Channel {
        self.channel
            .unwrap_or_else(|| classify(&self.current_version, false))
    }
}

/// Check-then-apply state machine over a [`ReleaseSource`].
#[derive(Debug)]
pub struct UpdateService<G, A> {
    config: UpdateServiceConfig,
    source: ReleaseSource<G>,
    applier: A,
    platform: Platform,
}

impl<G: GitHubApi, A: Applier> UpdateService<G, A> {
    /// Build a service, selecting the release source from `config.repo_url`.
    ///
    /// # Errors
    ///
    /// - [`UpdaterError::InvalidRepoUrl`] for a GitHub URL without owner and repository
    /// - [`UpdaterError::Config`] when a pull request is requested from an HTTP source
    pub fn new(config: UpdateServiceConfig, api: G, applier: A) -> Result<Self> {
        let source = ReleaseSource::from_repo_url(&config.repo_url, api)?;
        if let (Some(number), false) = (config.pull_request, source.is_github()) {
            return Err(UpdaterError::Config {
                message: format!(
                    "pull request #{number} requested, but {} is not a GitHub repository",
                    config.repo_url
                ),
            });
        }

        debug!(
            "Update service for {} ({} source, mode {})",
            config.repo_url,
            if source.is_github() { "GitHub" } else { "HTTP" },
            config.startup_mode
        );
        Ok(Self {
            config,
            source,
            applier,
            platform: Platform::current(),
        })
    }

    /// Select artifacts for `platform` instead of the host.
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// The configuration this service was built with.
    pub const fn config(&self) -> &UpdateServiceConfig {
        &self.config
    }

    /// The release source selected from the repository URL.
    pub const fn source(&self) -> &ReleaseSource<G> {
        &self.source
    }

    /// The injected applier.
    pub const fn applier(&self) -> &A {
        &self.applier
    }

    /// Run the configured startup behaviour once.
    ///
    /// # Errors
    ///
    /// Transport errors and cancellation from the source,
    /// [`UpdaterError::NoSuitableAsset`] when no artifact matches the platform,
    /// and [`UpdaterError::Apply`] when the applier fails.
    pub async fn start(&self, cancel: &CancellationToken) -> Result<StartOutcome> {
        if self.config.startup_mode == StartupMode::NoCheck {
            debug!("Startup mode is {}, skipping update check", self.config.startup_mode);
            return Ok(StartOutcome::Skipped);
        }

        match &self.source {
            ReleaseSource::GitHub { location, api } => match self.config.pull_request {
                Some(number) => self.start_pull_request(api, location, number, cancel).await,
                None => self.start_github(api, location, cancel).await,
            },
            ReleaseSource::Http { base_url, client } => {
                self.start_http(client, base_url, cancel).await
            }
        }
    }

    fn display(&self, version: &str) -> String {
        format_for_display(version, self.config.force_semver_prefix)
    }

    fn applies(&self) -> bool {
        self.config.startup_mode == StartupMode::CheckAndApply
    }

    async fn apply(&self, version: String, url: String) -> Result<StartOutcome> {
        info!("Applying update {} from {}", version, url);
        self.applier.apply(&url).await.map_err(UpdaterError::Apply)?;
        Ok(StartOutcome::Updated { version, url })
    }

    async fn start_github(
        &self,
        api: &G,
        location: &RepoLocation,
        cancel: &CancellationToken,
    ) -> Result<StartOutcome> {
        let current = &self.config.current_version;
        let resolution = resolve(
            api,
            &location.owner,
            &location.repo,
            self.config.effective_channel(),
            current,
            cancel,
        )
        .await?;

        let Some(release) = resolution.release else {
            return Ok(StartOutcome::NoRelease);
        };
        let latest = self.display(&release.tag_name);
        if !resolution.update_available {
            return Ok(StartOutcome::UpToDate {
                current: self.display(current),
                latest,
            });
        }

        info!("Newer version {} found (current: {})", latest, self.display(current));
        if !self.applies() {
            return Ok(StartOutcome::UpdateAvailable {
                current: self.display(current),
                latest,
            });
        }

        let url = select_url(&release, self.config.release_url_format.as_deref(), &self.platform)?;
        self.apply(latest, url).await
    }

    async fn start_pull_request(
        &self,
        api: &G,
        location: &RepoLocation,
        number: u64,
        cancel: &CancellationToken,
    ) -> Result<StartOutcome> {
        let release = api
            .release_for_pull_request(&location.owner, &location.repo, number, cancel)
            .await?;
        let Some(release) = release else {
            return Ok(StartOutcome::PullRequestNotFound { number });
        };

        let version = self.display(&release.tag_name);
        if !self.applies() {
            return Ok(StartOutcome::PullRequestAvailable { number, version });
        }

        let url = select_url(&release, self.config.release_url_format.as_deref(), &self.platform)?;
        self.apply(version, url).await
    }

    async fn start_http(
        &self,
        client: &HttpSource,
        base_url: &str,
        cancel: &CancellationToken,
    ) -> Result<StartOutcome> {
        let current = &self.config.current_version;
        let info = client.latest_info(base_url, cancel).await?;

        if !resolve_info(&info, current) {
            return Ok(StartOutcome::UpToDate {
                current: current.clone(),
                latest: info.version,
            });
        }

        info!("Newer version {} found (current: {})", info.version, current);
        if !self.applies() {
            return Ok(StartOutcome::UpdateAvailable {
                current: current.clone(),
                latest: info.version,
            });
        }
        self.apply(info.version, info.url).await
    }
}
