//! User settings for the `updater` binary.
//!
//! Settings live in a TOML file so a user can pin a repository, channel or
//! token once instead of passing flags on every run.
//!
//! # Location
//!
//! - **Unix/macOS**: `~/.updater/config.toml`
//! - **Windows**: `%LOCALAPPDATA%\updater\config.toml`
//! - **Override**: `--config <path>` or the `UPDATER_CONFIG_PATH` environment variable
//!
//! A missing file is not an error; every key falls back to its default.
//!
//! # Format
//!
//! ```toml
//! repo_url = "https://github.com/owner/repo"
//! channel = "beta"
//! startup_mode = "check-only"
//! force_semver_prefix = true
//! release_url_format = "https://dl.example.com/{tag}/app-{os}-{arch}"
//! github_token = "ghp_..."
//! api_url = "https://github.example.com/api/v3"
//! ```
//!
//! # Precedence
//!
//! Command-line flags win over the environment (`GITHUB_TOKEN`), which wins
//! over the file, which wins over built-in defaults.
//!
//! # Security
//!
//! The file may hold a GitHub token. [`UpdaterSettings::save_to`] restricts it
//! to the owner on Unix, and the token is never logged.

use crate::constants::{CONFIG_PATH_ENV, CURRENT_VERSION, DEFAULT_REPO_URL, GITHUB_TOKEN_ENV};
use crate::service::{StartupMode, UpdateServiceConfig};
use crate::source::GitHubClient;
use crate::version::Channel;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Contents of the settings file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdaterSettings {
    /// GitHub repository URL or generic update server base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,

    /// Channel to follow. Unset means "the channel of the running version".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<Channel>,

    /// Startup mode used by embedders that read this file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startup_mode: Option<StartupMode>,

    /// Display versions with a leading `v`. Defaults to `true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_semver_prefix: Option<bool>,

    /// Download URL template with `{tag}`, `{os}` and `{arch}` placeholders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_url_format: Option<String>,

    /// GitHub token. `GITHUB_TOKEN` takes precedence when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,

    /// GitHub API root, for GitHub Enterprise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

/// Values supplied on the command line. `None` defers to the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    /// `--repo-url`.
    pub repo_url: Option<String>,
    /// `--channel`.
    pub channel: Option<Channel>,
    /// `--current-version`; otherwise the version this binary was built as.
    pub current_version: Option<String>,
    /// Set by the subcommand rather than a flag.
    pub startup_mode: Option<StartupMode>,
    /// `--force-semver-prefix`.
    pub force_semver_prefix: Option<bool>,
    /// `--release-url-format`.
    pub release_url_format: Option<String>,
    /// `--pull-request` on `check` or `update`.
    pub pull_request: Option<u64>,
}

impl UpdaterSettings {
    /// Load settings from `path`, or from the default location when `None`.
    ///
    /// A missing file yields default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };
        if path.exists() {
            Self::load_from(&path).await
        } else {
            debug!("No settings file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load settings from the default location.
    ///
    /// # Errors
    ///
    /// See [`UpdaterSettings::load_with_optional`].
    pub async fn load() -> Result<Self> {
        Self::load_with_optional(None).await
    }

    /// Load settings from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid settings TOML.
    /// An unknown channel or startup mode is reported as a parse error.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        let settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))?;
        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings as pretty TOML, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create settings directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mut perms = fs::metadata(path)
                .await
                .with_context(|| format!("Failed to read permissions for {}", path.display()))?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms).await.with_context(|| {
                format!("Failed to set permissions on {}", path.display())
            })?;
        }

        Ok(())
    }

    /// Settings file location: `UPDATER_CONFIG_PATH` if set, else the platform default.
    ///
    /// # Errors
    ///
    /// Returns an error if the home (or, on Windows, local data) directory
    /// cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }

        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("updater")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".updater")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// The GitHub token to use: `GITHUB_TOKEN` first, then the file.
    #[must_use]
    pub fn github_token(&self) -> Option<String> {
        std::env::var(GITHUB_TOKEN_ENV)
            .ok()
            .filter(|token| !token.is_empty())
            .or_else(|| self.github_token.clone().filter(|token| !token.is_empty()))
    }

    /// A GitHub client configured with this file's token and API root.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value.
    pub fn github_client(&self) -> Result<GitHubClient> {
        let client = GitHubClient::new(self.github_token().as_deref())
            .context("Failed to create GitHub client")?;
        Ok(match &self.api_url {
            Some(api_url) => client.with_api_url(api_url),
            None => client,
        })
    }

    /// Merge command-line overrides over these settings.
    #[must_use]
    pub fn service_config(&self, overrides: &SettingsOverrides) -> UpdateServiceConfig {
        let repo_url = overrides
            .repo_url
            .clone()
            .or_else(|| self.repo_url.clone())
            .unwrap_or_else(|| DEFAULT_REPO_URL.to_string());

        let mut config = UpdateServiceConfig::new(repo_url)
            .with_current_version(
                overrides
                    .current_version
                    .clone()
                    .unwrap_or_else(|| CURRENT_VERSION.to_string()),
            )
            .with_startup_mode(
                overrides
                    .startup_mode
                    .or(self.startup_mode)
                    .unwrap_or_default(),
            )
            .with_force_semver_prefix(
                overrides
                    .force_semver_prefix
                    .or(self.force_semver_prefix)
                    .unwrap_or(true),
            );

        config.channel = overrides.channel.or(self.channel);
        config.release_url_format = overrides
            .release_url_format
            .clone()
            .or_else(|| self.release_url_format.clone())
            .filter(|template| !template.is_empty());
        config.pull_request = overrides.pull_request;
        config
    }
}
