//! Command-line interface for the `updater` binary.
//!
//! # Commands
//!
//! - `check`: look for a newer build and report it
//! - `update`: look for a newer build and hand it to the applier
//! - `repos <OWNER>`: list clone URLs of a user's or organization's public repositories
//!
//! # Global Options
//!
//! - `--repo-url <URL>`: GitHub repository or generic update server
//! - `--channel <stable|beta|alpha>`: release channel (default: the running version's channel)
//! - `--current-version <VERSION>`: pretend to be this version
//! - `--force-semver-prefix <BOOL>`: show versions with (`true`) or without (`false`) a `v`
//! - `--release-url-format <TEMPLATE>`: download URL template (`{tag}`, `{os}`, `{arch}`)
//! - `--config <PATH>`: settings file (default `~/.updater/config.toml`)
//! - `-v`/`--verbose`, `-q`/`--quiet`, `--no-progress`
//!
//! Flags override the settings file; see [`crate::config`].
//!
//! The bundled binary installs nothing: `update` uses
//! [`DryRunApplier`](crate::apply::DryRunApplier), which reports the URL it
//! would install from. Programs embedding the updater inject their own
//! [`Applier`](crate::apply::Applier) through [`UpdateService`](crate::service::UpdateService).
//!
//! # Examples
//!
//! ```bash
//! updater check
//! updater --repo-url https://github.com/owner/repo --channel beta check
//! updater --repo-url https://updates.example.com/app update
//! updater update --pull-request 42
//! updater repos snider
//! ```

mod check;
mod repos;

use crate::config::{SettingsOverrides, UpdaterSettings};
use crate::service::StartupMode;
use crate::version::Channel;
use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

pub use check::CheckCommand;
pub use repos::ReposCommand;

/// Runtime settings derived from the global flags.
///
/// Kept separate from [`Cli`] so tests can build one directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Maximum log level for the updater's own targets.
    pub log_level: String,
    /// Hide spinners.
    pub no_progress: bool,
    /// Settings file to load instead of the default.
    pub config_path: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            no_progress: false,
            config_path: None,
        }
    }
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global `tracing` subscriber, writing to stderr.
    ///
    /// `RUST_LOG` wins over [`CliConfig::log_level`] when set. Calling this
    /// twice is harmless.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("updater={}", self.log_level)));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Shared state handed to every subcommand.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Contents of the settings file.
    pub settings: UpdaterSettings,
    /// Values from global flags.
    pub overrides: SettingsOverrides,
    /// Whether spinners may be drawn.
    pub progress: bool,
    /// Fires on Ctrl-C.
    pub cancel: CancellationToken,
}

/// Check for and apply updates from GitHub releases or a generic HTTP server.
#[derive(Parser, Debug)]
#[command(
    name = "updater",
    about = "Check for and apply updates from GitHub releases or a generic HTTP server",
    version,
    long_about = "updater resolves the newest build of an application on a release channel, \
                  from GitHub releases or from a plain web server publishing latest.json."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// GitHub repository URL or generic update server base URL.
    #[arg(long, global = true, value_name = "URL")]
    repo_url: Option<String>,

    /// Release channel to follow: stable, beta or alpha.
    ///
    /// Defaults to the channel of the running version.
    #[arg(long, global = true, value_name = "CHANNEL")]
    channel: Option<Channel>,

    /// Version to compare against instead of this binary's own version.
    #[arg(long, global = true, value_name = "VERSION")]
    current_version: Option<String>,

    /// Display versions with (true) or without (false) a leading 'v'.
    #[arg(long, global = true, value_name = "BOOL", action = ArgAction::Set)]
    force_semver_prefix: Option<bool>,

    /// Download URL template; {tag}, {os} and {arch} are substituted.
    #[arg(long, global = true, value_name = "TEMPLATE")]
    release_url_format: Option<String>,

    /// Path to the settings file.
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable spinners.
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check for a newer release without applying it
    Check(CheckCommand),

    /// Check for a newer release and apply it
    Update(CheckCommand),

    /// List clone URLs of a user's or organization's public repositories
    Repos(ReposCommand),
}

impl Cli {
    /// Build the runtime configuration and run the selected command.
    ///
    /// # Errors
    ///
    /// Returns the command's error, with context for the user.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translate the global flags into a [`CliConfig`].
    ///
    /// `--verbose` logs at debug, `--quiet` at error, the default at warn.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };

        CliConfig {
            log_level: log_level.to_string(),
            no_progress: self.no_progress || self.quiet,
            config_path: self.config.clone(),
        }
    }

    /// Values from the global flags that override the settings file.
    #[must_use]
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            repo_url: self.repo_url.clone(),
            channel: self.channel,
            current_version: self.current_version.clone(),
            startup_mode: None,
            force_semver_prefix: self.force_semver_prefix,
            release_url_format: self.release_url_format.clone(),
            pull_request: None,
        }
    }

    /// Run the selected command with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file cannot be loaded or the command fails.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        let settings = UpdaterSettings::load_with_optional(config.config_path.clone()).await?;

        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                on_interrupt.cancel();
            }
        });

        let ctx = CommandContext {
            settings,
            overrides: self.overrides(),
            progress: !config.no_progress,
            cancel,
        };

        match self.command {
            Commands::Check(cmd) => cmd.execute(&ctx, StartupMode::CheckOnly).await,
            Commands::Update(cmd) => cmd.execute(&ctx, StartupMode::CheckAndApply).await,
            Commands::Repos(cmd) => cmd.execute(&ctx).await,
        }
    }
}
