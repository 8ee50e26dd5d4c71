//! `updater check` and `updater update`.

use super::CommandContext;
use crate::apply::DryRunApplier;
use crate::service::{StartupMode, UpdateService};
use crate::utils::progress::Spinner;
use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

/// Options shared by `check` and `update`.
#[derive(Args, Debug, Clone, Default)]
pub struct CheckCommand {
    /// Use the build of this pull request instead of the channel's latest release.
    ///
    /// Pull-request builds are installed even when their version is lower
    /// than the running one. Requires a GitHub repository.
    #[arg(long, value_name = "NUMBER")]
    pub pull_request: Option<u64>,
}

impl CheckCommand {
    /// Resolve and report, applying when `mode` is [`StartupMode::CheckAndApply`].
    ///
    /// # Errors
    ///
    /// Returns an error if the service cannot be built or the check fails.
    pub async fn execute(self, ctx: &CommandContext, mode: StartupMode) -> Result<()> {
        let mut overrides = ctx.overrides.clone();
        overrides.startup_mode = Some(mode);
        overrides.pull_request = self.pull_request;
        let config = ctx.settings.service_config(&overrides);
        debug!(
            "Checking {} on channel {} as version {}",
            config.repo_url,
            config.effective_channel(),
            config.current_version
        );

        let api = ctx.settings.github_client()?;
        let service = UpdateService::new(config, api, DryRunApplier::new())
            .context("Failed to create update service")?;

        let spinner = Spinner::start("Checking for updates...", ctx.progress);
        let result = service.start(&ctx.cancel).await;
        spinner.finish_and_clear();

        let outcome = result?;
        println!("{outcome}");
        Ok(())
    }
}
