//! `updater repos`.

use super::CommandContext;
use crate::source::GitHubApi;
use crate::utils::progress::Spinner;
use anyhow::{Context, Result};
use clap::Args;

/// List public repositories of a GitHub user or organization.
#[derive(Args, Debug, Clone)]
pub struct ReposCommand {
    /// User or organization name.
    pub owner: String,
}

impl ReposCommand {
    /// Print one clone URL per line.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing fails or is cancelled.
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let api = ctx.settings.github_client()?;

        let spinner = Spinner::start(format!("Listing repositories of {}...", self.owner), ctx.progress);
        let result = api.public_repos(&self.owner, &ctx.cancel).await;
        spinner.finish_and_clear();

        let repos = result.with_context(|| format!("Failed to list repositories of {}", self.owner))?;
        for clone_url in repos {
            println!("{clone_url}");
        }
        Ok(())
    }
}
