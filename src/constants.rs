//! Global constants used throughout the updater.
//!
//! Endpoints, header values and environment variable names live here so the
//! sources, the config layer and the CLI agree on them.

use std::time::Duration;

/// Base URL of the public GitHub REST API.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Substring that marks a repository URL as GitHub-hosted.
pub const GITHUB_HOST_MARKER: &str = "github.com";

/// Media type requested from the GitHub REST API.
pub const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// File name fetched from a generic HTTP update server.
pub const LATEST_JSON: &str = "latest.json";

/// Repository the bundled binary updates itself from when nothing is configured.
pub const DEFAULT_REPO_URL: &str = "https://github.com/snider/updater";

/// Environment variable holding an optional GitHub token.
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Environment variable overriding the settings file location.
pub const CONFIG_PATH_ENV: &str = "UPDATER_CONFIG_PATH";

/// Environment variable disabling spinners.
pub const NO_PROGRESS_ENV: &str = "UPDATER_NO_PROGRESS";

/// `User-Agent` sent with every request. GitHub rejects requests without one.
pub fn user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Version of the running binary, used when no override is configured.
pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Connect timeout for all update-related HTTP requests (15 seconds).
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Overall timeout for a single API request (30 seconds).
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
