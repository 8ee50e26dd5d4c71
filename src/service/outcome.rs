//! Result of a single [`UpdateService::start`](super::UpdateService::start).

use std::fmt;

/// What a `start()` call found and did.
///
/// Versions are stored already formatted for display. `Display` renders the
/// message shown to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// The service is configured not to check.
    Skipped,
    /// The source has no release on the requested channel.
    NoRelease,
    /// The latest release is not newer than the running version.
    UpToDate {
        /// Running version
        current: String,
        /// Latest published version
        latest: String,
    },
    /// A newer release exists and was not applied.
    UpdateAvailable {
        /// Running version
        current: String,
        /// Newer published version
        latest: String,
    },
    /// A newer release was handed to the applier, which succeeded.
    Updated {
        /// Version that was installed
        version: String,
        /// URL the build was installed from
        url: String,
    },
    /// A pull-request build exists and was not applied.
    PullRequestAvailable {
        /// Pull request number
        number: u64,
        /// Tag of the pull-request build
        version: String,
    },
    /// No release carries the requested pull-request marker.
    PullRequestNotFound {
        /// Pull request number
        number: u64,
    },
}

impl StartOutcome {
    /// Returns `true` when the applier ran successfully.
    #[must_use]
    pub const fn is_updated(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }

    /// Returns `true` when a newer build was found but not applied.
    #[must_use]
    pub const fn is_update_available(&self) -> bool {
        matches!(self, Self::UpdateAvailable { .. } | Self::PullRequestAvailable { .. })
    }
}

impl fmt::Display for StartOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped => write!(f, "Update check disabled."),
            Self::NoRelease => write!(f, "No new release found."),
            Self::UpToDate { current, latest } => {
                write!(f, "Current version {current} is up-to-date with latest release {latest}.")
            }
            Self::UpdateAvailable { current, latest } => {
                write!(f, "New release found: {latest} (current version: {current})")
            }
            Self::Updated { version, url } => write!(f, "Updated to {version} from {url}"),
            Self::PullRequestAvailable { number, version } => {
                write!(f, "Release {version} for pull request #{number} is available.")
            }
            Self::PullRequestNotFound { number } => {
                write!(f, "No release found for pull request #{number}.")
            }
        }
    }
}
