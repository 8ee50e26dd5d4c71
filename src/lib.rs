//! updater - self-update resolution for command-line applications
//!
//! A running executable uses this crate to find out whether a newer build of
//! itself exists and, if so, where to download it from and how to hand it to
//! an installer. Releases come from either GitHub releases or a plain web
//! server publishing a `latest.json` file.
//!
//! # Architecture Overview
//!
//! Leaf modules first:
//!
//! - [`version`] - SemVer comparison that tolerates `v` prefixes and shorthand
//!   versions, plus release channel classification
//! - [`artifact`] - picks the download URL for the host platform from a
//!   release's assets or a URL template
//! - [`source`] - GitHub release and repository listings, and the generic
//!   HTTP `latest.json` source
//! - [`resolver`] - fetch-and-compare: is the latest release newer?
//! - [`service`] - the startup-mode state machine tying it together
//! - [`apply`] - the boundary to the injected executable-replacement step
//!
//! Supporting modules:
//!
//! - [`core`] - error types and user-facing error rendering
//! - [`config`] - the user's settings file
//! - [`cli`] - the `updater` binary's commands
//! - [`models`] - wire types for release and update-server JSON
//! - [`utils`] - host platform identifiers and spinners
//! - [`constants`] - endpoints, environment variable names and timeouts
//!
//! # Data Flow
//!
//! ```text
//! UpdateService::start
//!   -> ReleaseSource (GitHub releases | <base>/latest.json)
//!   -> resolver (channel filter, version comparison)
//!   -> artifact::select_url
//!   -> Applier::apply
//! ```
//!
//! # Release Channels
//!
//! | Tag | Pre-release flag | Channel |
//! |-----|------------------|---------|
//! | `v1.0.0-alpha.1` | any | alpha |
//! | `v1.0.0-beta.1` | any | beta |
//! | `v1.0.0-rc.1` | `true` | beta |
//! | `v1.0.0` | `false` | stable |
//!
//! # Example
//!
//! ```rust,no_run
//! use tokio_util::sync::CancellationToken;
//! use updater::apply::DryRunApplier;
//! use updater::service::{StartupMode, UpdateService, UpdateServiceConfig};
//! use updater::source::GitHubClient;
//! use updater::version::Channel;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = UpdateServiceConfig::new("https://github.com/owner/repo")
//!     .with_channel(Channel::Stable)
//!     .with_current_version(env!("CARGO_PKG_VERSION"))
//!     .with_startup_mode(StartupMode::CheckAndApply);
//!
//! let service = UpdateService::new(config, GitHubClient::from_env()?, DryRunApplier::new())?;
//! let outcome = service.start(&CancellationToken::new()).await?;
//! println!("{outcome}");
//! # Ok(())
//! # }
//! ```
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Report whether a newer stable release exists
//! updater --repo-url https://github.com/owner/repo check
//!
//! # Follow the beta channel and apply
//! updater --repo-url https://github.com/owner/repo --channel beta update
//!
//! # Use a generic update server
//! updater --repo-url https://updates.example.com/app check
//! ```

// Resolution engine
pub mod apply;
pub mod artifact;
pub mod resolver;
pub mod service;
pub mod source;
pub mod version;

// Supporting modules
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod models;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
