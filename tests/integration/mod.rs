//! Integration test suite for updater
//!
//! End-to-end tests against local HTTP fakes (`wiremock`) standing in for the
//! GitHub REST API and for generic update servers. No test touches the real
//! network.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **github_source**: release listing, channel filtering, pagination and fallback
//! - **http_source**: `latest.json` fetching and validation
//! - **service**: startup modes end to end over both backends
//! - **cli**: the `updater` binary

mod cli;
mod github_source;
mod http_source;

use serde_json::{Value, json};
use updater::source::GitHubClient;
use wiremock::MockServer;

/// A GitHub release object as the REST API returns it.
pub fn release_json(tag: &str, prerelease: bool, assets: &[&str]) -> Value {
    json!({
        "tag_name": tag,
        "name": tag,
        "prerelease": prerelease,
        "draft": false,
        "assets": assets
            .iter()
            .map(|name| json!({
                "name": name,
                "browser_download_url": format!("https://downloads.example.com/{tag}/{name}"),
                "size": 1024,
            }))
            .collect::<Vec<_>>(),
    })
}

/// A GitHub client pointed at `server`.
pub fn client_for(server: &MockServer) -> GitHubClient {
    GitHubClient::new(None).unwrap().with_api_url(server.uri())
}
