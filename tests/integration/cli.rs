use super::release_json;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// An `updater` command isolated from the user's settings and token.
fn updater(settings_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("updater").unwrap();
    cmd.env("UPDATER_CONFIG_PATH", settings_dir.path().join("config.toml"))
        .env("UPDATER_NO_PROGRESS", "1")
        .env_remove("GITHUB_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

async fn run(mut cmd: Command) -> assert_cmd::assert::Assert {
    tokio::task::spawn_blocking(move || cmd.assert()).await.unwrap()
}

async fn http_server_with(version: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app/latest.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": version,
            "url": format!("https://downloads.example.com/app-{version}")
        })))
        .mount(&server)
        .await;
    server
}

#[test]
fn test_version_and_help() {
    let settings = TempDir::new().unwrap();
    updater(&settings)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));

    updater(&settings)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("update"))
        .stdout(predicate::str::contains("repos"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_check_reports_new_release() {
    let server = http_server_with("1.1.0").await;
    let settings = TempDir::new().unwrap();

    let mut cmd = updater(&settings);
    cmd.args([
        "--repo-url",
        &format!("{}/app", server.uri()),
        "--current-version",
        "1.0.0",
        "check",
    ]);
    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("New release found: 1.1.0 (current version: 1.0.0)"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_uses_dry_run_applier() {
    let server = http_server_with("1.1.0").await;
    let settings = TempDir::new().unwrap();

    let mut cmd = updater(&settings);
    cmd.args([
        "--repo-url",
        &format!("{}/app", server.uri()),
        "--current-version",
        "1.0.0",
        "update",
    ]);
    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("Updated to 1.1.0 from https://downloads.example.com/app-1.1.0"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_settings_file_supplies_repo_url() {
    let server = http_server_with("1.0.0").await;
    let settings = TempDir::new().unwrap();
    std::fs::write(
        settings.path().join("config.toml"),
        format!("repo_url = \"{}/app\"\n", server.uri()),
    )
    .unwrap();

    let mut cmd = updater(&settings);
    cmd.args(["--current-version", "1.0.0", "check"]);
    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("Current version 1.0.0 is up-to-date with latest release 1.0.0."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_error_exits_with_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app/latest.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let settings = TempDir::new().unwrap();

    let mut cmd = updater(&settings);
    cmd.args(["--repo-url", &format!("{}/app", server.uri()), "check"]);
    run(cmd)
        .await
        .failure()
        .code(1)
        .stderr(predicate::str::contains("500"));
}

#[test]
fn test_invalid_inputs_are_rejected() {
    let settings = TempDir::new().unwrap();

    updater(&settings)
        .args(["--channel", "nightly", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nightly"));

    updater(&settings)
        .args(["--repo-url", "https://github.com/only-owner", "check"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid repository URL"));

    updater(&settings)
        .args(["--repo-url", "https://updates.example.com/app", "update", "--pull-request", "4"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("pull request #4"));
}

#[test]
fn test_malformed_settings_file_fails() {
    let settings = TempDir::new().unwrap();
    std::fs::write(settings.path().join("config.toml"), "startup_mode = \"sometimes\"\n").unwrap();

    updater(&settings)
        .arg("check")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse settings"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_github_backed_check_via_settings_api_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/releases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            release_json("v2.0.0", false, &["app-linux-amd64"])
        ])))
        .mount(&server)
        .await;
    let settings = TempDir::new().unwrap();
    std::fs::write(
        settings.path().join("config.toml"),
        format!(
            "repo_url = \"https://github.com/owner/repo\"\napi_url = \"{}\"\n",
            server.uri()
        ),
    )
    .unwrap();

    let mut cmd = updater(&settings);
    cmd.args(["--current-version", "1.0.0", "--channel", "stable", "check"]);
    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("New release found: v2.0.0 (current version: v1.0.0)"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_repos_lists_clone_urls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/snider/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"clone_url": "https://github.com/snider/a.git"},
            {"clone_url": "https://github.com/snider/b.git"}
        ])))
        .mount(&server)
        .await;
    let settings = TempDir::new().unwrap();
    std::fs::write(
        settings.path().join("config.toml"),
        format!("api_url = \"{}\"\n", server.uri()),
    )
    .unwrap();

    let mut cmd = updater(&settings);
    cmd.args(["repos", "snider"]);
    run(cmd)
        .await
        .success()
        .stdout("https://github.com/snider/a.git\nhttps://github.com/snider/b.git\n");
}
