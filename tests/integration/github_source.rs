use super::{client_for, release_json};
use serde_json::json;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use updater::core::UpdaterError;
use updater::source::{GitHubApi, GitHubClient};
use updater::version::Channel;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn serve_releases(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/releases"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            release_json("v2.0.0-alpha.1", true, &["app-linux-amd64"]),
            release_json("v1.5.0-rc.1", true, &["app-linux-amd64"]),
            release_json("v1.4.0", false, &["app-linux-amd64", "app-darwin-arm64"]),
            release_json("v1.3.1-beta.pr.123", true, &["app-linux-amd64"]),
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_latest_release_per_channel() {
    let server = MockServer::start().await;
    serve_releases(&server).await;
    let client = client_for(&server);
    let cancel = CancellationToken::new();

    let stable = client.latest_release("owner", "repo", Channel::Stable, &cancel).await.unwrap();
    assert_eq!(stable.unwrap().tag_name, "v1.4.0");

    let beta = client.latest_release("owner", "repo", Channel::Beta, &cancel).await.unwrap();
    assert_eq!(beta.unwrap().tag_name, "v1.5.0-rc.1");

    let alpha = client.latest_release("owner", "repo", Channel::Alpha, &cancel).await.unwrap().unwrap();
    assert_eq!(alpha.tag_name, "v2.0.0-alpha.1");
    assert!(alpha.pre_release);
    assert_eq!(
        alpha.assets[0].download_url,
        "https://downloads.example.com/v2.0.0-alpha.1/app-linux-amd64"
    );
}

#[tokio::test]
async fn test_no_release_on_channel_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/releases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([release_json("v1.0.0", false, &[])])))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .latest_release("owner", "repo", Channel::Alpha, &CancellationToken::new())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_release_for_pull_request() {
    let server = MockServer::start().await;
    serve_releases(&server).await;
    let client = client_for(&server);
    let cancel = CancellationToken::new();

    let found = client.release_for_pull_request("owner", "repo", 123, &cancel).await.unwrap();
    assert_eq!(found.unwrap().tag_name, "v1.3.1-beta.pr.123");

    let prefix_only = client.release_for_pull_request("owner", "repo", 12, &cancel).await.unwrap();
    assert!(prefix_only.is_none());
}

#[tokio::test]
async fn test_release_listing_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/missing/releases"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/broken/releases"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let cancel = CancellationToken::new();

    let err = client.latest_release("owner", "missing", Channel::Stable, &cancel).await.unwrap_err();
    assert!(matches!(err, UpdaterError::HttpStatus { status: 404, .. }));

    let err = client.latest_release("owner", "broken", Channel::Stable, &cancel).await.unwrap_err();
    assert!(matches!(err, UpdaterError::InvalidResponse { .. }));
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_bearer_token_sent_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/releases"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([release_json("v1.0.0", false, &[])])))
        .expect(1)
        .mount(&server)
        .await;

    let client = GitHubClient::new(Some("test-token")).unwrap().with_api_url(server.uri());
    let release = client
        .latest_release("owner", "repo", Channel::Stable, &CancellationToken::new())
        .await
        .unwrap();
    assert!(release.is_some());
}

#[tokio::test]
async fn test_public_repos_follows_next_links() {
    let server = MockServer::start().await;
    let page2 = format!("{}/users/snider/repos?page=2", server.uri());
    let page3 = format!("{}/users/snider/repos?page=3", server.uri());

    Mock::given(method("GET"))
        .and(path("/users/snider/repos"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", format!(r#"<{page3}>; rel="next", <{}/users/snider/repos>; rel="prev""#, server.uri()))
                .set_body_json(json!([{"clone_url": "https://github.com/snider/b.git"}])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/snider/repos"))
        .and(query_param("page", "3"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", format!(r#"<{page2}>; rel="prev""#))
                .set_body_json(json!([{"clone_url": "https://github.com/snider/c.git"}])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/snider/repos"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", format!(r#"<{page2}>; rel="next", <{page3}>; rel="last""#))
                .set_body_json(json!([{"clone_url": "https://github.com/snider/a.git"}])),
        )
        .mount(&server)
        .await;

    let repos = client_for(&server)
        .public_repos("snider", &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(
        repos,
        vec![
            "https://github.com/snider/a.git",
            "https://github.com/snider/b.git",
            "https://github.com/snider/c.git",
        ]
    );
}

#[tokio::test]
async fn test_public_repos_prev_only_stops() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/snider/repos"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", format!(r#"<{}/users/snider/repos?page=1>; rel="prev""#, server.uri()))
                .set_body_json(json!([{"clone_url": "https://github.com/snider/only.git"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let repos = client_for(&server)
        .public_repos("snider", &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(repos, vec!["https://github.com/snider/only.git"]);
}

#[tokio::test]
async fn test_public_repos_self_link_does_not_loop() {
    let server = MockServer::start().await;
    let first = format!("{}/users/snider/repos", server.uri());
    Mock::given(method("GET"))
        .and(path("/users/snider/repos"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", format!(r#"<{first}>; rel="next""#))
                .set_body_json(json!([{"clone_url": "https://github.com/snider/a.git"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let repos = client_for(&server)
        .public_repos("snider", &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(repos.len(), 1);
}

#[tokio::test]
async fn test_public_repos_falls_back_to_org() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/acme/repos"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orgs/acme/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"clone_url": "https://github.com/acme/tools.git"},
            {"clone_url": "https://github.com/acme/site.git"}
        ])))
        .mount(&server)
        .await;

    let repos = client_for(&server)
        .public_repos("acme", &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(repos, vec!["https://github.com/acme/tools.git", "https://github.com/acme/site.git"]);
}

#[tokio::test]
async fn test_public_repos_fails_when_both_endpoints_fail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/ghost/repos"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orgs/ghost/repos"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .public_repos("ghost", &CancellationToken::new())
        .await
        .unwrap_err();
    match err {
        UpdaterError::HttpStatus { url, status } => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/orgs/ghost/repos"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_cancelled_before_first_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();
    let client = client_for(&server);

    let err = client.public_repos("snider", &cancel).await.unwrap_err();
    assert!(matches!(err, UpdaterError::Cancelled { .. }));
    let err = client.latest_release("owner", "repo", Channel::Stable, &cancel).await.unwrap_err();
    assert!(matches!(err, UpdaterError::Cancelled { .. }));
}

#[tokio::test]
async fn test_cancellation_interrupts_slow_page() {
    let server = MockServer::start().await;
    let page2 = format!("{}/users/snider/repos?page=2", server.uri());
    Mock::given(method("GET"))
        .and(path("/users/snider/repos"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(10))
                .set_body_json(json!([{"clone_url": "https://github.com/snider/late.git"}])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/snider/repos"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", format!(r#"<{page2}>; rel="next""#))
                .set_body_json(json!([{"clone_url": "https://github.com/snider/a.git"}])),
        )
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let started = std::time::Instant::now();
    let err = client_for(&server).public_repos("snider", &cancel).await.unwrap_err();
    assert!(matches!(err, UpdaterError::Cancelled { .. }));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_public_repos_stops_when_link_header_missing() {
    let server = MockServer::start().await;
    let page2 = format!("{}/users/snider/repos?page=2", server.uri());
    Mock::given(method("GET"))
        .and(path("/users/snider/repos"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"clone_url": "https://github.com/snider/b.git"}])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/snider/repos"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", format!(r#"<{page2}>; rel="next""#))
                .set_body_json(json!([{"clone_url": "https://github.com/snider/a.git"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let repos = client_for(&server)
        .public_repos("snider", &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(repos, vec!["https://github.com/snider/a.git", "https://github.com/snider/b.git"]);
}
