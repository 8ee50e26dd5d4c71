use serde_json::json;
use tokio_util::sync::CancellationToken;
use updater::core::UpdaterError;
use updater::source::HttpSource;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn serve_latest(server: &MockServer, at: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_latest_info_decodes_and_ignores_extra_fields() {
    let server = MockServer::start().await;
    serve_latest(
        &server,
        "/app/latest.json",
        ResponseTemplate::new(200).set_body_json(json!({
            "version": "1.2.3",
            "url": "https://downloads.example.com/app-1.2.3",
            "notes": "bug fixes"
        })),
    )
    .await;

    let info = HttpSource::new()
        .unwrap()
        .latest_info(&format!("{}/app/", server.uri()), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(info.version, "1.2.3");
    assert_eq!(info.url, "https://downloads.example.com/app-1.2.3");
}

#[tokio::test]
async fn test_missing_field_is_invalid_response() {
    let server = MockServer::start().await;
    serve_latest(
        &server,
        "/latest.json",
        ResponseTemplate::new(200).set_body_json(json!({"version": "1.2.3"})),
    )
    .await;

    let err = HttpSource::new()
        .unwrap()
        .latest_info(&server.uri(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, UpdaterError::InvalidResponse { .. }));
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let server = MockServer::start().await;
    serve_latest(&server, "/latest.json", ResponseTemplate::new(200).set_body_string("{not json")).await;

    let err = HttpSource::new()
        .unwrap()
        .latest_info(&server.uri(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, UpdaterError::InvalidResponse { .. }));
}

#[tokio::test]
async fn test_non_200_is_fatal_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest.json"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let err = HttpSource::new()
        .unwrap()
        .latest_info(&server.uri(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, UpdaterError::HttpStatus { status: 503, .. }));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let err = HttpSource::new()
        .unwrap()
        .latest_info("http://127.0.0.1:9", &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, UpdaterError::Network { .. }));
}
