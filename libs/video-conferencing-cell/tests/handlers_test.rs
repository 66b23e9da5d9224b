use std::sync::Arc;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_utils::test_utils::{MockGraphResponses, TestConfig};
use video_conferencing_cell::router::meeting_routes;

async fn get_health(config: shared_config::AppConfig) -> (StatusCode, serde_json::Value) {
    let app = meeting_routes(Arc::new(config));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_not_configured() {
    let mut config = TestConfig::default().to_app_config();
    config.graph_client_id = "".to_string();

    let (status, json) = get_health(config).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(json["error"].as_str().unwrap().contains("not configured"));
}

#[tokio::test]
async fn test_health_reports_access_check() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/test-tenant/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockGraphResponses::token_response("t")))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1.0/users/citas@clinic.test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "mail": "citas@clinic.test" })))
        .mount(&mock_server)
        .await;

    let (status, json) = get_health(TestConfig::with_mock_server(&mock_server.uri()).to_app_config()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["status"], 200);
}

#[tokio::test]
async fn test_health_without_mailbox_is_bad_gateway() {
    let mut config = TestConfig::default().to_app_config();
    config.graph_mailbox = None;

    let (status, json) = get_health(config).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["success"], false);
    assert!(json["status"].is_null());
    assert_eq!(json["body"], "No mailbox configured");
}
