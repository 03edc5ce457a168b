//! Tests for the HTTP transport module

use super::*;
use crate::auth::{BearerCredentials, CredentialsProvider};
use crate::config::ClientConfig;
use crate::error::Error;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(base_url: &str) -> ClientConfig {
    ClientConfig::builder()
        .base_url(base_url)
        .app_name("transport-tests")
        .max_retries(3)
        .max_backoff(Duration::from_millis(20))
        .disable_gzip()
        .build()
}

fn transport_for(config: ClientConfig) -> HttpTransport {
    let credentials: Arc<dyn CredentialsProvider> = Arc::new(BearerCredentials::new("test-token"));
    HttpTransport::new(Arc::new(config), credentials).unwrap()
}

#[tokio::test]
async fn test_success_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models/spaces"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [{"space": "plant"}]
        })))
        .mount(&server)
        .await;

    let transport = transport_for(test_config(&server.uri()));
    let descriptor = RequestDescriptor::get(format!("{}/models/spaces", server.uri()));
    let result = transport.request_with_retries(descriptor).await.unwrap();

    match result {
        RequestResult::Success { status, text, .. } => {
            assert_eq!(status, 200);
            assert!(text.contains("plant"));
        }
        other => panic!("expected success, got {other:?}"),
    }
}

#[tokio::test]
async fn test_standard_headers_on_the_wire() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/instances"))
        .and(header("Authorization", "Bearer test-token"))
        .and(header("x-client-app", "transport-tests"))
        .and(header("x-api-subversion", "beta"))
        .and(header_exists("x-client-sdk"))
        .and(header_exists("User-Agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": []})))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri());
    config.api_subversion = Some("beta".to_string());
    let transport = transport_for(config);

    let descriptor = RequestDescriptor::post(format!("{}/models/instances", server.uri()))
        .json(serde_json::json!({"items": []}));
    let result = transport.request_with_retries(descriptor).await.unwrap();
    assert!(result.is_success());
}

#[tokio::test]
async fn test_gzip_content_encoding() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/instances"))
        .and(header("Content-Encoding", "gzip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": []})))
        .expect(1)
        .mount(&server)
        .await;

    // Same config but with compression left on
    let config = ClientConfig::builder()
        .base_url(server.uri())
        .app_name("transport-tests")
        .max_backoff(Duration::from_millis(20))
        .build();
    let transport = transport_for(config);

    let descriptor = RequestDescriptor::post(format!("{}/models/instances", server.uri()))
        .json(serde_json::json!({"items": []}));
    let result = transport.request_with_retries(descriptor).await.unwrap();
    assert!(result.is_success());
}

#[tokio::test]
async fn test_failed_response_parses_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/instances"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": {
                "code": 400,
                "message": "space does not exist",
                "missing": [{"space": "nope"}]
            }
        })))
        .mount(&server)
        .await;

    let transport = transport_for(test_config(&server.uri()));
    let descriptor = RequestDescriptor::post(format!("{}/models/instances", server.uri()))
        .json(serde_json::json!({"items": []}));
    let result = transport.request_with_retries(descriptor).await.unwrap();

    match result {
        RequestResult::FailedResponse { status, details } => {
            assert_eq!(status, 400);
            assert_eq!(details.message, "space does not exist");
            assert_eq!(details.missing.unwrap().len(), 1);
        }
        other => panic!("expected failed response, got {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_response_degrades_on_plain_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&server)
        .await;

    let transport = transport_for(test_config(&server.uri()));
    let descriptor = RequestDescriptor::get(format!("{}/broken", server.uri()));
    let result = transport.request_with_retries(descriptor).await.unwrap();

    match result {
        RequestResult::FailedResponse { status, details } => {
            assert_eq!(status, 404);
            assert_eq!(details.code, 404);
            assert_eq!(details.message, "Not found");
        }
        other => panic!("expected failed response, got {other:?}"),
    }
}

#[tokio::test]
async fn test_retries_503_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&server)
        .await;

    let transport = transport_for(test_config(&server.uri()));
    let descriptor = RequestDescriptor::get(format!("{}/flaky", server.uri()));
    let result = transport.request_with_retries(descriptor).await.unwrap();

    assert!(result.is_success());
}

#[tokio::test]
async fn test_retryable_status_exhausts_to_failed_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/always-503"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(3) // initial attempt + 2 retries
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri());
    config.max_status_retries = 2;
    let transport = transport_for(config);

    let descriptor = RequestDescriptor::get(format!("{}/always-503", server.uri()));
    let result = transport.request_with_retries(descriptor).await.unwrap();

    match result {
        RequestResult::FailedResponse { status, .. } => assert_eq!(status, 503),
        other => panic!("expected failed response, got {other:?}"),
    }
}

#[tokio::test]
async fn test_429_retry_after_is_honored() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/limited"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "0")
                .set_body_string("slow down"),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/limited"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&server)
        .await;

    let transport = transport_for(test_config(&server.uri()));
    let descriptor = RequestDescriptor::get(format!("{}/limited", server.uri()));
    let result = transport.request_with_retries(descriptor).await.unwrap();

    assert!(result.is_success());
}

#[tokio::test]
async fn test_redirect_is_surfaced_not_followed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/moved"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/elsewhere"))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport_for(test_config(&server.uri()));
    let descriptor = RequestDescriptor::get(format!("{}/moved", server.uri()));
    let result = transport.request_with_retries(descriptor).await.unwrap();

    match result {
        RequestResult::FailedResponse { status, .. } => assert_eq!(status, 302),
        other => panic!("expected surfaced redirect, got {other:?}"),
    }
}

#[tokio::test]
async fn test_read_timeout_exhausts_to_failed_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200).set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri());
    config.timeout = Duration::from_millis(50);
    config.max_read_retries = 1;
    let transport = transport_for(config);

    let descriptor = RequestDescriptor::get(format!("{}/slow", server.uri()));
    let result = transport.request_with_retries(descriptor).await.unwrap();

    match result {
        RequestResult::FailedRequest { message } => {
            assert!(message.contains("timed out"), "{message}");
        }
        other => panic!("expected failed request, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connect_failure_exhausts_to_failed_request() {
    // Nothing listens on this port; connection is refused immediately
    let mut config = test_config("http://127.0.0.1:1");
    config.max_connect_retries = 1;
    let transport = transport_for(config);

    let descriptor = RequestDescriptor::get("http://127.0.0.1:1/unreachable");
    let result = transport.request_with_retries(descriptor).await.unwrap();

    assert!(matches!(result, RequestResult::FailedRequest { .. }));
}

#[tokio::test]
async fn test_spent_descriptor_fails_before_any_network_call() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let transport = transport_for(test_config(&server.uri()));
    let descriptor = RequestDescriptor::get(format!("{}/any", server.uri())).bump_status();

    let err = transport.request_with_retries(descriptor).await.unwrap_err();
    match err {
        Error::AlreadyAttempted { attempts } => assert_eq!(attempts, 1),
        other => panic!("expected usage error, got {other:?}"),
    }
}
