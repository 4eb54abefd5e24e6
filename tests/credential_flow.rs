//! Flight credential lifecycle against a mock token endpoint.

use std::sync::Arc;
use std::time::Duration;

use cleartrip_relay::auth::{AuthError, CredentialManager, HttpTokenEndpoint};
use cleartrip_relay::config::FlightPartnerConfig;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn manager(server: &MockServer, margin: Duration) -> Arc<CredentialManager> {
    let config = FlightPartnerConfig {
        base_url: server.uri(),
        username: "agent".into(),
        password: "secret".into(),
        tenant_id: "tenant-1".into(),
    };
    let endpoint = HttpTokenEndpoint::new(reqwest::Client::new(), config, Duration::from_secs(5));
    Arc::new(CredentialManager::new(Arc::new(endpoint), margin))
}

#[tokio::test]
async fn test_concurrent_callers_share_one_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({
            "username": "agent",
            "password": "secret",
            "tenant_id": "tenant-1",
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access_token": "tok-1", "expires_in": 3600 }))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let credentials = manager(&server, Duration::from_secs(300));
    let mut handles = Vec::new();
    for _ in 0..20 {
        let credentials = credentials.clone();
        handles.push(tokio::spawn(async move { credentials.get_token().await }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), "tok-1");
    }
}

#[tokio::test]
async fn test_expired_token_refreshes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-1",
            "refresh_token": "ref-1",
            "expires_in": 1,
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(json!({ "refresh_token": "ref-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-2",
            "expires_in": 3600,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let credentials = manager(&server, Duration::ZERO);
    assert_eq!(credentials.get_token().await.unwrap(), "tok-1");

    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_eq!(credentials.get_token().await.unwrap(), "tok-2");
}

#[tokio::test]
async fn test_rejected_refresh_falls_back_to_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-1",
            "refresh_token": "ref-1",
            "expires_in": 1,
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-3",
            "expires_in": 3600,
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "expired" })))
        .expect(1)
        .mount(&server)
        .await;

    let credentials = manager(&server, Duration::ZERO);
    assert_eq!(credentials.get_token().await.unwrap(), "tok-1");

    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_eq!(credentials.get_token().await.unwrap(), "tok-3");
}

#[tokio::test]
async fn test_rejected_login_reports_partner_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "bad password" })))
        .mount(&server)
        .await;

    let credentials = manager(&server, Duration::from_secs(300));
    match credentials.get_token().await {
        Err(AuthError::Rejected { status, body }) => {
            assert_eq!(status, 401);
            assert_eq!(body["detail"], "bad password");
        }
        other => panic!("expected rejection, got {:?}", other),
    }
    assert!(!credentials.snapshot().await.cached);
}

#[tokio::test]
async fn test_malformed_token_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let credentials = manager(&server, Duration::from_secs(300));
    assert!(matches!(
        credentials.get_token().await,
        Err(AuthError::Malformed(_))
    ));
}
