/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! HTTP-level tests for ApiClient against a local mock server.

use std::rc::Rc;

use fitbro_api_client::{ApiClient, ApiConfig, ApiError, Method, StaticToken, TokenSource};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, tokens: impl TokenSource + 'static) -> ApiClient {
    let config = ApiConfig::new(&format!("{}/api", server.uri())).unwrap();
    ApiClient::new(config, Rc::new(tokens))
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Booking {
    id: u32,
    trainer: String,
}

#[tokio::test]
async fn attaches_bearer_token_and_parses_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/bookings/7"))
        .and(header("authorization", "Bearer token-123"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7, "trainer": "Sam"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, StaticToken::new("token-123"));
    let booking: Booking = client.get("/bookings/7").await.unwrap();
    assert_eq!(
        booking,
        Booking {
            id: 7,
            trainer: "Sam".to_string()
        }
    );
}

#[tokio::test]
async fn sends_empty_authorization_when_signed_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/plans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server, StaticToken::none());
    let plans: Vec<Value> = client.get("plans").await.unwrap();
    assert!(plans.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let auth = requests[0]
        .headers
        .get("authorization")
        .expect("authorization header is always sent");
    assert_eq!(auth.to_str().unwrap(), "");
}

#[tokio::test]
async fn post_serializes_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/bookings"))
        .and(body_json(json!({"id": 1, "trainer": "Kim"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1, "trainer": "Kim"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, StaticToken::new("t"));
    let created: Booking = client
        .post(
            "/bookings",
            &Booking {
                id: 1,
                trainer: "Kim".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(created.trainer, "Kim");
}

#[tokio::test]
async fn unauthorized_maps_to_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/profile"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "expired"})))
        .mount(&server)
        .await;

    let client = client_for(&server, StaticToken::new("stale"));
    let err = client.request("/profile", Method::GET, None).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "Authentication failed. Please log in again.");
}

#[tokio::test]
async fn error_message_is_taken_from_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/bookings/3"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"message": "Session already started"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, StaticToken::new("t"));
    match client.delete::<Value>("/bookings/3").await {
        Err(ApiError::Request { status, message }) => {
            assert_eq!(status, 409);
            assert_eq!(message, "Session already started");
        }
        other => panic!("expected Request error, got {other:?}"),
    }
}

#[tokio::test]
async fn error_without_message_uses_default() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/plans/9"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let client = client_for(&server, StaticToken::new("t"));
    let err = client
        .put::<_, Value>("/plans/9", &json!({"weeks": 4}))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "An error occurred");
}

#[tokio::test]
async fn empty_success_body_is_null() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/plans/9"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_for(&server, StaticToken::new("t"));
    let value = client
        .request("/plans/9", Method::PATCH, Some(&json!({"weeks": 6})))
        .await
        .unwrap();
    assert_eq!(value, Value::Null);
}

struct FailingTokens;

#[async_trait::async_trait(?Send)]
impl TokenSource for FailingTokens {
    async fn bearer_token(&self) -> Result<Option<String>, ApiError> {
        Err(ApiError::Token("refresh failed".to_string()))
    }
}

#[tokio::test]
async fn token_failure_skips_the_request() {
    let server = MockServer::start().await;
    let client = client_for(&server, FailingTokens);
    let err = client.request("/plans", Method::GET, None).await.unwrap_err();
    assert!(matches!(err, ApiError::Token(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}
