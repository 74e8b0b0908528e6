//! Shared helpers for HTTP integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use scoreboard::config::ServerConfig;
use scoreboard::http::{AppState, router};
use scoreboard::record::RecordService;
use scoreboard::store::KvStore;

/// A router over an in-memory store, plus direct access to that store.
pub struct TestApp {
    pub router: Router,
    pub store: KvStore,
}

/// Response status, headers and body parsed as JSON (`Null` if not JSON).
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_prefix("")
    }

    pub fn with_prefix(prefix: &str) -> Self {
        let store = KvStore::memory();
        Self::with_store(store, prefix, &ServerConfig::default())
    }

    pub fn with_store(store: KvStore, prefix: &str, server: &ServerConfig) -> Self {
        let records = RecordService::new(store.clone(), prefix);
        let router = router(AppState::new(records), server);
        Self { router, store }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn json(&self, method: Method, uri: &str, body: Value) -> TestResponse {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn create(&self, username: &str) -> TestResponse {
        self.json(
            Method::POST,
            "/createUser",
            serde_json::json!({ "username": username }),
        )
        .await
    }

    pub async fn update(&self, username: &str, matches_won: &str) -> TestResponse {
        self.json(
            Method::PUT,
            "/updateUser",
            serde_json::json!({ "username": username, "matchesWon": matches_won }),
        )
        .await
    }
}
