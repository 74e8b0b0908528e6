//! HTTP API for the player registry.
//!
//! Routes:
//!
//! - `POST /createUser` - create a record unless it exists
//! - `GET  /getUser?username=` and `GET /getUser/{username}` - fetch one record
//! - `PUT  /updateUser` - replace a record's win count
//! - `GET  /fetchUsers` - list all records sorted by username
//! - `GET  /health` - store liveness
//! - `GET  /metrics` - Prometheus metrics, when enabled

mod handlers;
pub mod types;

use std::time::Duration;

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tracing::error;

use crate::config::ServerConfig;
use crate::constants;
use crate::error::Error;
use crate::record::RecordService;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub records: RecordService,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(records: RecordService) -> Self {
        Self {
            records,
            metrics: None,
        }
    }

    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Errors returned by handlers, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(msg) => Self::BadRequest(msg),
            Error::NotFound(msg) => Self::NotFound(msg),
            other => {
                error!(error = %other, "Request failed");
                Self::Internal(other.to_string())
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Build the router with CORS, request timeout and body limit applied.
pub fn router(state: AppState, server: &ServerConfig) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(cors_layer(&server.cors_origins))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(server.request_timeout_secs),
        ));

    Router::new()
        .route("/createUser", post(handlers::create_user))
        .route("/getUser", get(handlers::get_user_by_query))
        .route("/getUser/{username}", get(handlers::get_user_by_path))
        .route("/updateUser", put(handlers::update_user))
        .route("/fetchUsers", get(handlers::fetch_users))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(DefaultBodyLimit::max(constants::MAX_BODY_BYTES))
        .layer(middleware)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(Any)
}
