//! Record handlers.
//!
//! Each handler validates the request shape, calls the record service, and
//! maps the result into the response body clients expect.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::IntoResponse,
};

use super::types::{
    CreateUserRequest, GetUserQuery, HealthResponse, ListEntry, ListUsersResponse,
    MessageResponse, UpdateUserRequest, UserResponse,
};
use super::{AppError, AppState};
use crate::record::codec;

/// POST /createUser - Create a record unless one exists.
pub(crate) async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, AppError> {
    let Json(req) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let username = req.username.unwrap_or_default();

    let created = state.records.create_if_absent(&username).await?;
    Ok(Json(UserResponse {
        message: created.outcome.message(),
        user: created.record,
    }))
}

/// GET /getUser?username= - Fetch a record by query parameter.
pub(crate) async fn get_user_by_query(
    State(state): State<AppState>,
    query: Result<Query<GetUserQuery>, QueryRejection>,
) -> Result<Json<UserResponse>, AppError> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    fetch(&state, &query.username.unwrap_or_default()).await
}

/// GET /getUser/{username} - Fetch a record by path segment.
pub(crate) async fn get_user_by_path(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    fetch(&state, &username).await
}

async fn fetch(state: &AppState, username: &str) -> Result<Json<UserResponse>, AppError> {
    let record = state.records.fetch(username).await?;
    Ok(Json(UserResponse {
        message: "User details",
        user: record,
    }))
}

/// PUT /updateUser - Replace a record's win count.
pub(crate) async fn update_user(
    State(state): State<AppState>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(req) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let matches_won = req.matches_won.map(|m| m.into_text());

    state
        .records
        .update(req.username.as_deref(), matches_won.as_deref())
        .await?;
    Ok(Json(MessageResponse {
        message: "User updated successfully",
    }))
}

/// GET /fetchUsers - List every record sorted by username.
pub(crate) async fn fetch_users(
    State(state): State<AppState>,
) -> Result<Json<ListUsersResponse>, AppError> {
    let listing = state.records.list_all().await?;

    let data = listing
        .records
        .iter()
        .map(|record| {
            Ok(ListEntry {
                username: record.username.clone(),
                user_data: codec::encode_text(record)?,
            })
        })
        .collect::<crate::Result<Vec<_>>>()?;

    Ok(Json(ListUsersResponse {
        message: "List of all users",
        data,
        skipped: listing.skipped,
    }))
}

/// GET /health - Report whether the store answers.
pub(crate) async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.records.store().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                store: "up",
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded",
                    store: "down",
                }),
            )
        },
    }
}

/// GET /metrics - Prometheus text exposition.
pub(crate) async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let handle = state
        .metrics
        .as_ref()
        .ok_or_else(|| AppError::NotFound("metrics are disabled".to_string()))?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    ))
}
