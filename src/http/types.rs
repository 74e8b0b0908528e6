//! Request and response bodies for the HTTP API.

use serde::{Deserialize, Serialize};

use crate::record::UserRecord;

/// POST /createUser body.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
}

/// GET /getUser query string.
#[derive(Debug, Deserialize)]
pub struct GetUserQuery {
    #[serde(default)]
    pub username: Option<String>,
}

/// PUT /updateUser body.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, rename = "matchesWon")]
    pub matches_won: Option<MatchesWonInput>,
}

/// `matchesWon` as sent by clients: decimal text, or a bare JSON integer.
///
/// Any other JSON value (floats, integers outside `i64`, booleans) is kept
/// as-is so the record service rejects it with its own message.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MatchesWonInput {
    Text(String),
    Number(i64),
    Other(serde_json::Value),
}

impl MatchesWonInput {
    /// Decimal text form, as parsed by the record service.
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(n) => n.to_string(),
            Self::Other(value) => value.to_string(),
        }
    }
}

/// Response carrying a single record.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub message: &'static str,
    pub user: UserRecord,
}

/// Response carrying only a message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// GET /fetchUsers response.
#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    pub message: &'static str,
    pub data: Vec<ListEntry>,
    /// Entries dropped because they could not be loaded.
    pub skipped: usize,
}

/// One listed user; `userData` is the record encoded as JSON text.
#[derive(Debug, Serialize)]
pub struct ListEntry {
    pub username: String,
    #[serde(rename = "userData")]
    pub user_data: String,
}

/// GET /health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store: &'static str,
}
