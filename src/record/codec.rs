//! JSON encoding of user records stored as KV values.
//!
//! Stored layout: `{"username": "<name>", "matchesWon": <i64>}`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A player record: the username and how many matches they have won.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub username: String,
    pub matches_won: i64,
}

impl UserRecord {
    /// Creates a fresh record with zero wins.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            matches_won: 0,
        }
    }

    /// Creates a record with the given win count.
    pub fn with_wins(username: impl Into<String>, matches_won: i64) -> Self {
        Self {
            username: username.into(),
            matches_won,
        }
    }
}

/// Encodes a record into the bytes stored in the KV store.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if serialization fails.
pub fn encode(record: &UserRecord) -> Result<Vec<u8>> {
    serde_json::to_vec(record).map_err(|e| Error::encoding(&record.username, e))
}

/// Encodes a record as JSON text.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if serialization fails.
pub fn encode_text(record: &UserRecord) -> Result<String> {
    serde_json::to_string(record).map_err(|e| Error::encoding(&record.username, e))
}

/// Decodes the value stored for `username` and checks it belongs there.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if the bytes are not a record, or if the
/// record's username differs from `username`.
pub fn decode(username: &str, bytes: &[u8]) -> Result<UserRecord> {
    let record: UserRecord =
        serde_json::from_slice(bytes).map_err(|e| Error::encoding(username, e))?;
    if record.username != username {
        return Err(Error::encoding(
            username,
            format!("record belongs to '{}'", record.username),
        ));
    }
    Ok(record)
}
