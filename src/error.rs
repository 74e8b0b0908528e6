//! Error types for typed error handling.
//!
//! Every record operation returns [`Error`]; the HTTP layer turns it into a
//! status code with [`Error::status_code`].

/// Result type for record and store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Registry errors with structured context.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Malformed or missing request input.
    #[error("{0}")]
    Validation(String),

    /// No record is stored under the requested username.
    #[error("{0}")]
    NotFound(String),

    /// The KV store rejected the operation or could not be reached.
    #[error("store error: {0:#}")]
    Store(#[source] anyhow::Error),

    /// A KV store call exceeded its deadline.
    #[error("store {op} timed out after {timeout_ms}ms")]
    StoreTimeout { op: &'static str, timeout_ms: u64 },

    /// A stored value could not be decoded into a record.
    #[error("malformed record under key '{key}': {reason}")]
    Encoding { key: String, reason: String },
}

impl Error {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create the standard "user not found" error.
    pub fn user_not_found() -> Self {
        Self::NotFound("user not found".to_string())
    }

    /// Create an encoding error for the value stored under `key`.
    pub fn encoding(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::Encoding {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Get the appropriate HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Store(_) | Self::StoreTimeout { .. } | Self::Encoding { .. } => 500,
        }
    }

    /// Returns true for failures of the backing store rather than the request.
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            Self::Store(_) | Self::StoreTimeout { .. } | Self::Encoding { .. }
        )
    }
}
