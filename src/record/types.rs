//! Result types returned by the record service.

use super::codec::UserRecord;

/// Whether `create_if_absent` wrote a new record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

impl CreateOutcome {
    /// Message shown to clients for this outcome.
    pub fn message(self) -> &'static str {
        match self {
            Self::Created => "User created successfully",
            Self::AlreadyExists => "User already exists",
        }
    }
}

/// The record returned by `create_if_absent`, tagged with what happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub outcome: CreateOutcome,
    pub record: UserRecord,
}

/// Best-effort listing of all records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Records sorted ascending by username (byte-wise).
    pub records: Vec<UserRecord>,
    /// Keys that were enumerated but could not be fetched or decoded.
    pub skipped: usize,
}
