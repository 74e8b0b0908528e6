//! Player win-count registry backed by a key-value store.
//!
//! Records are `{username, matchesWon}` pairs stored one per key. The
//! [`record::RecordService`] implements their lifecycle (create-if-absent,
//! fetch, whole-record update, sorted listing) on top of a
//! [`store::KvStore`], and [`http`] exposes it over HTTP.
//!
//! ```ignore
//! use scoreboard::{record::RecordService, store::KvStore};
//!
//! let records = RecordService::new(KvStore::memory(), "");
//! records.create_if_absent("alice").await?;
//! records.update(Some("alice"), Some("3")).await?;
//! assert_eq!(records.fetch("alice").await?.matches_won, 3);
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod http;
pub mod logging;
pub mod metrics;
pub mod record;
pub mod retry;
pub mod server;
pub mod store;

pub use error::{Error, Result};
