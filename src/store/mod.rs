//! Key-value store client with pluggable backends.
//!
//! The record service only ever talks to [`KvStore`], which wraps one of:
//!
//! - **RedisBackend**: the production backend (`redis` feature)
//! - **MemoryBackend**: fast, non-persistent storage for tests and local runs
//!
//! # Custom Backends
//!
//! Implement the `KvBackend` trait to use custom storage:
//!
//! ```ignore
//! use scoreboard::store::{KvBackend, KvStore};
//!
//! struct EtcdBackend { /* ... */ }
//! impl KvBackend for EtcdBackend { /* ... */ }
//!
//! let store = KvStore::custom(EtcdBackend::new());
//! ```

mod backend;
mod memory;
#[cfg(feature = "redis")]
mod redis;
mod store;


pub use backend::KvBackend;
pub use memory::MemoryBackend;
#[cfg(feature = "redis")]
pub use self::redis::RedisBackend;
pub use store::KvStore;
