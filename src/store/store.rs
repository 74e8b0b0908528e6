//! High-level `KvStore` wrapper over backend implementations.
//!
//! Every call is bounded by the store deadline and returns the crate's
//! typed [`Error`](crate::Error) instead of a bare backend error.

use super::backend::KvBackend;
use super::memory::MemoryBackend;
use crate::constants;
use crate::error::{Error, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Shared handle to the key-value store.
///
/// `KvStore` is `Clone` and is built once at startup, then shared by every
/// request. Each operation is wrapped in [`tokio::time::timeout`] so a
/// stalled store cannot hold a request forever.
///
/// # Example
///
/// ```ignore
/// use scoreboard::store::KvStore;
///
/// let store = KvStore::memory();
/// store.set("alice", br#"{"username":"alice","matchesWon":0}"#).await?;
/// assert!(store.get("alice").await?.is_some());
/// ```
#[derive(Clone)]
pub struct KvStore {
    backend: Arc<dyn KvBackend>,
    timeout: Duration,
}

impl KvStore {
    /// Creates a new `KvStore` backed by an in-memory store.
    ///
    /// All data is lost when the process exits.
    pub fn memory() -> Self {
        Self::custom(MemoryBackend::new())
    }

    /// Connects a new `KvStore` to Redis.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial connection cannot be established.
    #[cfg(feature = "redis")]
    pub async fn redis(addr: &str, password: &str) -> anyhow::Result<Self> {
        let backend = super::redis::RedisBackend::connect(addr, password).await?;
        Ok(Self::custom(backend))
    }

    /// Creates a new `KvStore` with a custom backend.
    pub fn custom<B: KvBackend>(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
            timeout: Duration::from_millis(constants::DEFAULT_STORE_TIMEOUT_MS),
        }
    }

    /// Sets the deadline applied to every store call.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the deadline applied to every store call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Retrieves a value by key; `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] or [`Error::StoreTimeout`].
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.bounded("get", self.backend.get(key)).await
    }

    /// Stores a value, overwriting any existing one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] or [`Error::StoreTimeout`].
    pub async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.bounded("set", self.backend.set(key, value.to_vec()))
            .await
    }

    /// Stores a value only if `key` is absent. Returns whether it was written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] or [`Error::StoreTimeout`].
    pub async fn set_if_absent(&self, key: &str, value: &[u8]) -> Result<bool> {
        self.bounded("set_if_absent", self.backend.set_if_absent(key, value.to_vec()))
            .await
    }

    /// Overwrites a value only if `key` exists. Returns whether it was written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] or [`Error::StoreTimeout`].
    pub async fn set_if_present(&self, key: &str, value: &[u8]) -> Result<bool> {
        self.bounded(
            "set_if_present",
            self.backend.set_if_present(key, value.to_vec()),
        )
        .await
    }

    /// Lists all keys starting with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] or [`Error::StoreTimeout`].
    pub async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        self.bounded("list", self.backend.list(prefix)).await
    }

    /// Checks that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] or [`Error::StoreTimeout`].
    pub async fn ping(&self) -> Result<()> {
        self.bounded("ping", self.backend.ping()).await
    }

    /// Closes the underlying backend. Later calls fail with [`Error::Store`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] or [`Error::StoreTimeout`].
    pub async fn close(&self) -> Result<()> {
        self.bounded("close", self.backend.close()).await
    }

    async fn bounded<T>(
        &self,
        op: &'static str,
        fut: impl Future<Output = anyhow::Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(Error::Store),
            Err(_) => Err(Error::StoreTimeout {
                op,
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }
}
