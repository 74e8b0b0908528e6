//! Backend trait for the KV store.
//!
//! Defines the capability set the record service needs from a key-value
//! store (exact get, unconditional set, prefix enumeration) plus the
//! conditional writes that backends may provide natively.

use anyhow::Result;
use async_trait::async_trait;

/// Backend trait for key-value storage.
///
/// All backends must be thread-safe (`Send + Sync`) for use with tokio.
///
/// The conditional writes have default implementations built from `get` and
/// `set`. Those defaults are check-then-act and can race with concurrent
/// writers; backends with a native conditional write must override them.
///
/// # Example
///
/// ```ignore
/// use scoreboard::store::{KvBackend, MemoryBackend};
///
/// let backend = MemoryBackend::new();
/// backend.set("alice", b"{}".to_vec()).await?;
/// let value = backend.get("alice").await?;
/// ```
#[async_trait]
pub trait KvBackend: Send + Sync + 'static {
    /// Retrieves a value by key.
    ///
    /// Returns `Ok(None)` if the key doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores a key-value pair, overwriting any existing value.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Lists all keys starting with `prefix`.
    ///
    /// An empty prefix enumerates the whole namespace. Order is unspecified.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;

    /// Stores the value only if the key does not exist yet.
    ///
    /// Returns `Ok(true)` if the value was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn set_if_absent(&self, key: &str, value: Vec<u8>) -> Result<bool> {
        if self.get(key).await?.is_some() {
            return Ok(false);
        }
        self.set(key, value).await?;
        Ok(true)
    }

    /// Overwrites the value only if the key already exists.
    ///
    /// Returns `Ok(true)` if the value was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn set_if_present(&self, key: &str, value: Vec<u8>) -> Result<bool> {
        if self.get(key).await?.is_none() {
            return Ok(false);
        }
        self.set(key, value).await?;
        Ok(true)
    }

    /// Checks that the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot serve requests.
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    /// Releases the backend's resources.
    ///
    /// Calls made after `close` fail.
    ///
    /// # Errors
    ///
    /// Returns an error if shutdown fails.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
