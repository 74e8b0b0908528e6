//! In-memory KV storage backend.
//!
//! Provides a fast, non-persistent key-value store using DashMap for
//! concurrent access. Used by the test suite and by `scoreboard serve --memory`
//! for local development without a Redis server.

use super::backend::KvBackend;
use anyhow::{Result, bail};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory key-value storage backend using DashMap.
///
/// All data is lost when the process exits. Conditional writes go through
/// the shard-locked entry API, so they are atomic with respect to each other.
#[derive(Default)]
pub struct MemoryBackend {
    data: DashMap<String, Vec<u8>>,
    closed: AtomicBool,
}

impl MemoryBackend {
    /// Creates a new empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries in the store.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            bail!("memory store is closed");
        }
        Ok(())
    }
}

#[async_trait]
impl KvBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.ensure_open()?;
        Ok(self.data.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.ensure_open()?;
        self.data.insert(key.to_string(), value);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        self.ensure_open()?;
        Ok(self
            .data
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| entry.key().clone())
            .collect())
    }

    async fn set_if_absent(&self, key: &str, value: Vec<u8>) -> Result<bool> {
        self.ensure_open()?;
        match self.data.entry(key.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(true)
            },
        }
    }

    async fn set_if_present(&self, key: &str, value: Vec<u8>) -> Result<bool> {
        self.ensure_open()?;
        match self.data.get_mut(key) {
            Some(mut entry) => {
                *entry = value;
                Ok(true)
            },
            None => Ok(false),
        }
    }

    async fn ping(&self) -> Result<()> {
        self.ensure_open()
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
