//! Record lifecycle on top of the KV store.
//!
//! A record is created once with zero wins, read back whole, and replaced
//! whole on update. There is no delete.

use tracing::{debug, warn};

use super::codec::{self, UserRecord};
use super::types::{CreateOutcome, Created, Listing};
use crate::error::{Error, Result};
use crate::metrics;
use crate::store::KvStore;

/// Creates, reads, updates and lists user records.
///
/// Cheap to clone; every clone shares the same store handle.
#[derive(Clone)]
pub struct RecordService {
    store: KvStore,
    prefix: String,
}

impl RecordService {
    /// Creates a service storing records under `prefix` + username.
    pub fn new(store: KvStore, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// Returns the underlying store handle.
    pub fn store(&self) -> &KvStore {
        &self.store
    }

    fn key(&self, username: &str) -> String {
        format!("{}{username}", self.prefix)
    }

    /// Creates a zero-win record unless one already exists.
    ///
    /// Uses the store's create-only write, so two concurrent callers for the
    /// same new username cannot both observe `Created` on backends with a
    /// native conditional write.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if `username` is empty
    /// - [`Error::Encoding`] if the existing value is not a valid record
    /// - [`Error::Store`] / [`Error::StoreTimeout`] on store failure
    pub async fn create_if_absent(&self, username: &str) -> Result<Created> {
        if username.is_empty() {
            return Err(Error::validation("username is required"));
        }

        let key = self.key(username);
        let record = UserRecord::new(username);
        let result = self.create_inner(&key, record).await;
        metrics::record_operation("create", outcome_label(&result));
        result
    }

    async fn create_inner(&self, key: &str, record: UserRecord) -> Result<Created> {
        let encoded = codec::encode(&record)?;
        if self.store.set_if_absent(key, &encoded).await? {
            debug!(username = %record.username, "Created user record");
            return Ok(Created {
                outcome: CreateOutcome::Created,
                record,
            });
        }

        let existing = self.load(&record.username).await?;
        debug!(username = %record.username, "User record already exists");
        Ok(Created {
            outcome: CreateOutcome::AlreadyExists,
            record: existing,
        })
    }

    /// Reads the record for `username`.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if `username` is empty
    /// - [`Error::NotFound`] if no record exists
    /// - [`Error::Encoding`] if the stored value is not a valid record
    /// - [`Error::Store`] / [`Error::StoreTimeout`] on store failure
    pub async fn fetch(&self, username: &str) -> Result<UserRecord> {
        if username.is_empty() {
            return Err(Error::validation("username is required"));
        }
        let result = self.load(username).await;
        metrics::record_operation("fetch", outcome_label(&result));
        result
    }

    async fn load(&self, username: &str) -> Result<UserRecord> {
        let bytes = self
            .store
            .get(&self.key(username))
            .await?
            .ok_or_else(Error::user_not_found)?;
        codec::decode(username, &bytes)
    }

    /// Replaces the record for `username` with one holding `matches_won_text`.
    ///
    /// The prior value is never merged: the new record overwrites it whole.
    /// Concurrent updates are last-writer-wins.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if either field is missing, `username` is
    ///   empty, or `matches_won_text` is not a decimal integer
    /// - [`Error::NotFound`] if no record exists
    /// - [`Error::Store`] / [`Error::StoreTimeout`] on store failure
    pub async fn update(
        &self,
        username: Option<&str>,
        matches_won_text: Option<&str>,
    ) -> Result<UserRecord> {
        let (Some(username), Some(text)) = (username, matches_won_text) else {
            return Err(Error::validation("username and matchesWon are required"));
        };
        if username.is_empty() {
            return Err(Error::validation("username and matchesWon are required"));
        }
        let matches_won: i64 = text
            .parse()
            .map_err(|_| Error::validation("invalid matchesWon value"))?;

        let record = UserRecord::with_wins(username, matches_won);
        let result = self.update_inner(record).await;
        metrics::record_operation("update", outcome_label(&result));
        result
    }

    async fn update_inner(&self, record: UserRecord) -> Result<UserRecord> {
        let encoded = codec::encode(&record)?;
        if !self
            .store
            .set_if_present(&self.key(&record.username), &encoded)
            .await?
        {
            return Err(Error::user_not_found());
        }
        debug!(
            username = %record.username,
            matches_won = record.matches_won,
            "Updated user record"
        );
        Ok(record)
    }

    /// Lists every record, sorted ascending by username.
    ///
    /// Best effort: keys that vanish, fail to load, or hold something other
    /// than a record are skipped and counted in [`Listing::skipped`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] / [`Error::StoreTimeout`] only if the key
    /// enumeration itself fails.
    pub async fn list_all(&self) -> Result<Listing> {
        let keys = match self.store.list_keys(&self.prefix).await {
            Ok(keys) => keys,
            Err(e) => {
                metrics::record_operation("list", "error");
                return Err(e);
            },
        };

        let mut listing = Listing::default();
        for key in keys {
            let Some(username) = key.strip_prefix(self.prefix.as_str()) else {
                listing.skipped += 1;
                continue;
            };
            match self.load(username).await {
                Ok(record) => listing.records.push(record),
                Err(e) => {
                    debug!(%key, error = %e, "Skipping key in listing");
                    listing.skipped += 1;
                },
            }
        }

        listing
            .records
            .sort_unstable_by(|a, b| a.username.as_bytes().cmp(b.username.as_bytes()));

        if listing.skipped > 0 {
            warn!(
                skipped = listing.skipped,
                returned = listing.records.len(),
                "Listing skipped entries that could not be loaded"
            );
            metrics::record_listing_skipped(listing.skipped);
        }
        metrics::record_operation("list", "ok");
        Ok(listing)
    }
}

fn outcome_label<T>(result: &Result<T>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(Error::Validation(_)) => "invalid",
        Err(Error::NotFound(_)) => "not_found",
        Err(_) => "error",
    }
}
