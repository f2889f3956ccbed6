//! Async facade over the key-value storage table.
//!
//! All reads and writes of persisted state go through [`Store`]. Writes are
//! whole-value replacements with last-write-wins semantics and no merging;
//! the system assumes a single operator at a time. Every successful write or
//! removal publishes a [`StoreChange`](crate::events::StoreChange) so live
//! views can re-read and recompute.

use crate::{
    entities::{StorageEntry, StorageEntryColumn, storage_entry},
    errors::Result,
    events::{ChangeNotifier, StoreChange},
    storage::keys::StorageKey,
};
use sea_orm::{Set, prelude::*};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::broadcast;
use tracing::warn;

/// Handle bundling the database connection with the change notifier.
///
/// Cheap to clone; clones share the same underlying connection and bus.
#[derive(Debug, Clone)]
pub struct Store {
    database: DatabaseConnection,
    notifier: ChangeNotifier,
}

impl Store {
    /// Wraps an established database connection.
    #[must_use]
    pub fn new(database: DatabaseConnection) -> Self {
        Self {
            database,
            notifier: ChangeNotifier::default(),
        }
    }

    /// The underlying connection, exposed for schema setup.
    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.database
    }

    /// Subscribes to change notifications for all keys.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.notifier.subscribe()
    }

    /// Reads the raw JSON text stored under `key`.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn read_raw(&self, key: &StorageKey) -> Result<Option<String>> {
        let entry = StorageEntry::find()
            .filter(StorageEntryColumn::Key.eq(key.as_str()))
            .one(&self.database)
            .await?;
        Ok(entry.map(|model| model.value))
    }

    /// Writes raw JSON text under `key`, inserting the row or replacing the
    /// existing value, then notifies subscribers.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn write_raw(&self, key: &StorageKey, value: String) -> Result<()> {
        let now = chrono::Utc::now().naive_utc();
        let existing = StorageEntry::find()
            .filter(StorageEntryColumn::Key.eq(key.as_str()))
            .one(&self.database)
            .await?;

        if let Some(model) = existing {
            let mut active: storage_entry::ActiveModel = model.into();
            active.value = Set(value);
            active.updated_at = Set(now);
            active.update(&self.database).await?;
        } else {
            let active = storage_entry::ActiveModel {
                key: Set(key.as_str().to_owned()),
                value: Set(value),
                updated_at: Set(now),
                ..Default::default()
            };
            active.insert(&self.database).await?;
        }

        self.notifier.notify(key.as_str());
        Ok(())
    }

    /// Removes the row stored under `key` and notifies subscribers.
    /// Removing an absent key succeeds.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn remove(&self, key: &StorageKey) -> Result<()> {
        StorageEntry::delete_many()
            .filter(StorageEntryColumn::Key.eq(key.as_str()))
            .exec(&self.database)
            .await?;
        self.notifier.notify(key.as_str());
        Ok(())
    }

    /// True when a row exists under `key`, decodable or not.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn contains(&self, key: &StorageKey) -> Result<bool> {
        Ok(self.read_raw(key).await?.is_some())
    }

    /// Decodes the value under `key`, treating corrupt JSON like an absent
    /// value: the parse failure is logged and `None` returned, so callers
    /// fall back to their defaults instead of failing.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn load_json<T: DeserializeOwned>(&self, key: &StorageKey) -> Result<Option<T>> {
        let Some(raw) = self.read_raw(key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(error) => {
                warn!(key = key.as_str(), %error, "discarding corrupt stored value");
                Ok(None)
            }
        }
    }

    /// Like [`Store::load_json`], but falls back to `T::default()` for both
    /// absent and corrupt values.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn load_or_default<T: DeserializeOwned + Default>(
        &self,
        key: &StorageKey,
    ) -> Result<T> {
        Ok(self.load_json(key).await?.unwrap_or_default())
    }

    /// Encodes `value` as JSON and stores it under `key`.
    ///
    /// # Errors
    /// Returns an error if encoding or the database query fails.
    pub async fn save_json<T: Serialize + ?Sized>(
        &self,
        key: &StorageKey,
        value: &T,
    ) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.write_raw(key, raw).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]

    use super::*;
    use crate::test_utils::setup_test_store;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_write_then_read_round_trip() -> Result<()> {
        let store = setup_test_store().await?;
        let key = StorageKey::theme();

        store.write_raw(&key, "\"dark\"".to_owned()).await?;

        let raw = store.read_raw(&key).await?;
        assert_eq!(raw.as_deref(), Some("\"dark\""));
        Ok(())
    }

    #[tokio::test]
    async fn test_read_absent_key_returns_none() -> Result<()> {
        let store = setup_test_store().await?;
        let raw = store.read_raw(&StorageKey::theme()).await?;
        assert!(raw.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_write_twice_keeps_a_single_row() -> Result<()> {
        let store = setup_test_store().await?;
        let key = StorageKey::system_users();

        store.write_raw(&key, "[]".to_owned()).await?;
        store.write_raw(&key, "[1]".to_owned()).await?;

        let rows = StorageEntry::find().all(store.connection()).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, "[1]");
        Ok(())
    }

    #[tokio::test]
    async fn test_remove_deletes_and_tolerates_absent_keys() -> Result<()> {
        let store = setup_test_store().await?;
        let key = StorageKey::activity_logs();

        store.write_raw(&key, "[]".to_owned()).await?;
        store.remove(&key).await?;
        assert!(!store.contains(&key).await?);

        // Second removal is a no-op, not an error.
        store.remove(&key).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_save_and_load_typed_value() -> Result<()> {
        let store = setup_test_store().await?;
        let key = StorageKey::concert_amounts("test");
        let mut amounts = BTreeMap::new();
        amounts.insert("Kaşe".to_owned(), 350_000.0_f64);

        store.save_json(&key, &amounts).await?;

        let loaded: Option<BTreeMap<String, f64>> = store.load_json(&key).await?;
        assert_eq!(loaded.unwrap().get("Kaşe"), Some(&350_000.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_value_reads_as_none() -> Result<()> {
        let store = setup_test_store().await?;
        let key = StorageKey::system_users();

        store.write_raw(&key, "{not json".to_owned()).await?;

        let loaded: Option<Vec<String>> = store.load_json(&key).await?;
        assert!(loaded.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_value_falls_back_to_default() -> Result<()> {
        let store = setup_test_store().await?;
        let key = StorageKey::activity_logs();

        store.write_raw(&key, "][".to_owned()).await?;

        let loaded: Vec<String> = store.load_or_default(&key).await?;
        assert!(loaded.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_writes_notify_subscribers() -> Result<()> {
        let store = setup_test_store().await?;
        let mut receiver = store.subscribe();

        store
            .write_raw(&StorageKey::theme(), "\"light\"".to_owned())
            .await?;
        store.remove(&StorageKey::theme()).await?;

        assert_eq!(receiver.recv().await.unwrap().key, "theme");
        assert_eq!(receiver.recv().await.unwrap().key, "theme");
        Ok(())
    }
}
