// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the DocumentStore trait.
//!
//! Documents are opaque JSON bodies keyed by `(collection, key)`. Updates
//! perform a shallow top-level field merge inside the single writer thread,
//! so a merge never interleaves with another write.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{OptionalExtension, params};
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::debug;

use charla_config::model::StoreConfig;
use charla_core::{AdapterType, CharlaError, DocumentStore, HealthStatus, PluginAdapter};

use crate::database::{Database, map_tr_err, store_err, unwrap_call_err};

/// SQLite-backed document store.
///
/// The database connection is lazily opened on the first call to
/// [`DocumentStore::initialize`].
pub struct SqliteDocumentStore {
    config: StoreConfig,
    db: OnceCell<Database>,
}

impl SqliteDocumentStore {
    /// Create a new store with the given configuration.
    ///
    /// The database connection is not opened until [`DocumentStore::initialize`]
    /// is called.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, CharlaError> {
        self.db.get().ok_or_else(|| CharlaError::Store {
            source: "store not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteDocumentStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, CharlaError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CharlaError> {
        if let Some(db) = self.db.get() {
            db.connection()
                .call(|conn| {
                    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                    Ok(())
                })
                .await
                .map_err(map_tr_err)?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn initialize(&self) -> Result<(), CharlaError> {
        let db = Database::open(&self.config.database_path).await?;
        self.db.set(db).map_err(|_| CharlaError::Store {
            source: "store already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite document store initialized");
        Ok(())
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>, CharlaError> {
        let db = self.db()?;
        let collection = collection.to_string();
        let key = key.to_string();
        let body: Option<String> = db
            .connection()
            .call(move |conn| {
                let body = conn
                    .query_row(
                        "SELECT body FROM documents WHERE collection = ?1 AND key = ?2",
                        params![collection, key],
                        |row| row.get(0),
                    )
                    .optional()?;
                Ok(body)
            })
            .await
            .map_err(map_tr_err)?;

        match body {
            Some(json) => {
                let value = serde_json::from_str(&json).map_err(|e| CharlaError::Store {
                    source: Box::new(e),
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn create(
        &self,
        collection: &str,
        key: &str,
        body: Value,
    ) -> Result<(), CharlaError> {
        let db = self.db()?;
        let collection = collection.to_string();
        let key = key.to_string();
        let json = body.to_string();
        let now = Utc::now().to_rfc3339();
        db.connection()
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO documents (collection, key, body, updated_at)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT (collection, key) DO UPDATE
                     SET body = excluded.body, updated_at = excluded.updated_at",
                    params![collection, key, json, now],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn update(
        &self,
        collection: &str,
        key: &str,
        partial: Value,
    ) -> Result<(), CharlaError> {
        let db = self.db()?;
        let collection = collection.to_string();
        let key = key.to_string();
        let now = Utc::now().to_rfc3339();
        db.connection()
            .call(move |conn| {
                let tx = conn.transaction().map_err(store_err)?;
                let body: String = tx
                    .query_row(
                        "SELECT body FROM documents WHERE collection = ?1 AND key = ?2",
                        params![collection, key],
                        |row| row.get(0),
                    )
                    .map_err(store_err)?;
                let mut stored: Value = serde_json::from_str(&body).map_err(store_err)?;
                shallow_merge(&mut stored, partial);
                tx.execute(
                    "UPDATE documents SET body = ?3, updated_at = ?4
                     WHERE collection = ?1 AND key = ?2",
                    params![collection, key, stored.to_string(), now],
                )
                .map_err(store_err)?;
                tx.commit().map_err(store_err)?;
                Ok(())
            })
            .await
            .map_err(unwrap_call_err)
    }
}

/// Merge `partial`'s top-level fields onto `stored`, preserving fields the
/// partial does not mention. Non-object inputs replace the stored value.
fn shallow_merge(stored: &mut Value, partial: Value) {
    match (stored.as_object_mut(), partial) {
        (Some(target), Value::Object(fields)) => {
            for (field, value) in fields {
                target.insert(field, value);
            }
        }
        (_, partial) => *stored = partial,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn open_store() -> (SqliteDocumentStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            database_path: dir.path().join("test.db").to_str().unwrap().to_string(),
            ..StoreConfig::default()
        };
        let store = SqliteDocumentStore::new(config);
        store.initialize().await.unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn get_missing_key_returns_none() {
        let (store, _dir) = open_store().await;
        let value = store.get("chat_history", "59170000000").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let (store, _dir) = open_store().await;
        let body = json!({"chat": [], "automaticSend": true});
        store
            .create("chat_history", "59170000000", body.clone())
            .await
            .unwrap();
        let fetched = store.get("chat_history", "59170000000").await.unwrap();
        assert_eq!(fetched, Some(body));
    }

    #[tokio::test]
    async fn update_merges_shallowly() {
        let (store, _dir) = open_store().await;
        store
            .create(
                "chat_history",
                "k",
                json!({"chat": [], "automaticSend": true}),
            )
            .await
            .unwrap();
        store
            .update("chat_history", "k", json!({"automaticSend": false}))
            .await
            .unwrap();
        let fetched = store.get("chat_history", "k").await.unwrap().unwrap();
        // Unmentioned fields survive the merge.
        assert_eq!(fetched["chat"], json!([]));
        assert_eq!(fetched["automaticSend"], json!(false));
    }

    #[tokio::test]
    async fn update_missing_key_surfaces_store_error() {
        let (store, _dir) = open_store().await;
        let result = store
            .update("chat_history", "nope", json!({"automaticSend": false}))
            .await;
        assert!(matches!(result, Err(CharlaError::Store { .. })));
    }

    #[tokio::test]
    async fn collections_are_independent() {
        let (store, _dir) = open_store().await;
        store
            .create("chat_history", "k", json!({"a": 1}))
            .await
            .unwrap();
        let other = store.get("chat_cache", "k").await.unwrap();
        assert!(other.is_none());
    }

    #[test]
    fn shallow_merge_replaces_listed_fields_only() {
        let mut stored = json!({"chat": [1, 2], "automaticSend": true});
        shallow_merge(&mut stored, json!({"chat": [1, 2, 3]}));
        assert_eq!(stored, json!({"chat": [1, 2, 3], "automaticSend": true}));
    }
}
