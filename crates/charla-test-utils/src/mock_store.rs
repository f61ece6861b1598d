// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory mock of the document store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use charla_core::CharlaError;
use charla_core::traits::adapter::PluginAdapter;
use charla_core::traits::store::DocumentStore;
use charla_core::types::{AdapterType, HealthStatus};

/// An in-memory document store with the same get/create/update-merge
/// contract as the SQLite implementation.
pub struct MockDocumentStore {
    documents: Mutex<HashMap<(String, String), Value>>,
}

impl MockDocumentStore {
    pub fn new() -> Self {
        Self {
            documents: Mutex::new(HashMap::new()),
        }
    }

    /// Synchronous lookup for test assertions.
    pub fn get_sync(&self, collection: &str, key: &str) -> Option<Value> {
        self.documents
            .lock()
            .unwrap()
            .get(&(collection.to_string(), key.to_string()))
            .cloned()
    }

    /// Number of stored documents across all collections.
    pub fn len(&self) -> usize {
        self.documents.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MockDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockDocumentStore {
    fn name(&self) -> &str {
        "mock-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, CharlaError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CharlaError> {
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MockDocumentStore {
    async fn initialize(&self) -> Result<(), CharlaError> {
        Ok(())
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>, CharlaError> {
        Ok(self.get_sync(collection, key))
    }

    async fn create(
        &self,
        collection: &str,
        key: &str,
        body: Value,
    ) -> Result<(), CharlaError> {
        self.documents
            .lock()
            .unwrap()
            .insert((collection.to_string(), key.to_string()), body);
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        key: &str,
        partial: Value,
    ) -> Result<(), CharlaError> {
        let mut documents = self.documents.lock().unwrap();
        let stored = documents
            .get_mut(&(collection.to_string(), key.to_string()))
            .ok_or_else(|| CharlaError::Store {
                source: format!("no document {collection}/{key}").into(),
            })?;
        match (stored.as_object_mut(), partial) {
            (Some(target), Value::Object(fields)) => {
                for (field, value) in fields {
                    target.insert(field, value);
                }
            }
            (_, partial) => *stored = partial,
        }
        Ok(())
    }
}
