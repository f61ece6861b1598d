// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document store adapter trait: keyed opaque JSON documents.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CharlaError;
use crate::traits::adapter::PluginAdapter;

/// Adapter for the external document store.
///
/// Documents are opaque JSON bodies addressed by `(collection, key)`; the
/// store has no secondary indexes. Conversation records and cache entries
/// live in separate collections.
#[async_trait]
pub trait DocumentStore: PluginAdapter {
    /// Initializes the store (connections, schema migration).
    async fn initialize(&self) -> Result<(), CharlaError>;

    /// Fetches a document, or `None` if the key is absent.
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>, CharlaError>;

    /// Creates a document. Overwrites an existing body for the same key.
    async fn create(&self, collection: &str, key: &str, body: Value)
    -> Result<(), CharlaError>;

    /// Shallow-merges `partial`'s top-level fields onto the stored document.
    /// Fields absent from `partial` are preserved. The key must exist.
    async fn update(
        &self,
        collection: &str,
        key: &str,
        partial: Value,
    ) -> Result<(), CharlaError>;
}
