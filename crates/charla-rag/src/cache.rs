// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Content-addressed embedding cache.
//!
//! Entries are keyed by the SHA-256 hex digest of the query text and are
//! permanent: there is no invalidation or expiry. Identical input text
//! never triggers more than one embedding call across the cache's lifetime.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::debug;

use charla_core::types::{CacheEntry, EmbeddingInput};
use charla_core::{CharlaError, DocumentStore, EmbeddingAdapter};

/// Cache-first embedding resolution over one document-store collection.
pub struct EmbeddingCache {
    store: Arc<dyn DocumentStore>,
    embedder: Arc<dyn EmbeddingAdapter>,
    collection: String,
}

impl EmbeddingCache {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        embedder: Arc<dyn EmbeddingAdapter>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            store,
            embedder,
            collection: collection.into(),
        }
    }

    /// SHA-256 hex digest of the query text.
    pub fn content_hash(text: &str) -> String {
        hex::encode(Sha256::digest(text.as_bytes()))
    }

    /// Resolve the embedding for `text`, consulting the cache first.
    ///
    /// On a miss the embedding model is called once and the new entry is
    /// persisted with a null response. Store and embedder failures are hard
    /// failures of the resolve.
    pub async fn resolve(&self, text: &str) -> Result<CacheEntry, CharlaError> {
        let hash = Self::content_hash(text);

        if let Some(value) = self.store.get(&self.collection, &hash).await? {
            let entry: CacheEntry =
                serde_json::from_value(value).map_err(|e| CharlaError::Store {
                    source: Box::new(e),
                })?;
            debug!(%hash, "embedding cache hit");
            return Ok(entry);
        }

        let output = self
            .embedder
            .embed(EmbeddingInput {
                texts: vec![text.to_string()],
            })
            .await?;
        let embedding = output.embeddings.into_iter().next().ok_or_else(|| {
            CharlaError::EmbeddingUnavailable {
                message: "embedding model returned no vectors".to_string(),
            }
        })?;

        let entry = CacheEntry {
            hash: hash.clone(),
            embedding,
            response: None,
        };
        let body = serde_json::to_value(&entry).map_err(|e| CharlaError::Store {
            source: Box::new(e),
        })?;
        self.store.create(&self.collection, &hash, body).await?;
        debug!(%hash, "embedding cached");
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charla_test_utils::{MockDocumentStore, MockEmbedder};

    #[tokio::test]
    async fn repeated_resolve_embeds_at_most_once() {
        let store = Arc::new(MockDocumentStore::new());
        let embedder = Arc::new(MockEmbedder::new(vec![0.1, 0.2, 0.3]));
        let cache = EmbeddingCache::new(store, embedder.clone(), "chat_cache");

        let first = cache.resolve("hola").await.unwrap();
        let second = cache.resolve("hola").await.unwrap();

        assert_eq!(first.embedding, second.embedding);
        assert_eq!(first.hash, second.hash);
        assert_eq!(embedder.call_count(), 1);
    }

    #[tokio::test]
    async fn distinct_texts_get_distinct_entries() {
        let store = Arc::new(MockDocumentStore::new());
        let embedder = Arc::new(MockEmbedder::new(vec![0.5]));
        let cache = EmbeddingCache::new(store, embedder.clone(), "chat_cache");

        let a = cache.resolve("hola").await.unwrap();
        let b = cache.resolve("adios").await.unwrap();

        assert_ne!(a.hash, b.hash);
        assert_eq!(embedder.call_count(), 2);
    }

    #[tokio::test]
    async fn miss_persists_entry_with_null_response() {
        let store = Arc::new(MockDocumentStore::new());
        let embedder = Arc::new(MockEmbedder::new(vec![1.0]));
        let cache = EmbeddingCache::new(store.clone(), embedder, "chat_cache");

        let entry = cache.resolve("hola").await.unwrap();
        assert!(entry.response.is_none());

        let stored = store
            .get_sync("chat_cache", &entry.hash)
            .expect("entry persisted");
        assert!(stored["response"].is_null());
    }

    #[test]
    fn content_hash_is_sha256_hex() {
        // SHA-256 of the empty string, a fixed vector.
        assert_eq!(
            EmbeddingCache::content_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
