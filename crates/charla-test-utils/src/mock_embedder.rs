// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock embedding adapter returning a fixed vector.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use charla_core::CharlaError;
use charla_core::traits::adapter::PluginAdapter;
use charla_core::traits::embedding::EmbeddingAdapter;
use charla_core::types::{AdapterType, EmbeddingInput, EmbeddingOutput, HealthStatus};

/// A mock embedder that returns the same vector for every text and counts
/// how many times it was called. Used to assert the cache's at-most-once
/// embedding guarantee.
pub struct MockEmbedder {
    vector: Vec<f32>,
    calls: AtomicUsize,
    texts: Mutex<Vec<String>>,
}

impl MockEmbedder {
    pub fn new(vector: Vec<f32>) -> Self {
        Self {
            vector,
            calls: AtomicUsize::new(0),
            texts: Mutex::new(Vec::new()),
        }
    }

    /// Number of embed calls made.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every text ever submitted for embedding, in order.
    pub fn embedded_texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

#[async_trait]
impl PluginAdapter for MockEmbedder {
    fn name(&self) -> &str {
        "mock-embedder"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, CharlaError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CharlaError> {
        Ok(())
    }
}

#[async_trait]
impl EmbeddingAdapter for MockEmbedder {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, CharlaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts.lock().unwrap().extend(input.texts.clone());
        let dimensions = self.vector.len();
        Ok(EmbeddingOutput {
            embeddings: input.texts.iter().map(|_| self.vector.clone()).collect(),
            dimensions,
        })
    }
}
