// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock vector search adapter with fixed payloads.

use async_trait::async_trait;
use serde_json::Value;

use charla_core::CharlaError;
use charla_core::traits::adapter::PluginAdapter;
use charla_core::traits::search::VectorSearchAdapter;
use charla_core::types::{AdapterType, HealthStatus, SearchHit};

/// A mock search service returning fixed payloads, or failing every call.
pub struct MockVectorSearch {
    payloads: Vec<Value>,
    failing: bool,
}

impl MockVectorSearch {
    /// A search that returns one hit per payload, in order.
    pub fn with_payloads(payloads: Vec<Value>) -> Self {
        Self {
            payloads,
            failing: false,
        }
    }

    /// A search whose every call fails. Used to test graceful degradation.
    pub fn failing() -> Self {
        Self {
            payloads: Vec::new(),
            failing: true,
        }
    }
}

#[async_trait]
impl PluginAdapter for MockVectorSearch {
    fn name(&self) -> &str {
        "mock-search"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Search
    }

    async fn health_check(&self) -> Result<HealthStatus, CharlaError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CharlaError> {
        Ok(())
    }
}

#[async_trait]
impl VectorSearchAdapter for MockVectorSearch {
    async fn search(
        &self,
        _collection: &str,
        _vector: &[f32],
        limit: usize,
        _with_payload: bool,
    ) -> Result<Vec<SearchHit>, CharlaError> {
        if self.failing {
            return Err(CharlaError::Search {
                message: "mock search configured to fail".to_string(),
                source: None,
            });
        }
        Ok(self
            .payloads
            .iter()
            .take(limit)
            .map(|payload| SearchHit {
                payload: payload.clone(),
                score: Some(0.9),
            })
            .collect())
    }
}
