// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! REST client for Qdrant point search.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

use charla_core::CharlaError;
use charla_core::traits::adapter::PluginAdapter;
use charla_core::traits::search::VectorSearchAdapter;
use charla_core::types::{AdapterType, HealthStatus, SearchHit};

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    vector: &'a [f32],
    limit: usize,
    with_payload: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<SearchHit>,
}

/// Qdrant similarity search over the REST API.
pub struct QdrantSearch {
    client: reqwest::Client,
    base_url: String,
}

impl QdrantSearch {
    /// Creates a search adapter for a Qdrant instance.
    ///
    /// `api_key` is optional; local deployments usually run without one.
    pub fn new(url: impl Into<String>, api_key: Option<&str>) -> Result<Self, CharlaError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = api_key {
            headers.insert(
                "api-key",
                HeaderValue::from_str(key)
                    .map_err(|e| CharlaError::Config(format!("invalid Qdrant API key: {e}")))?,
            );
        }
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CharlaError::Search {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            base_url: url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PluginAdapter for QdrantSearch {
    fn name(&self) -> &str {
        "qdrant"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Search
    }

    async fn health_check(&self) -> Result<HealthStatus, CharlaError> {
        match self
            .client
            .get(format!("{}/readyz", self.base_url))
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => Ok(HealthStatus::Healthy),
            Ok(response) => Ok(HealthStatus::Unhealthy(format!(
                "readiness probe returned {}",
                response.status()
            ))),
            Err(e) => Ok(HealthStatus::Unhealthy(format!("unreachable: {e}"))),
        }
    }

    async fn shutdown(&self) -> Result<(), CharlaError> {
        Ok(())
    }
}

#[async_trait]
impl VectorSearchAdapter for QdrantSearch {
    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
        with_payload: bool,
    ) -> Result<Vec<SearchHit>, CharlaError> {
        let url = format!("{}/collections/{collection}/points/search", self.base_url);
        let body = SearchRequest {
            vector,
            limit,
            with_payload,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| CharlaError::Search {
                message: format!("Qdrant request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CharlaError::Search {
                message: format!("Qdrant returned {status}: {body}"),
                source: None,
            });
        }

        let parsed: SearchResponse = response.json().await.map_err(|e| CharlaError::Search {
            message: format!("Qdrant response was not valid JSON: {e}"),
            source: Some(Box::new(e)),
        })?;
        debug!(collection, hits = parsed.result.len(), "search completed");
        Ok(parsed.result)
    }
}
