// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding adapter over the Cohere v2 embed endpoint.

use async_trait::async_trait;
use tracing::debug;

use charla_core::CharlaError;
use charla_core::traits::adapter::PluginAdapter;
use charla_core::traits::embedding::EmbeddingAdapter;
use charla_core::types::{AdapterType, EmbeddingInput, EmbeddingOutput, HealthStatus};

use crate::client::CohereClient;
use crate::types::{EmbedRequest, EmbedResponse};

/// Input type sent to the embed endpoint. Query embeddings are matched
/// against document embeddings stored in the vector index.
const INPUT_TYPE: &str = "search_query";

/// Cohere embedding provider.
pub struct CohereEmbedder {
    client: CohereClient,
    model: String,
}

impl CohereEmbedder {
    pub fn new(api_key: &str, model: impl Into<String>) -> Result<Self, CharlaError> {
        Ok(Self {
            client: CohereClient::new(api_key)?,
            model: model.into(),
        })
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.client = self.client.with_base_url(url);
        self
    }
}

#[async_trait]
impl PluginAdapter for CohereEmbedder {
    fn name(&self) -> &str {
        "cohere-embed"
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
impl EmbeddingAdapter for CohereEmbedder {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, CharlaError> {
        let request = EmbedRequest {
            model: self.model.clone(),
            texts: input.texts,
            input_type: INPUT_TYPE.to_string(),
            embedding_types: vec!["float".to_string()],
        };
        debug!(model = %request.model, texts = request.texts.len(), "sending embed request");
        let response: EmbedResponse = self.client.post_json("/v2/embed", &request).await?;

        let embeddings = response.embeddings.float;
        let dimensions = embeddings.first().map_or(0, Vec::len);
        if embeddings.is_empty() {
            return Err(CharlaError::EmbeddingUnavailable {
                message: "embed response contained no vectors".into(),
            });
        }
        Ok(EmbeddingOutput {
            embeddings,
            dimensions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn embeds_query_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/embed"))
            .and(body_partial_json(serde_json::json!({
                "model": "embed-multilingual-v3.0",
                "texts": ["hola mundo"],
                "input_type": "search_query",
                "embedding_types": ["float"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "embeddings": {"float": [[0.1, 0.2, 0.3]]}
            })))
            .mount(&server)
            .await;

        let embedder = CohereEmbedder::new("test-key", "embed-multilingual-v3.0")
            .unwrap()
            .with_base_url(server.uri());
        let output = embedder
            .embed(EmbeddingInput {
                texts: vec!["hola mundo".into()],
            })
            .await
            .unwrap();
        assert_eq!(output.embeddings, vec![vec![0.1, 0.2, 0.3]]);
        assert_eq!(output.dimensions, 3);
    }

    #[tokio::test]
    async fn empty_vector_list_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/embed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "embeddings": {"float": []}
            })))
            .mount(&server)
            .await;

        let embedder = CohereEmbedder::new("test-key", "embed-multilingual-v3.0")
            .unwrap()
            .with_base_url(server.uri());
        let result = embedder
            .embed(EmbeddingInput {
                texts: vec!["hola".into()],
            })
            .await;
        assert!(matches!(
            result,
            Err(CharlaError::EmbeddingUnavailable { .. })
        ));
    }
}
