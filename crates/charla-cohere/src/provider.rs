// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat-completion adapter over the Cohere v2 chat endpoint.

use async_trait::async_trait;
use tracing::debug;

use charla_core::CharlaError;
use charla_core::traits::adapter::PluginAdapter;
use charla_core::traits::provider::ProviderAdapter;
use charla_core::types::{
    AdapterType, CompletionRequest, CompletionResponse, ContentSegment, HealthStatus, Role,
};

use crate::client::CohereClient;
use crate::types::{ApiDocument, ApiMessage, ChatRequest, ChatResponse, DocumentData};

/// Cohere chat-completion provider.
pub struct CohereProvider {
    client: CohereClient,
}

impl CohereProvider {
    pub fn new(api_key: &str) -> Result<Self, CharlaError> {
        Ok(Self {
            client: CohereClient::new(api_key)?,
        })
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.client = self.client.with_base_url(url);
        self
    }
}

fn to_wire(request: CompletionRequest) -> ChatRequest {
    ChatRequest {
        model: request.model,
        messages: request
            .messages
            .into_iter()
            .map(|m| ApiMessage {
                role: m.role.to_string(),
                content: m.content,
            })
            .collect(),
        documents: request
            .documents
            .into_iter()
            .map(|d| ApiDocument {
                id: d.id,
                data: DocumentData { text: d.text },
            })
            .collect(),
        max_tokens: request.max_tokens,
    }
}

#[async_trait]
impl PluginAdapter for CohereProvider {
    fn name(&self) -> &str {
        "cohere-chat"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, CharlaError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CharlaError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for CohereProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, CharlaError> {
        let wire = to_wire(request);
        debug!(model = %wire.model, messages = wire.messages.len(), documents = wire.documents.len(), "sending chat request");
        let response: ChatResponse = self.client.post_json("/v2/chat", &wire).await?;

        let role = match response.message.role.as_str() {
            "user" => Role::User,
            _ => Role::Assistant,
        };
        let content = response
            .message
            .content
            .into_iter()
            .map(|c| ContentSegment {
                kind: c.kind,
                text: c.text,
            })
            .collect();
        Ok(CompletionResponse { role, content })
    }
}
