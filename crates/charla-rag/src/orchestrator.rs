// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retrieval-augmented reply orchestration.
//!
//! Given the full conversation for one recipient, derives the pending query,
//! resolves its embedding cache-first, retrieves context documents, and asks
//! the completion model for a reply formatted for WhatsApp delivery.

use std::sync::Arc;

use tracing::{debug, info};

use charla_core::text::{extract_text, unanswered_user_text};
use charla_core::types::{ChatMessage, CompletionRequest, Role, Turn};
use charla_core::{CharlaError, ProviderAdapter};

use crate::cache::EmbeddingCache;
use crate::format::format_for_whatsapp;
use crate::retriever::ContextRetriever;

/// Reply text used when the model returns no content.
const EMPTY_REPLY_TEXT: &str = "Sin respuesta";

/// Orchestrates one reply computation. History mutation is the caller's
/// responsibility; the orchestrator's only side effects are the remote calls.
pub struct ReplyOrchestrator {
    cache: EmbeddingCache,
    retriever: ContextRetriever,
    provider: Arc<dyn ProviderAdapter>,
    chat_model: String,
    max_tokens: Option<u32>,
    system_prompt: Option<String>,
}

impl ReplyOrchestrator {
    pub fn new(
        cache: EmbeddingCache,
        retriever: ContextRetriever,
        provider: Arc<dyn ProviderAdapter>,
        chat_model: impl Into<String>,
        max_tokens: Option<u32>,
        system_prompt: Option<String>,
    ) -> Self {
        Self {
            cache,
            retriever,
            provider,
            chat_model: chat_model.into(),
            max_tokens,
            system_prompt,
        }
    }

    /// Compute the assistant reply for `conversation`.
    ///
    /// Fails with [`CharlaError::NoPendingQuery`] when the conversation has
    /// no unanswered user text, [`CharlaError::EmbeddingUnavailable`] when
    /// the query embedding cannot be resolved, and
    /// [`CharlaError::CompletionFailed`] when the model call fails. A vector
    /// search failure degrades to a context-free completion.
    pub async fn compute_reply(&self, conversation: &[Turn]) -> Result<Turn, CharlaError> {
        let query = unanswered_user_text(conversation);
        if query.trim().is_empty() {
            return Err(CharlaError::NoPendingQuery);
        }
        debug!(query_len = query.len(), "computing reply");

        let entry = self
            .cache
            .resolve(&query)
            .await
            .map_err(|e| CharlaError::EmbeddingUnavailable {
                message: e.to_string(),
            })?;

        // A previously attached reply for the same query short-circuits the
        // model call entirely.
        if let Some(cached) = entry.response {
            info!(hash = %entry.hash, "serving cached reply");
            return Ok(cached);
        }

        let documents = self.retriever.retrieve(&entry.embedding).await;
        debug!(documents = documents.len(), "context retrieved");

        let mut messages = Vec::with_capacity(conversation.len() + 1);
        if let Some(prompt) = &self.system_prompt {
            messages.push(ChatMessage {
                role: Role::System,
                content: prompt.clone(),
            });
        }
        messages.extend(conversation.iter().filter_map(|turn| {
            let content = extract_text(turn);
            if content.trim().is_empty() {
                None
            } else {
                Some(ChatMessage {
                    role: turn.role,
                    content,
                })
            }
        }));

        let response = self
            .provider
            .complete(CompletionRequest {
                model: self.chat_model.clone(),
                messages,
                documents,
                max_tokens: self.max_tokens,
            })
            .await
            .map_err(|e| CharlaError::CompletionFailed {
                message: e.to_string(),
            })?;

        let text = response
            .content
            .iter()
            .find(|segment| segment.kind == "text" && !segment.text.trim().is_empty())
            .map(|segment| format_for_whatsapp(&segment.text))
            .filter(|formatted| !formatted.is_empty())
            .unwrap_or_else(|| EMPTY_REPLY_TEXT.to_string());

        Ok(Turn::assistant(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charla_test_utils::{
        MockDocumentStore, MockEmbedder, MockProvider, MockVectorSearch,
    };
    use serde_json::json;

    fn orchestrator(provider: Arc<MockProvider>) -> ReplyOrchestrator {
        let store = Arc::new(MockDocumentStore::new());
        let embedder = Arc::new(MockEmbedder::new(vec![0.1, 0.2]));
        let search = Arc::new(MockVectorSearch::with_payloads(vec![json!({
            "contenido": "contexto"
        })]));
        ReplyOrchestrator::new(
            EmbeddingCache::new(store, embedder, "chat_cache"),
            ContextRetriever::new(search, "documentos", 10),
            provider,
            "command-a-03-2025",
            None,
            None,
        )
    }

    #[tokio::test]
    async fn empty_conversation_fails_with_no_pending_query() {
        let provider = Arc::new(MockProvider::new());
        let orchestrator = orchestrator(provider);
        let err = orchestrator.compute_reply(&[]).await.unwrap_err();
        assert!(matches!(err, CharlaError::NoPendingQuery));
    }

    #[tokio::test]
    async fn reply_is_formatted_for_whatsapp() {
        let provider = Arc::new(MockProvider::new());
        provider.push_response("**Hola** *mundo*\n\n\n\nFin");
        let orchestrator = orchestrator(provider);

        let reply = orchestrator
            .compute_reply(&[Turn::user("Hola")])
            .await
            .unwrap();
        assert_eq!(extract_text(&reply), "Hola mundo\n\nFin");
        assert_eq!(reply.role, Role::Assistant);
    }

    #[tokio::test]
    async fn empty_model_content_yields_placeholder() {
        let provider = Arc::new(MockProvider::new());
        provider.push_response("");
        let orchestrator = orchestrator(provider);

        let reply = orchestrator
            .compute_reply(&[Turn::user("Hola")])
            .await
            .unwrap();
        assert_eq!(extract_text(&reply), "Sin respuesta");
    }

    #[tokio::test]
    async fn context_documents_reach_the_provider() {
        let provider = Arc::new(MockProvider::new());
        provider.push_response("ok");
        let orchestrator = orchestrator(provider.clone());

        orchestrator
            .compute_reply(&[Turn::user("Hola")])
            .await
            .unwrap();

        let request = provider.last_request().expect("provider called");
        assert_eq!(request.model, "command-a-03-2025");
        assert_eq!(request.documents.len(), 1);
        assert_eq!(request.documents[0].text, "contexto");
    }

    #[tokio::test]
    async fn system_prompt_is_prepended() {
        let provider = Arc::new(MockProvider::new());
        provider.push_response("ok");
        let store = Arc::new(MockDocumentStore::new());
        let embedder = Arc::new(MockEmbedder::new(vec![0.1]));
        let search = Arc::new(MockVectorSearch::with_payloads(vec![]));
        let orchestrator = ReplyOrchestrator::new(
            EmbeddingCache::new(store, embedder, "chat_cache"),
            ContextRetriever::new(search, "documentos", 10),
            provider.clone(),
            "command-a-03-2025",
            Some(256),
            Some("Eres un asistente".to_string()),
        );

        orchestrator
            .compute_reply(&[Turn::user("Hola")])
            .await
            .unwrap();

        let request = provider.last_request().unwrap();
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[0].content, "Eres un asistente");
        assert_eq!(request.max_tokens, Some(256));
    }

    #[tokio::test]
    async fn provider_failure_maps_to_completion_failed() {
        let provider = Arc::new(MockProvider::new());
        // No queued response makes the mock fail.
        let orchestrator = orchestrator(provider);

        let err = orchestrator
            .compute_reply(&[Turn::user("Hola")])
            .await
            .unwrap_err();
        assert!(matches!(err, CharlaError::CompletionFailed { .. }));
    }
}
