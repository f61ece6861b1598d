// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Context retrieval from the vector search service.
//!
//! Retrieval failure is non-fatal: the pipeline degrades to a context-free
//! completion instead of aborting, so a search outage never silences the
//! assistant.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use charla_core::types::ContextDocument;
use charla_core::{CharlaError, VectorSearchAdapter};

/// Payload fields tried in order for a hit's text body.
const PAYLOAD_TEXT_FIELDS: [&str; 3] = ["contenido", "descripcion", "text"];

/// Placeholder body for hits carrying none of the known text fields.
const EMPTY_PAYLOAD_TEXT: &str = "Sin contenido";

/// Top-K document retrieval over a configured collection.
pub struct ContextRetriever {
    search: Arc<dyn VectorSearchAdapter>,
    collection: String,
    top_k: usize,
}

impl ContextRetriever {
    pub fn new(
        search: Arc<dyn VectorSearchAdapter>,
        collection: impl Into<String>,
        top_k: usize,
    ) -> Self {
        Self {
            search,
            collection: collection.into(),
            top_k,
        }
    }

    /// Retrieve the nearest context documents for `embedding`.
    ///
    /// A search failure is logged and yields an empty document list.
    pub async fn retrieve(&self, embedding: &[f32]) -> Vec<ContextDocument> {
        match self.try_retrieve(embedding).await {
            Ok(documents) => documents,
            Err(error) => {
                warn!(collection = %self.collection, %error, "context retrieval failed, continuing without documents");
                Vec::new()
            }
        }
    }

    async fn try_retrieve(
        &self,
        embedding: &[f32],
    ) -> Result<Vec<ContextDocument>, CharlaError> {
        let hits = self
            .search
            .search(&self.collection, embedding, self.top_k, true)
            .await?;
        Ok(hits
            .into_iter()
            .map(|hit| ContextDocument {
                id: Uuid::new_v4().to_string(),
                text: payload_text(&hit.payload),
            })
            .collect())
    }
}

/// Pick a hit's text body from the first non-empty known payload field.
fn payload_text(payload: &Value) -> String {
    for field in PAYLOAD_TEXT_FIELDS {
        if let Some(text) = payload.get(field).and_then(Value::as_str) {
            if !text.trim().is_empty() {
                return text.to_string();
            }
        }
    }
    EMPTY_PAYLOAD_TEXT.to_string()
}
