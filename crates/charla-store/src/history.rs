// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation history over the document store.
//!
//! A record is guaranteed to exist once referenced: the first read creates
//! and persists the default `{chat: [], automaticSend: true}`. Writes are a
//! shallow field merge, so callers follow read-modify-write: read the full
//! history, extend the chat client-side, then merge just that field. There
//! is no concurrency token; the single-flight queue keeps the race window
//! small.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Value, json};
use tracing::debug;

use charla_core::types::{ConversationRecord, Turn};
use charla_core::{CharlaError, DocumentStore};

/// Read/modify/write wrapper around one document-store collection holding
/// per-recipient conversation records.
pub struct ChatHistory {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl ChatHistory {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Fetch the conversation record for `recipient`, creating and
    /// persisting the default record if none exists.
    pub async fn read(&self, recipient: &str) -> Result<ConversationRecord, CharlaError> {
        match self.store.get(&self.collection, recipient).await? {
            Some(value) => {
                serde_json::from_value(value).map_err(|e| CharlaError::Store {
                    source: Box::new(e),
                })
            }
            None => {
                let record = ConversationRecord::default();
                let body = serde_json::to_value(&record).map_err(|e| CharlaError::Store {
                    source: Box::new(e),
                })?;
                self.store.create(&self.collection, recipient, body).await?;
                debug!(recipient, "created default conversation record");
                Ok(record)
            }
        }
    }

    /// Shallow-merge `partial` onto the stored record, stamping `lastUpdate`.
    /// Creates the default record first if the recipient is unknown.
    pub async fn merge(&self, recipient: &str, partial: Value) -> Result<(), CharlaError> {
        // Ensures the record exists before the field merge.
        self.read(recipient).await?;

        let mut partial = partial;
        if let Some(fields) = partial.as_object_mut() {
            fields.insert("lastUpdate".into(), json!(Utc::now().to_rfc3339()));
        }
        self.store.update(&self.collection, recipient, partial).await
    }

    /// Append turns to the recipient's chat, skipping blank ones, and
    /// persist the extended sequence. Returns the updated record.
    pub async fn append_turns(
        &self,
        recipient: &str,
        turns: Vec<Turn>,
    ) -> Result<ConversationRecord, CharlaError> {
        let mut record = self.read(recipient).await?;
        record.chat.extend(
            turns
                .into_iter()
                .filter(|t| !charla_core::text::extract_text(t).trim().is_empty()),
        );
        let chat = serde_json::to_value(&record.chat).map_err(|e| CharlaError::Store {
            source: Box::new(e),
        })?;
        self.merge(recipient, json!({ "chat": chat })).await?;
        Ok(record)
    }
}
