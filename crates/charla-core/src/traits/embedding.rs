// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding adapter trait for text-to-vector model integrations.

use async_trait::async_trait;

use crate::error::CharlaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{EmbeddingInput, EmbeddingOutput};

/// Adapter for embedding model integrations.
#[async_trait]
pub trait EmbeddingAdapter: PluginAdapter {
    /// Embeds a batch of texts, returning one vector per input text.
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, CharlaError>;
}
