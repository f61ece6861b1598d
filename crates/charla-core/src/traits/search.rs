// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vector similarity search adapter trait.

use async_trait::async_trait;

use crate::error::CharlaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::SearchHit;

/// Adapter for vector similarity search services.
#[async_trait]
pub trait VectorSearchAdapter: PluginAdapter {
    /// Searches `collection` for the `limit` nearest points to `vector`,
    /// returning hits ordered by descending similarity.
    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
        with_payload: bool,
    ) -> Result<Vec<SearchHit>, CharlaError>;
}
