// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for chat-completion integrations.

use async_trait::async_trait;

use crate::error::CharlaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CompletionRequest, CompletionResponse};

/// Adapter for chat-completion model integrations.
///
/// Provider adapters handle communication with the completion API, including
/// attaching retrieved context documents to the request.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends a completion request and returns the full response.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, CharlaError>;
}
