// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion provider for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with pre-configured responses,
//! enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use charla_core::CharlaError;
use charla_core::traits::adapter::PluginAdapter;
use charla_core::traits::provider::ProviderAdapter;
use charla_core::types::{
    AdapterType, CompletionRequest, CompletionResponse, ContentSegment, HealthStatus, Role,
};

/// A mock completion provider that returns pre-configured responses.
///
/// Responses are popped from a FIFO queue; an empty queue makes `complete`
/// fail, which tests use to exercise the fatal-completion path. Every
/// request is recorded for assertion.
pub struct MockProvider {
    responses: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockProvider {
    /// Create a new mock provider with an empty response queue.
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock provider pre-loaded with the given responses.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from(responses)),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Add a response to the end of the queue.
    pub fn push_response(&self, text: impl Into<String>) {
        self.responses.lock().unwrap().push_back(text.into());
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    /// Number of completion calls made.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
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
impl ProviderAdapter for MockProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, CharlaError> {
        self.requests.lock().unwrap().push(request);
        let text = self.responses.lock().unwrap().pop_front().ok_or_else(|| {
            CharlaError::Provider {
                message: "mock provider has no queued response".to_string(),
                source: None,
            }
        })?;
        Ok(CompletionResponse {
            role: Role::Assistant,
            content: vec![ContentSegment::text(text)],
        })
    }
}
