// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock messaging gateway capturing outbound sends.

use std::sync::Mutex;

use async_trait::async_trait;

use charla_core::CharlaError;
use charla_core::traits::adapter::PluginAdapter;
use charla_core::traits::gateway::GatewayAdapter;
use charla_core::types::{AdapterType, HealthStatus, MessageId, VoiceMessage};

/// A mock gateway that records every send and serves fixed media bytes.
pub struct MockGateway {
    sent: Mutex<Vec<(String, String)>>,
    media: Vec<u8>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            media: Vec::new(),
        }
    }

    /// A gateway whose `fetch_voice_media` returns `media`.
    pub fn with_media(media: Vec<u8>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            media,
        }
    }

    /// Every `(recipient, text)` pair sent so far, in order.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockGateway {
    fn name(&self) -> &str {
        "mock-gateway"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, CharlaError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CharlaError> {
        Ok(())
    }
}

#[async_trait]
impl GatewayAdapter for MockGateway {
    async fn send(&self, recipient: &str, text: &str) -> Result<MessageId, CharlaError> {
        self.sent
            .lock()
            .unwrap()
            .push((recipient.to_string(), text.to_string()));
        Ok(MessageId(format!("mock-{}", uuid::Uuid::new_v4())))
    }

    async fn fetch_voice_media(
        &self,
        _voice: &VoiceMessage,
    ) -> Result<Vec<u8>, CharlaError> {
        Ok(self.media.clone())
    }
}
