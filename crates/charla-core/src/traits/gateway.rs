// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messaging gateway adapter trait for outbound delivery and media access.

use async_trait::async_trait;

use crate::error::CharlaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{MessageId, VoiceMessage};

/// Adapter for the outbound messaging gateway.
#[async_trait]
pub trait GatewayAdapter: PluginAdapter {
    /// Delivers a plain-text message to a recipient phone number.
    async fn send(&self, recipient: &str, text: &str) -> Result<MessageId, CharlaError>;

    /// Downloads and decrypts the audio referenced by a voice message,
    /// returning the plaintext bytes.
    async fn fetch_voice_media(&self, voice: &VoiceMessage) -> Result<Vec<u8>, CharlaError>;
}
