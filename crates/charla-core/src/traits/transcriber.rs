// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transcription adapter trait for speech-to-text providers.

use async_trait::async_trait;

use crate::error::CharlaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::AudioFormat;

/// Adapter for one speech-to-text provider in the fallback chain.
#[async_trait]
pub trait TranscriberAdapter: PluginAdapter {
    /// Whether this provider's credential is configured. Unavailable
    /// providers are skipped without counting as a failure.
    fn available(&self) -> bool;

    /// Transcribes the audio bytes. `Ok(None)` means this provider could
    /// not produce a transcript and the chain should try the next one;
    /// `Err` is reserved for failures worth surfacing (misconfiguration).
    async fn transcribe(
        &self,
        audio: &[u8],
        format: AudioFormat,
        language: &str,
    ) -> Result<Option<String>, CharlaError>;
}
