// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fallback chain over transcription providers.

use std::sync::Arc;

use tracing::{debug, warn};

use charla_core::CharlaError;
use charla_core::traits::adapter::PluginAdapter;
use charla_core::traits::transcriber::TranscriberAdapter;

use crate::format::sniff_format;

/// Tries each configured provider in order until one produces a transcript.
///
/// Providers without credentials are skipped. A provider error is logged and
/// the chain moves on; `Ok(None)` means every provider was exhausted.
pub struct TranscriptionChain {
    providers: Vec<Arc<dyn TranscriberAdapter>>,
    language: String,
}

impl TranscriptionChain {
    pub fn new(providers: Vec<Arc<dyn TranscriberAdapter>>, language: impl Into<String>) -> Self {
        Self {
            providers,
            language: language.into(),
        }
    }

    /// True when at least one provider has credentials.
    pub fn any_available(&self) -> bool {
        self.providers.iter().any(|p| p.available())
    }

    pub async fn transcribe(&self, audio: &[u8]) -> Result<Option<String>, CharlaError> {
        let format = sniff_format(audio);
        for provider in &self.providers {
            if !provider.available() {
                debug!(provider = provider.name(), "skipping unavailable transcriber");
                continue;
            }
            match provider.transcribe(audio, format, &self.language).await {
                Ok(Some(text)) => {
                    debug!(provider = provider.name(), "transcription succeeded");
                    return Ok(Some(text));
                }
                Ok(None) => {
                    debug!(provider = provider.name(), "no transcript, trying next provider");
                }
                Err(error) => {
                    warn!(provider = provider.name(), %error, "transcriber failed, trying next provider");
                }
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charla_test_utils::MockTranscriber;

    #[tokio::test]
    async fn first_provider_wins() {
        let first = Arc::new(MockTranscriber::new("first"));
        first.push_outcome(Some("hola"));
        let second = Arc::new(MockTranscriber::new("second"));

        let chain = TranscriptionChain::new(
            vec![
                first.clone() as Arc<dyn TranscriberAdapter>,
                second.clone() as Arc<dyn TranscriberAdapter>,
            ],
            "es",
        );

        let result = chain.transcribe(b"OggS....").await.unwrap();
        assert_eq!(result.as_deref(), Some("hola"));
        assert_eq!(first.call_count(), 1);
        assert_eq!(second.call_count(), 0);
    }

    #[tokio::test]
    async fn falls_back_when_first_returns_none() {
        let first = Arc::new(MockTranscriber::new("first"));
        first.push_outcome(None);
        let second = Arc::new(MockTranscriber::new("second"));
        second.push_outcome(Some("desde el segundo"));

        let chain = TranscriptionChain::new(
            vec![
                first.clone() as Arc<dyn TranscriberAdapter>,
                second.clone() as Arc<dyn TranscriberAdapter>,
            ],
            "es",
        );

        let result = chain.transcribe(b"audio").await.unwrap();
        assert_eq!(result.as_deref(), Some("desde el segundo"));
        assert_eq!(first.call_count(), 1);
        assert_eq!(second.call_count(), 1);
    }

    #[tokio::test]
    async fn unavailable_providers_are_skipped() {
        let first = Arc::new(MockTranscriber::unavailable("first"));
        let second = Arc::new(MockTranscriber::new("second"));
        second.push_outcome(Some("texto"));

        let chain = TranscriptionChain::new(
            vec![
                first.clone() as Arc<dyn TranscriberAdapter>,
                second as Arc<dyn TranscriberAdapter>,
            ],
            "es",
        );

        let result = chain.transcribe(b"audio").await.unwrap();
        assert_eq!(result.as_deref(), Some("texto"));
        assert_eq!(first.call_count(), 0);
    }

    #[tokio::test]
    async fn exhausted_chain_returns_none() {
        let first = Arc::new(MockTranscriber::new("first"));
        first.push_outcome(None);

        let chain = TranscriptionChain::new(vec![first as Arc<dyn TranscriberAdapter>], "es");
        let result = chain.transcribe(b"audio").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn empty_chain_returns_none() {
        let chain = TranscriptionChain::new(Vec::new(), "es");
        assert!(!chain.any_available());
        assert!(chain.transcribe(b"audio").await.unwrap().is_none());
    }
}
