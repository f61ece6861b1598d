// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound message entry point.
//!
//! Text messages are trimmed and dropped when blank. Voice messages are
//! downloaded through the gateway and run through the transcription chain;
//! an exhausted chain yields a user-visible placeholder instead of failing
//! the turn. The resulting user turn is persisted first, then enqueued for
//! debounced aggregation.

use std::sync::Arc;

use tracing::{debug, warn};

use charla_core::types::{InboundContent, Turn};
use charla_core::{CharlaError, GatewayAdapter};
use charla_store::ChatHistory;
use charla_transcribe::TranscriptionChain;

use crate::queue::MessageAggregator;

/// Shown to the sender when every transcription provider failed.
pub const TRANSCRIPTION_PLACEHOLDER: &str = "Audio recibido pero no se pudo transcribir";

/// Routes authenticated inbound events into history and the aggregator.
pub struct InboundHandler {
    history: Arc<ChatHistory>,
    gateway: Arc<dyn GatewayAdapter>,
    transcription: Arc<TranscriptionChain>,
    aggregator: Arc<MessageAggregator>,
}

impl InboundHandler {
    pub fn new(
        history: Arc<ChatHistory>,
        gateway: Arc<dyn GatewayAdapter>,
        transcription: Arc<TranscriptionChain>,
        aggregator: Arc<MessageAggregator>,
    ) -> Self {
        Self {
            history,
            gateway,
            transcription,
            aggregator,
        }
    }

    /// Handle one inbound message for `recipient`.
    pub async fn handle_inbound(
        &self,
        recipient: &str,
        content: InboundContent,
    ) -> Result<(), CharlaError> {
        let text = match content {
            InboundContent::Text(text) => {
                let text = text.trim().to_string();
                if text.is_empty() {
                    debug!(recipient, "blank text message dropped");
                    return Ok(());
                }
                text
            }
            InboundContent::Voice(voice) => {
                let audio = self.gateway.fetch_voice_media(&voice).await?;
                match self.transcription.transcribe(&audio).await {
                    Ok(Some(transcript)) => transcript,
                    Ok(None) => {
                        warn!(recipient, "transcription exhausted, using placeholder");
                        TRANSCRIPTION_PLACEHOLDER.to_string()
                    }
                    Err(error) => {
                        warn!(recipient, %error, "transcription failed, using placeholder");
                        TRANSCRIPTION_PLACEHOLDER.to_string()
                    }
                }
            }
        };

        let turn = Turn::user(text);
        self.history
            .append_turns(recipient, vec![turn.clone()])
            .await?;
        self.aggregator.enqueue(recipient, turn);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use charla_config::model::StoreConfig;
    use charla_core::types::VoiceMessage;
    use charla_core::DocumentStore;
    use charla_store::SqliteDocumentStore;
    use charla_test_utils::{MockGateway, MockTranscriber};

    use crate::queue::FlushHandler;

    struct NoopHandler(AtomicUsize);

    #[async_trait]
    impl FlushHandler for NoopHandler {
        async fn process(&self, _recipient: &str) -> Result<(), CharlaError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    async fn fixture(
        transcriber: MockTranscriber,
        media: Vec<u8>,
    ) -> (
        InboundHandler,
        Arc<ChatHistory>,
        Arc<MessageAggregator>,
        tempfile::TempDir,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            database_path: dir.path().join("test.db").to_str().unwrap().to_string(),
            ..StoreConfig::default()
        };
        let store = Arc::new(SqliteDocumentStore::new(config));
        store.initialize().await.unwrap();
        let history = Arc::new(ChatHistory::new(store, "chat_history"));
        let aggregator = MessageAggregator::new(
            Arc::new(NoopHandler(AtomicUsize::new(0))),
            Duration::from_secs(60),
        );
        let handler = InboundHandler::new(
            history.clone(),
            Arc::new(MockGateway::with_media(media)),
            Arc::new(TranscriptionChain::new(
                vec![Arc::new(transcriber) as Arc<dyn charla_core::TranscriberAdapter>],
                "es",
            )),
            aggregator.clone(),
        );
        (handler, history, aggregator, dir)
    }

    #[tokio::test]
    async fn text_message_is_appended_and_enqueued() {
        let (handler, history, aggregator, _dir) =
            fixture(MockTranscriber::new("mock"), Vec::new()).await;
        handler
            .handle_inbound("r", InboundContent::Text("  Hola  ".into()))
            .await
            .unwrap();

        let record = history.read("r").await.unwrap();
        assert_eq!(record.chat.len(), 1);
        assert_eq!(charla_core::text::extract_text(&record.chat[0]), "Hola");
        assert_eq!(aggregator.pending("r"), 1);
    }

    #[tokio::test]
    async fn blank_text_is_dropped() {
        let (handler, history, aggregator, _dir) =
            fixture(MockTranscriber::new("mock"), Vec::new()).await;
        handler
            .handle_inbound("r", InboundContent::Text("   ".into()))
            .await
            .unwrap();

        let record = history.read("r").await.unwrap();
        assert!(record.chat.is_empty());
        assert_eq!(aggregator.pending("r"), 0);
    }

    #[tokio::test]
    async fn voice_message_is_transcribed() {
        let transcriber = MockTranscriber::new("mock");
        transcriber.push_outcome(Some("hola por voz"));
        let (handler, history, _aggregator, _dir) =
            fixture(transcriber, vec![0x4F, 0x67, 0x67, 0x53]).await;

        handler
            .handle_inbound("r", InboundContent::Voice(VoiceMessage::default()))
            .await
            .unwrap();

        let record = history.read("r").await.unwrap();
        assert_eq!(
            charla_core::text::extract_text(&record.chat[0]),
            "hola por voz"
        );
    }

    #[tokio::test]
    async fn exhausted_transcription_uses_placeholder() {
        let (handler, history, _aggregator, _dir) =
            fixture(MockTranscriber::unavailable("mock"), vec![0xFF, 0xFB]).await;

        handler
            .handle_inbound("r", InboundContent::Voice(VoiceMessage::default()))
            .await
            .unwrap();

        let record = history.read("r").await.unwrap();
        assert_eq!(
            charla_core::text::extract_text(&record.chat[0]),
            TRANSCRIPTION_PLACEHOLDER
        );
    }
}
