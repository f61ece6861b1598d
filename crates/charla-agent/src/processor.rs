// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flush pipeline: read history, compute a reply, deliver it, persist it.
//!
//! The processor consumes the full current conversation rather than the
//! buffered deltas, so a burst collapses into one reply. Every external
//! call is bounded by a timeout; a stalled collaborator must not hold the
//! recipient's in-flight slot forever.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use charla_core::text::extract_text;
use charla_core::{CharlaError, GatewayAdapter};
use charla_rag::ReplyOrchestrator;
use charla_store::ChatHistory;

use crate::queue::FlushHandler;

/// Processes one recipient's flush end to end.
pub struct MessageProcessor {
    history: Arc<ChatHistory>,
    orchestrator: ReplyOrchestrator,
    gateway: Arc<dyn GatewayAdapter>,
    call_timeout: Duration,
}

impl MessageProcessor {
    pub fn new(
        history: Arc<ChatHistory>,
        orchestrator: ReplyOrchestrator,
        gateway: Arc<dyn GatewayAdapter>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            history,
            orchestrator,
            gateway,
            call_timeout,
        }
    }

    async fn bounded<T>(
        &self,
        fut: impl Future<Output = Result<T, CharlaError>>,
    ) -> Result<T, CharlaError> {
        tokio::time::timeout(self.call_timeout, fut)
            .await
            .map_err(|_| CharlaError::Timeout {
                duration: self.call_timeout,
            })?
    }
}

#[async_trait]
impl FlushHandler for MessageProcessor {
    async fn process(&self, recipient: &str) -> Result<(), CharlaError> {
        let record = self.bounded(self.history.read(recipient)).await?;

        if !record.automatic_send {
            info!(recipient, "automatic replies disabled, skipping");
            return Ok(());
        }

        let reply = match self
            .bounded(self.orchestrator.compute_reply(&record.chat))
            .await
        {
            Ok(reply) => reply,
            // An all-answered conversation is a silent no-op, not a failure.
            Err(CharlaError::NoPendingQuery) => {
                debug!(recipient, "no pending query, nothing to reply");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let text = extract_text(&reply);
        self.bounded(self.gateway.send(recipient, &text)).await?;
        info!(recipient, "reply delivered");

        // The user turn persisted at ingress is never rolled back; only a
        // delivered reply is appended.
        self.bounded(self.history.append_turns(recipient, vec![reply]))
            .await?;
        Ok(())
    }
}
