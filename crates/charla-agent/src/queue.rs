// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-recipient message aggregation with debounce and single-flight flush.
//!
//! Inbound messages are buffered per recipient. The first buffered message
//! of a burst arms a debounce timer; later messages in the same window do
//! not reset it. When the timer fires, the recipient's buffer is drained and
//! the flush handler runs exactly once for the whole burst. A recipient in
//! flight is never flushed concurrently: the buffer is removed only by the
//! task that transitions the recipient into the in-flight set.
//!
//! Messages arriving while a flush is in flight open a fresh buffer; if its
//! timer fires before the flush settles, the timer re-arms instead of
//! dropping the buffer, so no message waits for an unrelated inbound event.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use charla_core::CharlaError;
use charla_core::types::Turn;

/// One buffered inbound message.
pub struct QueuedMessage {
    pub message: Turn,
    pub enqueued_at: Instant,
}

/// Consumes a recipient's flush. The handler reads the full current
/// conversation itself; buffered messages only trigger the flush.
#[async_trait]
pub trait FlushHandler: Send + Sync + 'static {
    async fn process(&self, recipient: &str) -> Result<(), CharlaError>;
}

#[derive(Default)]
struct Inner {
    buffers: HashMap<String, Vec<QueuedMessage>>,
    timers: HashMap<String, JoinHandle<()>>,
    in_flight: HashSet<String>,
}

/// Process-wide message aggregator. One instance is constructed at startup
/// and shared by reference with all inbound handlers.
pub struct MessageAggregator {
    inner: Mutex<Inner>,
    handler: Arc<dyn FlushHandler>,
    debounce: Duration,
}

impl MessageAggregator {
    pub fn new(handler: Arc<dyn FlushHandler>, debounce: Duration) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(Inner::default()),
            handler,
            debounce,
        })
    }

    /// Buffer a message for `recipient`. The first message of a burst arms
    /// the debounce timer; subsequent messages in the window do not reset it.
    pub fn enqueue(self: &Arc<Self>, recipient: &str, message: Turn) {
        let first = {
            let mut inner = self.inner.lock().expect("aggregator lock poisoned");
            let buffer = inner.buffers.entry(recipient.to_string()).or_default();
            buffer.push(QueuedMessage {
                message,
                enqueued_at: Instant::now(),
            });
            buffer.len() == 1
        };
        if first {
            debug!(recipient, "burst opened, arming debounce timer");
            self.arm_timer(recipient.to_string());
        }
    }

    /// Flush `recipient` now. Idempotent under concurrent invocation: a
    /// recipient already in flight or with no pending buffer is a no-op,
    /// except that an in-flight recipient with a fresh buffer gets its
    /// timer re-armed.
    pub async fn flush(self: Arc<Self>, recipient: String) {
        let rearm = {
            let mut inner = self.inner.lock().expect("aggregator lock poisoned");
            inner.timers.remove(&recipient);

            if inner.in_flight.contains(&recipient) {
                inner.buffers.contains_key(&recipient)
            } else {
                match inner.buffers.remove(&recipient) {
                    Some(buffer) if !buffer.is_empty() => {
                        inner.in_flight.insert(recipient.clone());
                        debug!(recipient, buffered = buffer.len(), "flushing burst");
                        false
                    }
                    _ => return,
                }
            }
        };

        if rearm {
            debug!(recipient, "recipient in flight, re-arming timer");
            self.arm_timer(recipient);
            return;
        }

        if let Err(error) = self.handler.process(&recipient).await {
            warn!(recipient, %error, "flush failed, burst dropped");
        }

        // Cleanup runs regardless of the outcome above. The buffer was
        // already removed when the recipient entered the in-flight set.
        self.inner
            .lock()
            .expect("aggregator lock poisoned")
            .in_flight
            .remove(&recipient);
    }

    /// Number of buffered messages for `recipient`.
    pub fn pending(&self, recipient: &str) -> usize {
        self.inner
            .lock()
            .expect("aggregator lock poisoned")
            .buffers
            .get(recipient)
            .map_or(0, Vec::len)
    }

    /// Abort pending timers and drop unflushed buffers. A restart losing
    /// buffered-but-unflushed messages is an accepted tradeoff.
    pub fn shutdown(&self) {
        let mut inner = self.inner.lock().expect("aggregator lock poisoned");
        for (recipient, timer) in inner.timers.drain() {
            debug!(recipient, "aborting pending debounce timer");
            timer.abort();
        }
        inner.buffers.clear();
    }

    fn arm_timer(self: &Arc<Self>, recipient: String) {
        let aggregator = Arc::clone(self);
        let debounce = self.debounce;
        let key = recipient.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            aggregator.flush(recipient).await;
        });
        let mut inner = self.inner.lock().expect("aggregator lock poisoned");
        if let Some(old) = inner.timers.insert(key, handle) {
            old.abort();
        }
    }
}
