// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock speech-to-text provider for fallback-chain tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use charla_core::CharlaError;
use charla_core::traits::adapter::PluginAdapter;
use charla_core::traits::transcriber::TranscriberAdapter;
use charla_core::types::{AdapterType, AudioFormat, HealthStatus};

/// A mock transcriber with queued outcomes.
///
/// Each queued `Option<String>` is one transcribe outcome: `Some` succeeds,
/// `None` tells the chain to try the next provider. An empty queue yields
/// `None`.
pub struct MockTranscriber {
    name: &'static str,
    available: bool,
    outcomes: Mutex<VecDeque<Option<String>>>,
    calls: AtomicUsize,
}

impl MockTranscriber {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            available: true,
            outcomes: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// A transcriber whose credential is absent; the chain must skip it
    /// without calling transcribe.
    pub fn unavailable(name: &'static str) -> Self {
        Self {
            name,
            available: false,
            outcomes: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn push_outcome(&self, outcome: Option<&str>) {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(outcome.map(String::from));
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PluginAdapter for MockTranscriber {
    fn name(&self) -> &str {
        self.name
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Transcriber
    }

    async fn health_check(&self) -> Result<HealthStatus, CharlaError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CharlaError> {
        Ok(())
    }
}

#[async_trait]
impl TranscriberAdapter for MockTranscriber {
    fn available(&self) -> bool {
        self.available
    }

    async fn transcribe(
        &self,
        _audio: &[u8],
        _format: AudioFormat,
        _language: &str,
    ) -> Result<Option<String>, CharlaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.outcomes.lock().unwrap().pop_front().flatten())
    }
}
