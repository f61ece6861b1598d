// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Charla integration tests.
//!
//! Provides mock adapters for fast, deterministic, CI-runnable tests
//! without external services.
//!
//! # Components
//!
//! - [`MockProvider`] - completion provider with pre-configured responses
//! - [`MockEmbedder`] - embedding adapter returning a fixed vector
//! - [`MockVectorSearch`] - search adapter with fixed payloads
//! - [`MockDocumentStore`] - in-memory document store
//! - [`MockGateway`] - gateway capturing outbound sends
//! - [`MockTranscriber`] - speech-to-text provider with queued outcomes

pub mod mock_embedder;
pub mod mock_gateway;
pub mod mock_provider;
pub mod mock_search;
pub mod mock_store;
pub mod mock_transcriber;

pub use mock_embedder::MockEmbedder;
pub use mock_gateway::MockGateway;
pub use mock_provider::MockProvider;
pub use mock_search::MockVectorSearch;
pub use mock_store::MockDocumentStore;
pub use mock_transcriber::MockTranscriber;
