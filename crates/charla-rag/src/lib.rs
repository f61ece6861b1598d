// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retrieval-augmented generation for the Charla assistant.
//!
//! Holds the content-addressed embedding cache, the context retriever, the
//! WhatsApp output formatting pass, and the reply orchestrator that ties
//! them to the completion provider.

pub mod cache;
pub mod format;
pub mod orchestrator;
pub mod retriever;

pub use cache::EmbeddingCache;
pub use format::format_for_whatsapp;
pub use orchestrator::ReplyOrchestrator;
pub use retriever::ContextRetriever;
