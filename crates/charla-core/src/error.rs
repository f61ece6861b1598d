// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Charla assistant.

use thiserror::Error;

/// The primary error type used across all Charla adapter traits and core operations.
#[derive(Debug, Error)]
pub enum CharlaError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Document store errors (connection, query failure, serialization).
    #[error("store error: {source}")]
    Store {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Messaging gateway errors (delivery failure, media download, webhook format).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Chat-completion provider errors (API failure, token limits, model not found).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Vector search errors. Recovered inside the reply pipeline (degrades to
    /// zero context documents) and only surfaced when a caller uses the
    /// search adapter directly.
    #[error("search error: {message}")]
    Search {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The conversation contains no unanswered user text to reply to.
    #[error("no pending user query in conversation")]
    NoPendingQuery,

    /// The embedding for the pending query could not be obtained.
    #[error("embedding unavailable: {message}")]
    EmbeddingUnavailable { message: String },

    /// The chat-completion call failed; the flush is aborted.
    #[error("completion failed: {message}")]
    CompletionFailed { message: String },

    /// Every transcription provider was exhausted or unavailable.
    #[error("transcription failed: all providers exhausted")]
    TranscriptionFailed,

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
