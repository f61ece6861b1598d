// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Charla WhatsApp assistant.
//!
//! This crate provides the foundational trait definitions, error types,
//! common types, and text normalization used throughout the Charla
//! workspace. All adapter plugins implement traits defined here.

pub mod error;
pub mod text;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::CharlaError;
pub use types::{AdapterType, HealthStatus, MessageId};

// Re-export all adapter traits at crate root.
pub use traits::{
    DocumentStore, EmbeddingAdapter, GatewayAdapter, PluginAdapter, ProviderAdapter,
    TranscriberAdapter, VectorSearchAdapter,
};
