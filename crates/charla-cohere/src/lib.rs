// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cohere adapters for chat completion and query embedding.
//!
//! Both adapters share [`client::CohereClient`], which owns authentication
//! and transient-error retry.

pub mod client;
pub mod embed;
pub mod provider;
pub mod types;

pub use embed::CohereEmbedder;
pub use provider::CohereProvider;
