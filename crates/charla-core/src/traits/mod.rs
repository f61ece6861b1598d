// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the Charla plugin model.

pub mod adapter;
pub mod embedding;
pub mod gateway;
pub mod provider;
pub mod search;
pub mod store;
pub mod transcriber;

pub use adapter::PluginAdapter;
pub use embedding::EmbeddingAdapter;
pub use gateway::GatewayAdapter;
pub use provider::ProviderAdapter;
pub use search::VectorSearchAdapter;
pub use store::DocumentStore;
pub use transcriber::TranscriberAdapter;
