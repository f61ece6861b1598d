// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Qdrant vector similarity search adapter, speaking the REST points API.

pub mod search;

pub use search::QdrantSearch;
