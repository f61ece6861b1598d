// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Charla assistant.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, a keyed-JSON document store, and
//! the conversation-history wrapper used by the message pipeline.

pub mod database;
pub mod docstore;
pub mod history;
pub mod migrations;

pub use database::Database;
pub use docstore::SqliteDocumentStore;
pub use history::ChatHistory;
