// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;

use tokio_rusqlite::Connection;
use tracing::debug;

use charla_core::CharlaError;

use crate::migrations;

/// Handle to the single SQLite connection used by the process.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, and run
    /// pending migrations.
    pub async fn open(path: &str) -> Result<Self, CharlaError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| CharlaError::Store {
                    source: Box::new(e),
                })?;
            }
        }

        let conn = Connection::open(path).await.map_err(store_err)?;
        Self::setup(&conn).await?;
        debug!(path, "database opened");
        Ok(Self { conn })
    }

    /// Open an in-memory database. Used by tests.
    pub async fn open_in_memory() -> Result<Self, CharlaError> {
        let conn = Connection::open_in_memory().await.map_err(store_err)?;
        Self::setup(&conn).await?;
        Ok(Self { conn })
    }

    async fn setup(conn: &Connection) -> Result<(), CharlaError> {
        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;",
            )
            .map_err(store_err)?;
            migrations::run_migrations(conn)?;
            Ok(())
        })
        .await
        .map_err(unwrap_call_err)
    }

    /// Returns the underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// Map a tokio-rusqlite error into the store error variant.
pub fn map_tr_err(err: tokio_rusqlite::Error) -> CharlaError {
    CharlaError::Store {
        source: Box::new(err),
    }
}

/// Box any error into the store error variant.
pub fn store_err<E>(err: E) -> CharlaError
where
    E: std::error::Error + Send + Sync + 'static,
{
    CharlaError::Store {
        source: Box::new(err),
    }
}

/// Unwrap the application error from a `call` whose closure fails with
/// [`CharlaError`], folding connection-level failures into the store variant.
pub fn unwrap_call_err(err: tokio_rusqlite::Error<CharlaError>) -> CharlaError {
    match err {
        tokio_rusqlite::Error::Error(e) => e,
        other => CharlaError::Store {
            source: other.to_string().into(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_in_memory_runs_migrations() {
        let db = Database::open_in_memory().await.unwrap();
        let count: i64 = db
            .connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row(
                    "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = 'documents'",
                    [],
                    |row| row.get(0),
                )
            })
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/charla.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();
        drop(db);
        assert!(path.exists());
    }
}
