// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;

use leadbot_core::LeadbotError;
use tracing::debug;

use crate::migrations;

/// Wraps a [`tokio_rusqlite::Connection`] that is the single writer for the
/// database file. Query modules take `&Database` and go through
/// [`Database::connection`].
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `path` in WAL mode and runs
    /// pending migrations.
    pub async fn open(path: &str) -> Result<Self, LeadbotError> {
        Self::open_with_options(path, true).await
    }

    /// Like [`Database::open`], with the journal mode chosen by the caller.
    pub async fn open_with_options(path: &str, wal_mode: bool) -> Result<Self, LeadbotError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| LeadbotError::Storage {
                source: Box::new(e),
            })?;
        }

        // Migrations need `&mut rusqlite::Connection`, so they run on a
        // short-lived blocking connection before the async writer is opened.
        let migrate_path = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), LeadbotError> {
            let mut conn = rusqlite::Connection::open(&migrate_path).map_err(map_sqlite_err)?;
            let journal = if wal_mode { "WAL" } else { "DELETE" };
            conn.pragma_update_and_check(None, "journal_mode", journal, |row| {
                row.get::<_, String>(0)
            })
            .map_err(map_sqlite_err)?;
            migrations::run_migrations(&mut conn)
        })
        .await
        .map_err(|e| LeadbotError::Internal(format!("migration task failed: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| LeadbotError::Storage {
                source: Box::new(e),
            })?;

        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch(
                "PRAGMA busy_timeout = 5000;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA foreign_keys = ON;",
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// Returns the async connection handle.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoints the WAL and closes the connection.
    pub async fn close(self) -> Result<(), LeadbotError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        self.conn.close().await.map_err(|e| LeadbotError::Storage {
            source: Box::new(e),
        })
    }
}

/// Maps a tokio-rusqlite call error into [`LeadbotError::Storage`].
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> LeadbotError {
    LeadbotError::Storage {
        source: Box::new(e),
    }
}

fn map_sqlite_err(e: rusqlite::Error) -> LeadbotError {
    LeadbotError::Storage {
        source: Box::new(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_file_and_parent_dirs() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested/dir/leadbot.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        assert!(db_path.exists());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn open_enables_wal_mode() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("wal.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        let mode: String = db
            .connection()
            .call(|conn| conn.query_row("PRAGMA journal_mode;", [], |row| row.get(0)))
            .await
            .map_err(map_tr_err)
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reopening_does_not_rerun_migrations() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("reopen.db");
        let path = db_path.to_str().unwrap();

        let db = Database::open(path).await.unwrap();
        db.close().await.unwrap();
        let db = Database::open(path).await.unwrap();

        let tables: i64 = db
            .connection()
            .call(|conn| {
                conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'leads'",
                    [],
                    |row| row.get(0),
                )
            })
            .await
            .map_err(map_tr_err)
            .unwrap();
        assert_eq!(tables, 1);
        db.close().await.unwrap();
    }
}
