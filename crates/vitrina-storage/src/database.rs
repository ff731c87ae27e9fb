// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;

use vitrina_core::VitrinaError;

/// Handle to the single SQLite connection shared by all queries.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path` with WAL mode enabled and run
    /// all pending migrations. Parent directories are created as needed.
    pub async fn open(path: &str) -> Result<Self, VitrinaError> {
        Self::open_with_options(path, true).await
    }

    /// Open with an explicit WAL mode choice.
    pub async fn open_with_options(path: &str, wal_mode: bool) -> Result<Self, VitrinaError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| VitrinaError::Storage {
                source: Box::new(e),
            })?;
        }

        // `open` fails with a plain rusqlite error, before any call() wrapper.
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| VitrinaError::Storage {
                source: Box::new(e),
            })?;

        conn.call(move |conn| {
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")?;
            }
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.pragma_update(None, "busy_timeout", 5000)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        // The migration closure carries its own error type through call().
        conn.call(|conn| crate::migrations::run_migrations(conn))
            .await
            .map_err(|e| match e {
                tokio_rusqlite::Error::Error(e) => e,
                e => VitrinaError::Internal(e.to_string()),
            })?;

        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection. All reads and writes go
    /// through `connection().call(..)`.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Close the connection, flushing the WAL.
    pub async fn close(self) -> Result<(), VitrinaError> {
        self.conn
            .close()
            .await
            .map_err(|e| VitrinaError::Storage {
                source: Box::new(e),
            })
    }
}

/// Map a tokio-rusqlite error into the domain storage error.
pub fn map_tr_err(e: tokio_rusqlite::Error) -> VitrinaError {
    VitrinaError::Storage {
        source: Box::new(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_parent_dirs_and_schema() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested/deeper/test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();

        let tables: Vec<String> = db
            .connection()
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
                )?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                let mut names = Vec::new();
                for row in rows {
                    names.push(row?);
                }
                Ok::<_, rusqlite::Error>(names)
            })
            .await
            .unwrap();

        assert!(tables.iter().any(|t| t == "announcements"));
        assert!(tables.iter().any(|t| t == "custom_requests"));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reopen_is_idempotent() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let path = db_path.to_str().unwrap();

        let db = Database::open(path).await.unwrap();
        db.close().await.unwrap();

        // Migrations must not re-run destructively.
        let db = Database::open(path).await.unwrap();
        db.close().await.unwrap();
    }
}
