//! Database connection management
//!
//! Opens and configures SQLite connections and owns the single shared
//! connection used by the persistence agent.

#![allow(clippy::result_large_err)]

use crate::config::DatabaseConfig;
use crate::errors::{from_rusqlite, lock_poisoned, Result};
use crate::migrations::apply_migrations;
use rusqlite::{Connection, Transaction};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Configure a connection
///
/// Foreign keys must be on for param rows to cascade with their instance.
/// Returns the journal mode SQLite actually selected, which is `memory` for
/// in-memory databases whatever was requested.
pub fn configure(conn: &Connection, journal_mode: &str) -> Result<String> {
    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(from_rusqlite)?;

    let selected: String = conn
        .pragma_update_and_check(None, "journal_mode", journal_mode, |row| row.get(0))
        .map_err(from_rusqlite)?;

    tracing::debug!(requested = journal_mode, selected = %selected, "Configured connection");

    Ok(selected)
}

/// Shared, migrated database handle
///
/// SQLite connections are not safe to use from two threads at once, so the
/// connection lives behind a mutex and every agent operation holds it for
/// the duration of one transaction.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (creating if needed) and migrate the database described by `config`
    ///
    /// Without a path an in-memory database is opened.
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        let conn = match &config.path {
            Some(path) => open(path)?,
            None => open_in_memory()?,
        };
        Self::prepare(conn, &config.journal_mode)
    }

    /// Open and migrate a fresh in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::prepare(open_in_memory()?, "MEMORY")
    }

    /// Take ownership of an existing connection, configuring and migrating it
    pub fn from_connection(conn: Connection) -> Result<Self> {
        Self::prepare(conn, "WAL")
    }

    fn prepare(mut conn: Connection, journal_mode: &str) -> Result<Self> {
        configure(&conn, journal_mode)?;
        apply_migrations(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self, op: &str) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| lock_poisoned(op))
    }

    /// Run `f` inside one transaction
    ///
    /// Commits when `f` succeeds. On error the transaction is rolled back
    /// and the original error returned, so no partial write is ever visible.
    pub fn transaction<T, F>(&self, op: &str, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let mut conn = self.lock(op)?;
        let tx = conn.transaction().map_err(from_rusqlite)?;

        match f(&tx) {
            Ok(value) => {
                tx.commit().map_err(from_rusqlite)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    tracing::warn!(op, error = %rollback_err, "Rollback failed");
                }
                Err(err)
            }
        }
    }

    /// Run a read-only closure against the connection
    pub fn with_connection<T, F>(&self, op: &str, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.lock(op)?;
        f(&conn)
    }
}
