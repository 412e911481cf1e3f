//! SQLite repository for instance and param rows
//!
//! Plain row access; all functions take a connection (or a transaction,
//! which derefs to one) owned by the caller.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use crate::repo::models::{InstanceRow, ParamRow};
use rusqlite::{Connection, OptionalExtension};

/// SQLite repository for instances and their params
pub struct SqliteRepo;

impl SqliteRepo {
    /// Insert an instance row
    pub fn insert_instance(conn: &Connection, row: &InstanceRow) -> Result<()> {
        conn.execute(
            "INSERT INTO instances (id, class_path) VALUES (?1, ?2)",
            rusqlite::params![row.id, row.class_path],
        )
        .map_err(from_rusqlite)?;

        tracing::debug!(instance_id = %row.id, class_path = %row.class_path, "Inserted instance row");
        Ok(())
    }

    /// Get an instance row by id
    pub fn get_instance(conn: &Connection, instance_id: &str) -> Result<Option<InstanceRow>> {
        conn.query_row(
            "SELECT id, class_path FROM instances WHERE id = ?1",
            [instance_id],
            |row| {
                Ok(InstanceRow {
                    id: row.get(0)?,
                    class_path: row.get(1)?,
                })
            },
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Set the class path recorded for an instance
    pub fn update_instance_class_path(
        conn: &Connection,
        instance_id: &str,
        class_path: &str,
    ) -> Result<()> {
        conn.execute(
            "UPDATE instances SET class_path = ?1 WHERE id = ?2",
            rusqlite::params![class_path, instance_id],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    /// Delete an instance row; its params cascade
    ///
    /// Returns whether a row was deleted.
    pub fn delete_instance(conn: &Connection, instance_id: &str) -> Result<bool> {
        let deleted = conn
            .execute("DELETE FROM instances WHERE id = ?1", [instance_id])
            .map_err(from_rusqlite)?;
        Ok(deleted > 0)
    }

    /// Insert a param row
    pub fn insert_param(conn: &Connection, row: &ParamRow) -> Result<()> {
        conn.execute(
            "INSERT INTO params (id, instance_id, value) VALUES (?1, ?2, ?3)",
            rusqlite::params![row.id, row.instance_id, row.value],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    /// All param rows of an instance, in insertion order
    pub fn params_for_instance(conn: &Connection, instance_id: &str) -> Result<Vec<ParamRow>> {
        let mut stmt = conn
            .prepare("SELECT id, instance_id, value FROM params WHERE instance_id = ?1 ORDER BY rowid")
            .map_err(from_rusqlite)?;

        let rows = stmt
            .query_map([instance_id], |row| {
                Ok(ParamRow {
                    id: row.get(0)?,
                    instance_id: row.get(1)?,
                    value: row.get(2)?,
                })
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        Ok(rows)
    }

    /// Replace the stored triple text of a param row
    pub fn update_param_value(conn: &Connection, param_id: &str, value: &str) -> Result<()> {
        conn.execute(
            "UPDATE params SET value = ?1 WHERE id = ?2",
            rusqlite::params![value, param_id],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    /// Delete a param row by id
    pub fn delete_param(conn: &Connection, param_id: &str) -> Result<()> {
        conn.execute("DELETE FROM params WHERE id = ?1", [param_id])
            .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn count_instances(conn: &Connection) -> Result<usize> {
        count(conn, "SELECT COUNT(*) FROM instances", [])
    }

    pub fn count_params(conn: &Connection) -> Result<usize> {
        count(conn, "SELECT COUNT(*) FROM params", [])
    }

    pub fn count_params_for_instance(conn: &Connection, instance_id: &str) -> Result<usize> {
        count(
            conn,
            "SELECT COUNT(*) FROM params WHERE instance_id = ?1",
            [instance_id],
        )
    }
}

fn count<P: rusqlite::Params>(conn: &Connection, sql: &str, params: P) -> Result<usize> {
    let n: i64 = conn
        .query_row(sql, params, |row| row.get(0))
        .map_err(from_rusqlite)?;
    Ok(usize::try_from(n).unwrap_or_default())
}
