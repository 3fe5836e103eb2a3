use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use super::connection::DbConn;
use super::models::DbProgressEntry;

pub fn upsert_entry(
    conn: &mut DbConn,
    namespace: &str,
    key: &str,
    value: &str,
) -> Result<DbProgressEntry> {
    upsert_with(conn, namespace, key, value)
}

/// Writes every entry or none of them
pub fn upsert_entries(
    conn: &mut DbConn,
    namespace: &str,
    entries: &[(&str, String)],
) -> Result<()> {
    let tx = conn
        .transaction()
        .context("Failed to start progress transaction")?;
    for (key, value) in entries {
        upsert_with(&tx, namespace, key, value)?;
    }
    tx.commit().context("Failed to commit progress entries")
}

fn upsert_with(
    conn: &Connection,
    namespace: &str,
    key: &str,
    value: &str,
) -> Result<DbProgressEntry> {
    let sql = "INSERT INTO progress_entries (namespace, key, value, updated_at) VALUES (?1, ?2, ?3, ?4) ON CONFLICT(namespace, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at RETURNING namespace, key, value, updated_at";
    let updated_at: NaiveDateTime = Utc::now().naive_utc();

    conn.query_row(
        sql,
        params![namespace, key, value, updated_at],
        parse_entry_row,
    )
    .context("Failed to upsert progress entry")
}

fn parse_entry_row(row: &rusqlite::Row) -> rusqlite::Result<DbProgressEntry> {
    Ok(DbProgressEntry {
        namespace: row.get(0)?,
        key: row.get(1)?,
        value: row.get(2)?,
        updated_at: row.get(3)?,
    })
}

pub fn get_entry(
    conn: &mut DbConn,
    namespace: &str,
    key: &str,
) -> Result<Option<DbProgressEntry>> {
    let sql = "SELECT namespace, key, value, updated_at FROM progress_entries WHERE namespace = ?1 AND key = ?2";

    conn.query_row(sql, params![namespace, key], parse_entry_row)
        .optional()
        .context("Failed to query progress entry")
}

pub fn list_keys(conn: &mut DbConn, namespace: &str) -> Result<Vec<String>> {
    let sql = "SELECT key FROM progress_entries WHERE namespace = ?1 ORDER BY key";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![namespace], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;

    Ok(rows)
}
