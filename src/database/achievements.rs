use anyhow::{Context, Result};
use rusqlite::{OptionalExtension, params};

use super::connection::DbConn;
use super::models::DbAchievement;

pub fn insert_achievement(
    conn: &mut DbConn,
    name: &str,
    description: &str,
    criteria: &str,
    xp: u32,
    category: &str,
) -> Result<DbAchievement> {
    let sql = "INSERT INTO achievements (name, description, criteria, xp, category) VALUES (?1, ?2, ?3, ?4, ?5) RETURNING id, name, description, criteria, xp, category";

    conn.query_row(
        sql,
        params![name, description, criteria, xp, category],
        parse_achievement_row,
    )
    .with_context(|| format!("Failed to insert achievement {:?}", name))
}

fn parse_achievement_row(row: &rusqlite::Row) -> rusqlite::Result<DbAchievement> {
    Ok(DbAchievement {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        criteria: row.get(3)?,
        xp: row.get(4)?,
        category: row.get(5)?,
    })
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<DbAchievement>> {
    let sql = "SELECT id, name, description, criteria, xp, category FROM achievements ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_achievement_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn get_by_id(conn: &mut DbConn, id: i64) -> Result<Option<DbAchievement>> {
    let sql = "SELECT id, name, description, criteria, xp, category FROM achievements WHERE id = ?1";

    conn.query_row(sql, params![id], parse_achievement_row)
        .optional()
        .context("Failed to query achievement by id")
}

pub fn find_by_name(conn: &mut DbConn, name: &str) -> Result<Option<DbAchievement>> {
    let sql = "SELECT id, name, description, criteria, xp, category FROM achievements WHERE name = ?1";

    conn.query_row(sql, params![name], parse_achievement_row)
        .optional()
        .context("Failed to query achievement by name")
}

pub fn count(conn: &mut DbConn) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM achievements", [], |row| row.get(0))
        .context("Failed to count achievements")
}
