use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::{CountryRankingUsers, User};
use crate::errors::{query_context, write_context};

pub fn insert_user(conn: &mut DbConn, username: &str, country: Option<&str>) -> Result<User> {
    let sql = "INSERT INTO users (username, country) VALUES (?1, ?2) RETURNING id, username, country";

    conn.query_row(sql, params![username, country], parse_user_row)
        .with_context(|| write_context("insert", "user"))
}

fn parse_user_row(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        country: row.get(2)?,
    })
}

pub fn find_by_id(conn: &mut DbConn, id: i64) -> Result<Option<User>> {
    let sql = "SELECT id, username, country FROM users WHERE id = ?1";

    conn.query_row(sql, params![id], parse_user_row)
        .optional()
        .with_context(|| query_context("user by id"))
}

pub fn update_country(conn: &mut DbConn, id: i64, country: Option<&str>) -> Result<()> {
    conn.execute("UPDATE users SET country = ?1 WHERE id = ?2", params![country, id])
        .with_context(|| write_context("update", "user country"))?;
    Ok(())
}

/// Countries whose users have ranked at least one album that still exists
/// in the catalog, with the number of such users. Empty countries are
/// ignored.
pub fn list_ranking_user_counts(conn: &mut DbConn) -> Result<Vec<CountryRankingUsers>> {
    let sql = "
        SELECT u.country, COUNT(DISTINCT u.id)
        FROM users u
        JOIN album_rankings ar ON ar.user_id = u.id
        JOIN albums a ON a.id = ar.album_id
        WHERE u.country IS NOT NULL AND TRIM(u.country) <> ''
        GROUP BY u.country
        ORDER BY u.country
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(CountryRankingUsers {
                country: row.get(0)?,
                user_count: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("ranking users per country"))?;

    Ok(rows)
}
