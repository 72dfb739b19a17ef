use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::{Group, RankingRow, User};
use super::rankings::parse_ranking_row;
use crate::errors::{query_context, write_context};

pub fn insert_group(conn: &mut DbConn, name: &str) -> Result<Group> {
    let sql = "INSERT INTO user_groups (name) VALUES (?1) RETURNING id, name";

    conn.query_row(sql, params![name], parse_group_row)
        .with_context(|| write_context("insert", "group"))
}

fn parse_group_row(row: &rusqlite::Row) -> rusqlite::Result<Group> {
    Ok(Group {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

pub fn find_by_id(conn: &mut DbConn, id: i64) -> Result<Option<Group>> {
    conn.query_row("SELECT id, name FROM user_groups WHERE id = ?1", params![id], parse_group_row)
        .optional()
        .with_context(|| query_context("group by id"))
}

pub fn add_member(conn: &mut DbConn, group_id: i64, user_id: i64) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO group_members (group_id, user_id) VALUES (?1, ?2)",
        params![group_id, user_id],
    )
    .with_context(|| write_context("insert", "group member"))?;
    Ok(())
}

/// Marks an album as matched for the group, i.e. ranked and compared group-wide.
pub fn add_matched_album(conn: &mut DbConn, group_id: i64, album_id: i64) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO group_albums (group_id, album_id) VALUES (?1, ?2)",
        params![group_id, album_id],
    )
    .with_context(|| write_context("insert", "matched album"))?;
    Ok(())
}

pub fn list_members(conn: &mut DbConn, group_id: i64) -> Result<Vec<User>> {
    let sql = "
        SELECT u.id, u.username, u.country
        FROM group_members gm
        JOIN users u ON u.id = gm.user_id
        WHERE gm.group_id = ?1
        ORDER BY u.id
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![group_id], |row| {
            Ok(User {
                id: row.get(0)?,
                username: row.get(1)?,
                country: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("group members"))?;

    Ok(rows)
}

pub fn list_matched_album_ids(conn: &mut DbConn, group_id: i64) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare("SELECT album_id FROM group_albums WHERE group_id = ?1 ORDER BY album_id")?;
    let rows = stmt
        .query_map(params![group_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("matched albums"))?;

    Ok(rows)
}

/// Album rankings of group members for the group's matched albums, in
/// insertion order.
pub fn list_matched_album_rows(conn: &mut DbConn, group_id: i64) -> Result<Vec<RankingRow>> {
    let sql = "
        SELECT ar.id, ar.user_id, ar.album_id, ar.position
        FROM album_rankings ar
        JOIN group_members gm ON gm.user_id = ar.user_id AND gm.group_id = ?1
        JOIN group_albums ga ON ga.album_id = ar.album_id AND ga.group_id = ?1
        ORDER BY ar.id
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![group_id], parse_ranking_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("matched album rankings"))?;

    Ok(rows)
}

/// Every album ranking of group members, in insertion order.
pub fn list_member_album_rows(conn: &mut DbConn, group_id: i64) -> Result<Vec<RankingRow>> {
    let sql = "
        SELECT ar.id, ar.user_id, ar.album_id, ar.position
        FROM album_rankings ar
        JOIN group_members gm ON gm.user_id = ar.user_id AND gm.group_id = ?1
        JOIN albums a ON a.id = ar.album_id
        ORDER BY ar.id
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![group_id], parse_ranking_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("member album rankings"))?;

    Ok(rows)
}

/// Track rankings of group members for the tracks of one album, in insertion
/// order.
pub fn list_member_track_rows(conn: &mut DbConn, group_id: i64, album_id: i64) -> Result<Vec<RankingRow>> {
    let sql = "
        SELECT tr.id, tr.user_id, tr.track_id, tr.position
        FROM track_rankings tr
        JOIN group_members gm ON gm.user_id = tr.user_id AND gm.group_id = ?1
        JOIN tracks t ON t.id = tr.track_id
        WHERE t.album_id = ?2
        ORDER BY tr.id
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![group_id, album_id], parse_ranking_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("member track rankings"))?;

    Ok(rows)
}
