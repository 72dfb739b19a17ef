use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::{Album, Track};
use crate::errors::{query_context, write_context};

pub fn insert_album(conn: &mut DbConn, title: &str, release_date: Option<&str>) -> Result<Album> {
    let sql = "INSERT INTO albums (title, release_date) VALUES (?1, ?2) RETURNING id, title, release_date";

    conn.query_row(sql, params![title, release_date], parse_album_row)
        .with_context(|| write_context("insert", "album"))
}

fn parse_album_row(row: &rusqlite::Row) -> rusqlite::Result<Album> {
    Ok(Album {
        id: row.get(0)?,
        title: row.get(1)?,
        release_date: row.get(2)?,
    })
}

pub fn find_album_by_id(conn: &mut DbConn, id: i64) -> Result<Option<Album>> {
    let sql = "SELECT id, title, release_date FROM albums WHERE id = ?1";

    conn.query_row(sql, params![id], parse_album_row)
        .optional()
        .with_context(|| query_context("album by id"))
}

/// Removes an album and its tracks. Ranking rows that point at them are kept
/// and ignored by every aggregation.
pub fn delete_album(conn: &mut DbConn, id: i64) -> Result<bool> {
    let deleted = conn
        .execute("DELETE FROM albums WHERE id = ?1", params![id])
        .with_context(|| write_context("delete", "album"))?;
    Ok(deleted > 0)
}

pub fn insert_track(
    conn: &mut DbConn,
    album_id: i64,
    title: &str,
    track_number: i32,
) -> Result<Track> {
    let sql = "INSERT INTO tracks (album_id, title, track_number) VALUES (?1, ?2, ?3) RETURNING id, album_id, title, track_number";

    conn.query_row(sql, params![album_id, title, track_number], parse_track_row)
        .with_context(|| write_context("insert", "track"))
}

fn parse_track_row(row: &rusqlite::Row) -> rusqlite::Result<Track> {
    Ok(Track {
        id: row.get(0)?,
        album_id: row.get(1)?,
        title: row.get(2)?,
        track_number: row.get(3)?,
    })
}
