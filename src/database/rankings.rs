use std::collections::HashSet;

use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::{AlbumRankingRow, NewRankingEntry, RankingRow, SharedPositionRow, TrackRankingRow};
use crate::errors::{query_context, write_context, RankingValidationError};

/// Replaces every album ranking of `user_id` with `entries`.
pub fn replace_album_rankings(
    conn: &mut DbConn,
    user_id: i64,
    entries: &[NewRankingEntry],
) -> Result<usize> {
    validate_entries(entries)?;

    let tx = conn.transaction()?;
    tx.execute("DELETE FROM album_rankings WHERE user_id = ?1", params![user_id])
        .with_context(|| write_context("clear", "album rankings"))?;

    {
        let mut stmt = tx.prepare("INSERT INTO album_rankings (user_id, album_id, position) VALUES (?1, ?2, ?3)")?;
        for entry in entries {
            stmt.execute(params![user_id, entry.item_id, entry.position])
                .with_context(|| write_context("insert", "album ranking"))?;
        }
    }

    tx.commit()?;
    log::debug!("Replaced album ranking of user {} ({} entries)", user_id, entries.len());
    Ok(entries.len())
}

/// Replaces the track ranking of `user_id` for one album. Rankings of tracks
/// from other albums are left alone.
pub fn replace_track_rankings(
    conn: &mut DbConn,
    user_id: i64,
    album_id: i64,
    entries: &[NewRankingEntry],
) -> Result<usize> {
    validate_entries(entries)?;

    let tx = conn.transaction()?;

    for entry in entries {
        let owner: Option<i64> = tx
            .query_row("SELECT album_id FROM tracks WHERE id = ?1", params![entry.item_id], |row| row.get(0))
            .optional()
            .with_context(|| query_context("track owner"))?;
        if owner != Some(album_id) {
            return Err(RankingValidationError::TrackOutsideAlbum {
                track_id: entry.item_id,
                album_id,
            }
            .into());
        }
    }

    tx.execute(
        "DELETE FROM track_rankings WHERE user_id = ?1 AND track_id IN (SELECT id FROM tracks WHERE album_id = ?2)",
        params![user_id, album_id],
    )
    .with_context(|| write_context("clear", "track rankings"))?;

    {
        let mut stmt = tx.prepare("INSERT INTO track_rankings (user_id, track_id, position) VALUES (?1, ?2, ?3)")?;
        for entry in entries {
            stmt.execute(params![user_id, entry.item_id, entry.position])
                .with_context(|| write_context("insert", "track ranking"))?;
        }
    }

    tx.commit()?;
    log::debug!(
        "Replaced track ranking of user {} for album {} ({} entries)",
        user_id,
        album_id,
        entries.len()
    );
    Ok(entries.len())
}

fn validate_entries(entries: &[NewRankingEntry]) -> Result<(), RankingValidationError> {
    let mut positions = HashSet::new();
    let mut items = HashSet::new();

    for entry in entries {
        if entry.position < 1 {
            return Err(RankingValidationError::InvalidPosition(entry.position));
        }
        if !positions.insert(entry.position) {
            return Err(RankingValidationError::DuplicatePosition(entry.position));
        }
        if !items.insert(entry.item_id) {
            return Err(RankingValidationError::DuplicateItem(entry.item_id));
        }
    }

    Ok(())
}

/// Albums ranked by both users, ordered by album id.
pub fn list_shared_album_positions(
    conn: &mut DbConn,
    user_a: i64,
    user_b: i64,
) -> Result<Vec<SharedPositionRow>> {
    let sql = "
        SELECT ra.album_id, ra.position, rb.position
        FROM album_rankings ra
        JOIN album_rankings rb ON rb.album_id = ra.album_id AND rb.user_id = ?2
        JOIN albums a ON a.id = ra.album_id
        WHERE ra.user_id = ?1
        ORDER BY ra.album_id, ra.id, rb.id
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![user_a, user_b], parse_shared_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("shared album positions"))?;

    Ok(rows)
}

/// Tracks of `album_id` ranked by both users, ordered by track id.
pub fn list_shared_track_positions(
    conn: &mut DbConn,
    user_a: i64,
    user_b: i64,
    album_id: i64,
) -> Result<Vec<SharedPositionRow>> {
    let sql = "
        SELECT ra.track_id, ra.position, rb.position
        FROM track_rankings ra
        JOIN track_rankings rb ON rb.track_id = ra.track_id AND rb.user_id = ?2
        JOIN tracks t ON t.id = ra.track_id
        WHERE ra.user_id = ?1 AND t.album_id = ?3
        ORDER BY ra.track_id, ra.id, rb.id
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![user_a, user_b, album_id], parse_shared_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("shared track positions"))?;

    Ok(rows)
}

fn parse_shared_row(row: &rusqlite::Row) -> rusqlite::Result<SharedPositionRow> {
    Ok(SharedPositionRow {
        item_id: row.get(0)?,
        position_a: row.get(1)?,
        position_b: row.get(2)?,
    })
}

/// Album rankings of every user from `country`, skipping albums missing from
/// the catalog.
pub fn list_album_rows_for_country(conn: &mut DbConn, country: &str) -> Result<Vec<AlbumRankingRow>> {
    let sql = "
        SELECT ar.album_id, a.title, ar.position
        FROM album_rankings ar
        JOIN users u ON u.id = ar.user_id
        JOIN albums a ON a.id = ar.album_id
        WHERE u.country = ?1
        ORDER BY ar.album_id, ar.id
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![country], |row| {
            Ok(AlbumRankingRow {
                album_id: row.get(0)?,
                album_title: row.get(1)?,
                position: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("album rankings by country"))?;

    Ok(rows)
}

/// Track rankings of every user from `country`, skipping tracks missing from
/// the catalog.
pub fn list_track_rows_for_country(conn: &mut DbConn, country: &str) -> Result<Vec<TrackRankingRow>> {
    let sql = "
        SELECT tr.track_id, t.album_id, tr.position
        FROM track_rankings tr
        JOIN users u ON u.id = tr.user_id
        JOIN tracks t ON t.id = tr.track_id
        WHERE u.country = ?1
        ORDER BY tr.track_id, tr.id
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![country], |row| {
            Ok(TrackRankingRow {
                track_id: row.get(0)?,
                album_id: row.get(1)?,
                position: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("track rankings by country"))?;

    Ok(rows)
}

pub fn list_album_rows_for_user(conn: &mut DbConn, user_id: i64) -> Result<Vec<RankingRow>> {
    let sql = "SELECT id, user_id, album_id, position FROM album_rankings WHERE user_id = ?1 ORDER BY position";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![user_id], parse_ranking_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("album rankings of user"))?;

    Ok(rows)
}

pub(super) fn parse_ranking_row(row: &rusqlite::Row) -> rusqlite::Result<RankingRow> {
    Ok(RankingRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        item_id: row.get(2)?,
        position: row.get(3)?,
    })
}
