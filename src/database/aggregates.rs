use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::DbCountryAggregate;
use crate::errors::{query_context, write_context};

#[allow(clippy::too_many_arguments)]
pub fn upsert_country_aggregate(
    conn: &mut DbConn,
    country_name: &str,
    user_count: i64,
    consensus_album_id: Option<i64>,
    polarization_album_id: Option<i64>,
    global_consensus_track_id: Option<i64>,
    analysis: &str,
    calculated_at: NaiveDateTime,
) -> Result<DbCountryAggregate> {
    let sql = "
        INSERT INTO country_aggregates (country_name, user_count, consensus_album_id, polarization_album_id, global_consensus_track_id, analysis, calculated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ON CONFLICT(country_name) DO UPDATE SET
            user_count = excluded.user_count,
            consensus_album_id = excluded.consensus_album_id,
            polarization_album_id = excluded.polarization_album_id,
            global_consensus_track_id = excluded.global_consensus_track_id,
            analysis = excluded.analysis,
            calculated_at = excluded.calculated_at
        RETURNING id, country_name, user_count, consensus_album_id, polarization_album_id, global_consensus_track_id, analysis, calculated_at
    ";

    conn.query_row(
        sql,
        params![
            country_name,
            user_count,
            consensus_album_id,
            polarization_album_id,
            global_consensus_track_id,
            analysis,
            calculated_at
        ],
        parse_aggregate_row,
    )
    .with_context(|| write_context("upsert", "country aggregate"))
}

fn parse_aggregate_row(row: &rusqlite::Row) -> rusqlite::Result<DbCountryAggregate> {
    Ok(DbCountryAggregate {
        id: row.get(0)?,
        country_name: row.get(1)?,
        user_count: row.get(2)?,
        consensus_album_id: row.get(3)?,
        polarization_album_id: row.get(4)?,
        global_consensus_track_id: row.get(5)?,
        analysis: row.get(6)?,
        calculated_at: row.get(7)?,
    })
}

pub fn find_by_country(conn: &mut DbConn, country_name: &str) -> Result<Option<DbCountryAggregate>> {
    let sql = "SELECT id, country_name, user_count, consensus_album_id, polarization_album_id, global_consensus_track_id, analysis, calculated_at FROM country_aggregates WHERE country_name = ?1";

    conn.query_row(sql, params![country_name], parse_aggregate_row)
        .optional()
        .with_context(|| query_context("country aggregate"))
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<DbCountryAggregate>> {
    let sql = "SELECT id, country_name, user_count, consensus_album_id, polarization_album_id, global_consensus_track_id, analysis, calculated_at FROM country_aggregates ORDER BY country_name";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_aggregate_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("country aggregates"))?;

    Ok(rows)
}

pub fn delete_by_country(conn: &mut DbConn, country_name: &str) -> Result<bool> {
    let deleted = conn
        .execute("DELETE FROM country_aggregates WHERE country_name = ?1", params![country_name])
        .with_context(|| write_context("delete", "country aggregate"))?;
    Ok(deleted > 0)
}
