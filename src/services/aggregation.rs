use std::collections::HashSet;

use anyhow::Result;
use chrono::{NaiveDateTime, Utc};
use log::{debug, info};

use crate::config::settings::AggregationSettings;
use crate::database::{self, DbConn, DbPool};
use crate::ranking::{self, CountryAggregate};
use crate::ranking::types::{AlbumVote, TrackVote};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationSummary {
    pub countries_written: usize,
    pub countries_skipped: usize,
    pub countries_pruned: usize,
}

/// Recomputes every country aggregate from scratch.
pub struct AggregationService {
    pool: DbPool,
    config: AggregationSettings,
}

impl AggregationService {
    pub fn new(pool: DbPool, config: AggregationSettings) -> Self {
        Self { pool, config }
    }

    pub fn recompute_global_rankings(&self) -> Result<AggregationSummary> {
        info!("=== Starting Global Ranking Aggregation ===");
        let mut conn = database::get_connection(&self.pool)?;
        let calculated_at = Utc::now().naive_utc();

        // Step 1: Gate countries by number of ranking users
        let counts = database::users::list_ranking_user_counts(&mut conn)?;
        let (qualifying, below): (Vec<_>, Vec<_>) = counts
            .into_iter()
            .partition(|c| c.user_count as usize >= self.config.min_users_per_country);
        info!(
            "  → {} countries qualify, {} below the {}-user threshold",
            qualifying.len(),
            below.len(),
            self.config.min_users_per_country
        );
        for country in &below {
            debug!("    skipping {} ({} ranking users)", country.country, country.user_count);
        }

        // Step 2: Aggregate and upsert each qualifying country
        for country in &qualifying {
            let aggregate = self.aggregate_country(&mut conn, &country.country, country.user_count as usize)?;
            self.save_aggregate(&mut conn, &aggregate, calculated_at)?;
            info!(
                "    → {}: {} users, {} albums, consensus album {:?}",
                aggregate.country_name,
                aggregate.user_count,
                aggregate.analysis.albums.len(),
                aggregate.consensus_album_id
            );
        }

        // Step 3: Drop aggregates of countries that no longer qualify
        let kept: HashSet<&str> = qualifying.iter().map(|c| c.country.as_str()).collect();
        let countries_pruned = if self.config.prune_stale {
            self.prune_stale_aggregates(&mut conn, &kept)?
        } else {
            0
        };

        let summary = AggregationSummary {
            countries_written: qualifying.len(),
            countries_skipped: below.len(),
            countries_pruned,
        };
        info!("=== Aggregation Complete: {:?} ===", summary);
        Ok(summary)
    }

    fn aggregate_country(&self, conn: &mut DbConn, country: &str, user_count: usize) -> Result<CountryAggregate> {
        let album_votes = self.load_album_votes(conn, country)?;
        let track_votes = self.load_track_votes(conn, country)?;
        Ok(ranking::aggregate_country(country, user_count, &album_votes, &track_votes))
    }

    fn load_album_votes(&self, conn: &mut DbConn, country: &str) -> Result<Vec<AlbumVote>> {
        let rows = database::rankings::list_album_rows_for_country(conn, country)?;
        Ok(rows
            .into_iter()
            .map(|r| AlbumVote {
                album_id: r.album_id,
                title: r.album_title,
                position: r.position,
            })
            .collect())
    }

    fn load_track_votes(&self, conn: &mut DbConn, country: &str) -> Result<Vec<TrackVote>> {
        let rows = database::rankings::list_track_rows_for_country(conn, country)?;
        Ok(rows
            .into_iter()
            .map(|r| TrackVote {
                track_id: r.track_id,
                album_id: r.album_id,
                position: r.position,
            })
            .collect())
    }

    fn save_aggregate(
        &self,
        conn: &mut DbConn,
        aggregate: &CountryAggregate,
        calculated_at: NaiveDateTime,
    ) -> Result<()> {
        let analysis = serde_json::to_string(&aggregate.analysis)?;
        database::aggregates::upsert_country_aggregate(
            conn,
            &aggregate.country_name,
            aggregate.user_count as i64,
            aggregate.consensus_album_id,
            aggregate.polarization_album_id,
            aggregate.global_consensus_track_id,
            &analysis,
            calculated_at,
        )?;
        Ok(())
    }

    fn prune_stale_aggregates(&self, conn: &mut DbConn, kept: &HashSet<&str>) -> Result<usize> {
        let mut pruned = 0;
        for existing in database::aggregates::list_all(conn)? {
            if kept.contains(existing.country_name.as_str()) {
                continue;
            }
            if database::aggregates::delete_by_country(conn, &existing.country_name)? {
                info!("    → Removed stale aggregate for {}", existing.country_name);
                pruned += 1;
            }
        }
        Ok(pruned)
    }
}
