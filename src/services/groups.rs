use anyhow::Result;
use log::{debug, info};

use crate::config::settings::CompatibilitySettings;
use crate::database::{self, DbConn, DbPool, Group, RankingRow};
use crate::ranking::group_analysis::{self, Member, PairComparison};
use crate::ranking::types::PositionRecord;
use crate::ranking::{self, GroupAnalysisOutcome, Scope};
use crate::services::compatibility::compare_users;

pub struct GroupService {
    pool: DbPool,
    config: CompatibilitySettings,
}

impl GroupService {
    pub fn new(pool: DbPool, config: CompatibilitySettings) -> Self {
        Self { pool, config }
    }

    pub fn find_group(&self, group_id: i64) -> Result<Option<Group>> {
        let mut conn = database::get_connection(&self.pool)?;
        database::groups::find_by_id(&mut conn, group_id)
    }

    /// How closely members agree on the group's matched albums, in `[0, 100]`.
    pub fn coherence(&self, group_id: i64) -> Result<f64> {
        let mut conn = database::get_connection(&self.pool)?;

        let members: Vec<i64> = database::groups::list_members(&mut conn, group_id)?
            .into_iter()
            .map(|u| u.id)
            .collect();
        let matched_albums = database::groups::list_matched_album_ids(&mut conn, group_id)?;
        let records = to_position_records(database::groups::list_matched_album_rows(&mut conn, group_id)?);
        debug!(
            "Group {}: {} members, {} matched albums, {} positions",
            group_id,
            members.len(),
            matched_albums.len(),
            records.len()
        );

        Ok(ranking::calculate_coherence(&members, &matched_albums, &records, &self.config))
    }

    pub fn analyze_group(&self, group_id: i64, scope: Scope) -> Result<GroupAnalysisOutcome> {
        let mut conn = database::get_connection(&self.pool)?;

        let members: Vec<Member> = database::groups::list_members(&mut conn, group_id)?
            .into_iter()
            .map(|u| Member { user_id: u.id, username: u.username })
            .collect();
        if members.len() < 2 {
            return Ok(GroupAnalysisOutcome::TooFewMembers { member_count: members.len() });
        }

        let records = self.load_scope_records(&mut conn, group_id, scope)?;
        let missing = group_analysis::members_without_rankings(&members, &records);
        if !missing.is_empty() {
            info!("Group {} analysis blocked, unranked members: {:?}", group_id, missing);
            return Ok(GroupAnalysisOutcome::MissingRankings { usernames: missing });
        }

        let comparisons = self.compare_all_pairs(&mut conn, &members, scope)?;
        let analysis = group_analysis::summarize_group(&members, comparisons, &records);
        info!(
            "Group {} analysis over {:?}: {} pairs, {:.2}% compatible",
            group_id,
            scope,
            analysis.comparisons.len(),
            analysis.group_compatibility_percent
        );
        Ok(GroupAnalysisOutcome::Analysis(analysis))
    }

    fn load_scope_records(&self, conn: &mut DbConn, group_id: i64, scope: Scope) -> Result<Vec<PositionRecord>> {
        let rows = match scope {
            Scope::Albums => database::groups::list_member_album_rows(conn, group_id)?,
            Scope::TracksOfAlbum(album_id) => database::groups::list_member_track_rows(conn, group_id, album_id)?,
        };
        Ok(to_position_records(rows))
    }

    fn compare_all_pairs(&self, conn: &mut DbConn, members: &[Member], scope: Scope) -> Result<Vec<PairComparison>> {
        group_analysis::member_pairs(members)
            .into_iter()
            .map(|(a, b)| {
                let comparison = compare_users(conn, a.user_id, b.user_id, scope, &self.config)?;
                Ok(PairComparison {
                    user_a: a.username.clone(),
                    user_b: b.username.clone(),
                    comparison,
                })
            })
            .collect()
    }
}

fn to_position_records(rows: Vec<RankingRow>) -> Vec<PositionRecord> {
    rows.into_iter()
        .map(|r| PositionRecord {
            sequence: r.id,
            user_id: r.user_id,
            item_id: r.item_id,
            position: r.position,
        })
        .collect()
}
