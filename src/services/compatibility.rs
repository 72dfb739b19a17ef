use anyhow::Result;
use log::debug;

use crate::config::settings::CompatibilitySettings;
use crate::database::{self, DbConn, DbPool, SharedPositionRow};
use crate::ranking::types::{SharedPosition, UserId};
use crate::ranking::{self, PairwiseComparison, Scope};

pub struct CompatibilityService {
    pool: DbPool,
    config: CompatibilitySettings,
}

impl CompatibilityService {
    pub fn new(pool: DbPool, config: CompatibilitySettings) -> Self {
        Self { pool, config }
    }

    pub fn compatibility(&self, user_a: UserId, user_b: UserId, scope: Scope) -> Result<PairwiseComparison> {
        if user_a == user_b {
            return Ok(PairwiseComparison::identical());
        }
        let mut conn = database::get_connection(&self.pool)?;
        compare_users(&mut conn, user_a, user_b, scope, &self.config)
    }
}

/// Loads the positions both users gave within `scope` and compares them.
pub fn compare_users(
    conn: &mut DbConn,
    user_a: UserId,
    user_b: UserId,
    scope: Scope,
    config: &CompatibilitySettings,
) -> Result<PairwiseComparison> {
    if user_a == user_b {
        return Ok(PairwiseComparison::identical());
    }

    let rows = match scope {
        Scope::Albums => database::rankings::list_shared_album_positions(conn, user_a, user_b)?,
        Scope::TracksOfAlbum(album_id) => {
            database::rankings::list_shared_track_positions(conn, user_a, user_b, album_id)?
        }
    };
    debug!("Users {} and {} share {} items in {:?}", user_a, user_b, rows.len(), scope);

    let shared = convert_to_shared_positions(&rows);
    Ok(ranking::calculate_compatibility(user_a, user_b, &shared, config))
}

fn convert_to_shared_positions(rows: &[SharedPositionRow]) -> Vec<SharedPosition> {
    rows.iter()
        .map(|r| SharedPosition {
            item_id: r.item_id,
            position_a: r.position_a,
            position_b: r.position_b,
        })
        .collect()
}
