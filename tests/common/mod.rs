#![allow(dead_code)]

use album_rankings::config::settings::AppConfig;
use album_rankings::database::{self, DbConn, DbPool, NewRankingEntry};
use tempfile::TempDir;

/// A schema-initialised SQLite database living in a temporary directory.
pub struct TestDb {
    _dir: TempDir,
    pub path: String,
    pub pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rankings.db").to_string_lossy().into_owned();
        let pool = database::create_pool(&path).unwrap();
        database::setup::ensure_schema(&mut database::get_connection(&pool).unwrap()).unwrap();
        Self { _dir: dir, path, pool }
    }

    pub fn config(&self) -> AppConfig {
        AppConfig::new().with_database_path(self.path.clone())
    }

    pub fn conn(&self) -> DbConn {
        database::get_connection(&self.pool).unwrap()
    }

    pub fn user(&self, username: &str, country: Option<&str>) -> i64 {
        database::users::insert_user(&mut self.conn(), username, country).unwrap().id
    }

    pub fn album(&self, title: &str) -> i64 {
        database::catalog::insert_album(&mut self.conn(), title, None).unwrap().id
    }

    pub fn track(&self, album_id: i64, title: &str, track_number: i32) -> i64 {
        database::catalog::insert_track(&mut self.conn(), album_id, title, track_number)
            .unwrap()
            .id
    }

    pub fn group(&self, name: &str, members: &[i64], matched_albums: &[i64]) -> i64 {
        let mut conn = self.conn();
        let group = database::groups::insert_group(&mut conn, name).unwrap();
        for &user_id in members {
            database::groups::add_member(&mut conn, group.id, user_id).unwrap();
        }
        for &album_id in matched_albums {
            database::groups::add_matched_album(&mut conn, group.id, album_id).unwrap();
        }
        group.id
    }

    /// `ranking` lists (album id, position) pairs.
    pub fn rank_albums(&self, user_id: i64, ranking: &[(i64, u32)]) {
        database::rankings::replace_album_rankings(&mut self.conn(), user_id, &entries(ranking)).unwrap();
    }

    /// `ranking` lists (track id, position) pairs.
    pub fn rank_tracks(&self, user_id: i64, album_id: i64, ranking: &[(i64, u32)]) {
        database::rankings::replace_track_rankings(&mut self.conn(), user_id, album_id, &entries(ranking))
            .unwrap();
    }
}

pub fn entries(ranking: &[(i64, u32)]) -> Vec<NewRankingEntry> {
    ranking
        .iter()
        .map(|&(item_id, position)| NewRankingEntry::new(item_id, position))
        .collect()
}
