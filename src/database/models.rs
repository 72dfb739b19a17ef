use chrono::NaiveDateTime;

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub country: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Album {
    pub id: i64,
    pub title: String,
    pub release_date: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Track {
    pub id: i64,
    pub album_id: i64,
    pub title: String,
    pub track_number: i32,
}

#[derive(Debug, Clone)]
pub struct Group {
    pub id: i64,
    pub name: String,
}

/// One stored ranking row; `item_id` is an album or a track id depending on
/// the table it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingRow {
    pub id: i64,
    pub user_id: i64,
    pub item_id: i64,
    pub position: u32,
}

/// Track ranking row joined with the album owning the track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackRankingRow {
    pub track_id: i64,
    pub album_id: i64,
    pub position: u32,
}

/// Album ranking row joined with the album title.
#[derive(Debug, Clone, PartialEq)]
pub struct AlbumRankingRow {
    pub album_id: i64,
    pub album_title: String,
    pub position: u32,
}

/// Input entry of a ranking submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewRankingEntry {
    pub item_id: i64,
    pub position: u32,
}

impl NewRankingEntry {
    pub fn new(item_id: i64, position: u32) -> Self {
        Self { item_id, position }
    }
}

#[derive(Debug, Clone)]
pub struct DbCountryAggregate {
    pub id: i64,
    pub country_name: String,
    pub user_count: i64,
    pub consensus_album_id: Option<i64>,
    pub polarization_album_id: Option<i64>,
    pub global_consensus_track_id: Option<i64>,
    pub analysis: String,
    pub calculated_at: NaiveDateTime,
}

/// Positions two users gave the same item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharedPositionRow {
    pub item_id: i64,
    pub position_a: u32,
    pub position_b: u32,
}

/// Number of distinct users with at least one album ranking, per country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryRankingUsers {
    pub country: String,
    pub user_count: i64,
}
