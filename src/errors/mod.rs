use thiserror::Error;

/// Add context to query errors
pub fn query_context(what: &str) -> String {
    format!("Failed to query {}", what)
}

/// Add context to write errors
pub fn write_context(operation: &str, what: &str) -> String {
    format!("Failed to {} {}", operation, what)
}

/// Reasons a ranking submission is refused before the store is touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RankingValidationError {
    #[error("ranking positions must be unique (position {0} appears more than once)")]
    DuplicatePosition(u32),
    #[error("item {0} appears more than once in the ranking")]
    DuplicateItem(i64),
    #[error("ranking positions start at 1 (got {0})")]
    InvalidPosition(u32),
    #[error("track {track_id} does not belong to album {album_id}")]
    TrackOutsideAlbum { track_id: i64, album_id: i64 },
}
