use std::collections::BTreeMap;

use super::statistics::{argmax, argmin, item_stats};
use super::types::{
    AlbumStats, AlbumTrackBreakdown, AlbumVote, CountryAggregate, CountryAnalysis, ItemId, ItemStats, Position,
    TrackVote,
};

/// Builds the aggregate of one country from every album and track position
/// its users cast. All maps are keyed by id, so the lowest id wins ties.
pub fn aggregate_country(
    country_name: &str,
    user_count: usize,
    album_votes: &[AlbumVote],
    track_votes: &[TrackVote],
) -> CountryAggregate {
    let albums = build_album_stats(album_votes);
    let consensus_album_id = argmin(albums.iter().map(|(&id, a)| (id, a.stats.avg_rank)));
    let polarization_album_id = argmax(albums.iter().map(|(&id, a)| (id, a.stats.std_dev_rank)));

    let track_stats = build_track_stats(track_votes);
    let global_consensus_track_id = argmin(track_stats.iter().map(|(&id, (_, s))| (id, s.avg_rank)));
    let tracks_by_album = group_tracks_by_album(track_stats);

    CountryAggregate {
        country_name: country_name.to_string(),
        user_count,
        consensus_album_id,
        polarization_album_id,
        global_consensus_track_id,
        analysis: CountryAnalysis {
            albums,
            tracks_by_album,
            global_consensus_track_id,
        },
    }
}

fn build_album_stats(votes: &[AlbumVote]) -> BTreeMap<ItemId, AlbumStats> {
    let mut positions: BTreeMap<ItemId, (&str, Vec<Position>)> = BTreeMap::new();
    for vote in votes {
        positions
            .entry(vote.album_id)
            .or_insert_with(|| (vote.title.as_str(), Vec::new()))
            .1
            .push(vote.position);
    }

    positions
        .into_iter()
        .map(|(album_id, (title, album_positions))| {
            let stats = AlbumStats {
                title: title.to_string(),
                stats: item_stats(&album_positions),
            };
            (album_id, stats)
        })
        .collect()
}

/// Per-track statistics, each tagged with the owning album.
fn build_track_stats(votes: &[TrackVote]) -> BTreeMap<ItemId, (ItemId, ItemStats)> {
    let mut positions: BTreeMap<ItemId, (ItemId, Vec<Position>)> = BTreeMap::new();
    for vote in votes {
        positions
            .entry(vote.track_id)
            .or_insert_with(|| (vote.album_id, Vec::new()))
            .1
            .push(vote.position);
    }

    positions
        .into_iter()
        .map(|(track_id, (album_id, track_positions))| (track_id, (album_id, item_stats(&track_positions))))
        .collect()
}

fn group_tracks_by_album(
    track_stats: BTreeMap<ItemId, (ItemId, ItemStats)>,
) -> BTreeMap<ItemId, AlbumTrackBreakdown> {
    let mut by_album: BTreeMap<ItemId, BTreeMap<ItemId, ItemStats>> = BTreeMap::new();
    for (track_id, (album_id, stats)) in track_stats {
        by_album.entry(album_id).or_default().insert(track_id, stats);
    }

    by_album
        .into_iter()
        .map(|(album_id, tracks)| {
            let breakdown = AlbumTrackBreakdown {
                top_track_id: argmin(tracks.iter().map(|(&id, s)| (id, s.avg_rank))),
                polarization_track_id: argmax(tracks.iter().map(|(&id, s)| (id, s.std_dev_rank))),
                tracks,
            };
            (album_id, breakdown)
        })
        .collect()
}
