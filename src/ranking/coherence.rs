use std::collections::{BTreeMap, BTreeSet};

use super::statistics::{round2, similarity};
use super::types::{ItemId, Position, PositionRecord, UserId};
use crate::config::settings::CompatibilitySettings;

/// Latest position per (item, user). Records are applied in sequence order,
/// so a later row for the same pair overwrites an earlier one.
pub fn fold_latest_positions(records: &[PositionRecord]) -> BTreeMap<ItemId, BTreeMap<UserId, Position>> {
    let mut ordered: Vec<&PositionRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.sequence);

    let mut positions: BTreeMap<ItemId, BTreeMap<UserId, Position>> = BTreeMap::new();
    for record in ordered {
        positions
            .entry(record.item_id)
            .or_default()
            .insert(record.user_id, record.position);
    }
    positions
}

/// Group coherence in `[0, 100]`: the mean pairwise similarity of member
/// positions over every matched album, scaled to a percentage.
pub fn calculate_coherence(
    members: &[UserId],
    matched_albums: &[ItemId],
    records: &[PositionRecord],
    config: &CompatibilitySettings,
) -> f64 {
    if matched_albums.is_empty() || members.len() < 2 {
        return 0.0;
    }

    let members: BTreeSet<UserId> = members.iter().copied().collect();
    let matched: BTreeSet<ItemId> = matched_albums.iter().copied().collect();
    let relevant: Vec<PositionRecord> = records
        .iter()
        .filter(|r| members.contains(&r.user_id) && matched.contains(&r.item_id))
        .copied()
        .collect();

    let mut total_similarity = 0.0;
    let mut total_pairs: usize = 0;

    for album_positions in fold_latest_positions(&relevant).values() {
        if album_positions.len() < 2 {
            continue;
        }

        let positions: Vec<Position> = album_positions.values().copied().collect();
        for (i, &pos_i) in positions.iter().enumerate() {
            for &pos_j in &positions[i + 1..] {
                let diff = f64::from(pos_i.abs_diff(pos_j));
                total_similarity += similarity(diff, config.max_diff_reference);
                total_pairs += 1;
            }
        }
    }

    if total_pairs == 0 {
        return 0.0;
    }

    round2(100.0 * total_similarity / total_pairs as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sequence: i64, user_id: UserId, item_id: ItemId, position: Position) -> PositionRecord {
        PositionRecord { sequence, user_id, item_id, position }
    }

    fn config() -> CompatibilitySettings {
        CompatibilitySettings::default()
    }

    #[test]
    fn test_three_members_one_album() {
        let records = vec![record(1, 1, 100, 1), record(2, 2, 100, 2), record(3, 3, 100, 3)];
        let score = calculate_coherence(&[1, 2, 3], &[100], &records, &config());
        assert_eq!(score, 73.33);
    }

    #[test]
    fn test_no_matched_albums() {
        let records = vec![record(1, 1, 100, 1), record(2, 2, 100, 1)];
        assert_eq!(calculate_coherence(&[1, 2], &[], &records, &config()), 0.0);
    }

    #[test]
    fn test_single_member() {
        let records = vec![record(1, 1, 100, 1)];
        assert_eq!(calculate_coherence(&[1], &[100], &records, &config()), 0.0);
    }

    #[test]
    fn test_albums_with_one_voter_are_skipped() {
        let records = vec![
            record(1, 1, 100, 1),
            record(2, 1, 200, 1),
            record(3, 2, 200, 1),
        ];
        // only album 200 forms a pair, and it is unanimous
        assert_eq!(calculate_coherence(&[1, 2], &[100, 200], &records, &config()), 100.0);

        let lonely = vec![record(1, 1, 100, 1), record(2, 2, 200, 4)];
        assert_eq!(calculate_coherence(&[1, 2], &[100, 200], &lonely, &config()), 0.0);
    }

    #[test]
    fn test_later_row_overwrites_earlier() {
        // user 2 first ranked the album 6th, later 1st
        let records = vec![record(5, 2, 100, 1), record(1, 1, 100, 1), record(2, 2, 100, 6)];
        let folded = fold_latest_positions(&records);
        assert_eq!(folded[&100][&2], 1);
        assert_eq!(calculate_coherence(&[1, 2], &[100], &records, &config()), 100.0);
    }

    #[test]
    fn test_ignores_non_members_and_unmatched_albums() {
        let records = vec![
            record(1, 1, 100, 1),
            record(2, 2, 100, 1),
            record(3, 9, 100, 9),
            record(4, 1, 300, 1),
            record(5, 2, 300, 9),
        ];
        assert_eq!(calculate_coherence(&[1, 2], &[100], &records, &config()), 100.0);
    }

    #[test]
    fn test_score_stays_in_bounds() {
        let records = vec![record(1, 1, 100, 1), record(2, 2, 100, 20), record(3, 3, 100, 40)];
        let score = calculate_coherence(&[1, 2, 3], &[100], &records, &config());
        assert!((0.0..=100.0).contains(&score));
        assert_eq!(score, 0.0);
    }
}
