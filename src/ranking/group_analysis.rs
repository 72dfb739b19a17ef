use std::collections::{BTreeMap, BTreeSet};

use super::coherence::fold_latest_positions;
use super::statistics::{argmax, argmin, mean, round2, sample_std_dev};
use super::types::{ItemId, PairwiseComparison, PositionRecord, UserId};

#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub user_id: UserId,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairComparison {
    pub user_a: String,
    pub user_b: String,
    pub comparison: PairwiseComparison,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairHighlight {
    pub percent: f64,
    pub users: (String, String),
}

/// Spread of a group's positions for one item, rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectiveStats {
    pub avg_position: f64,
    pub std_dev: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupAnalysis {
    pub member_count: usize,
    pub group_compatibility_percent: f64,
    /// Lowest average position
    pub consensus_id: Option<ItemId>,
    /// Highest average position
    pub discord_id: Option<ItemId>,
    /// Highest standard deviation
    pub polarization_id: Option<ItemId>,
    pub best_pair: Option<PairHighlight>,
    pub worst_pair: Option<PairHighlight>,
    pub item_stats: BTreeMap<ItemId, CollectiveStats>,
    pub comparisons: Vec<PairComparison>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GroupAnalysisOutcome {
    TooFewMembers { member_count: usize },
    MissingRankings { usernames: Vec<String> },
    Analysis(GroupAnalysis),
}

/// Every unordered member pair, in member order.
pub fn member_pairs(members: &[Member]) -> Vec<(&Member, &Member)> {
    let mut pairs = Vec::new();
    for (i, a) in members.iter().enumerate() {
        for b in &members[i + 1..] {
            pairs.push((a, b));
        }
    }
    pairs
}

/// Usernames of members without a single ranking row in `records`.
pub fn members_without_rankings(members: &[Member], records: &[PositionRecord]) -> Vec<String> {
    let ranked: BTreeSet<UserId> = records.iter().map(|r| r.user_id).collect();
    members
        .iter()
        .filter(|m| !ranked.contains(&m.user_id))
        .map(|m| m.username.clone())
        .collect()
}

/// Average, spread and extremes over the group's positions. Items ranked by a
/// single member are left out.
pub fn collective_stats(records: &[PositionRecord]) -> BTreeMap<ItemId, CollectiveStats> {
    fold_latest_positions(records)
        .into_iter()
        .filter(|(_, by_user)| by_user.len() > 1)
        .map(|(item_id, by_user)| {
            let values: Vec<f64> = by_user.values().map(|&p| f64::from(p)).collect();
            let stats = CollectiveStats {
                avg_position: round2(mean(&values)),
                std_dev: round2(sample_std_dev(&values)),
            };
            (item_id, stats)
        })
        .collect()
}

pub fn summarize_group(
    members: &[Member],
    comparisons: Vec<PairComparison>,
    records: &[PositionRecord],
) -> GroupAnalysis {
    let mut best_pair: Option<PairHighlight> = None;
    let mut worst_pair: Option<PairHighlight> = None;
    let mut total = 0.0;

    for pair in &comparisons {
        let percent = pair.comparison.compatibility_percent;
        total += percent;

        if best_pair.as_ref().is_none_or(|best| percent > best.percent) {
            best_pair = Some(highlight(pair));
        }
        if worst_pair.as_ref().is_none_or(|worst| percent < worst.percent) {
            worst_pair = Some(highlight(pair));
        }
    }

    let group_compatibility_percent = if comparisons.is_empty() {
        0.0
    } else {
        round2(total / comparisons.len() as f64)
    };

    let item_stats = collective_stats(records);

    GroupAnalysis {
        member_count: members.len(),
        group_compatibility_percent,
        consensus_id: argmin(item_stats.iter().map(|(&id, s)| (id, s.avg_position))),
        discord_id: argmax(item_stats.iter().map(|(&id, s)| (id, s.avg_position))),
        polarization_id: argmax(item_stats.iter().map(|(&id, s)| (id, s.std_dev))),
        best_pair,
        worst_pair,
        item_stats,
        comparisons,
    }
}

fn highlight(pair: &PairComparison) -> PairHighlight {
    PairHighlight {
        percent: pair.comparison.compatibility_percent,
        users: (pair.user_a.clone(), pair.user_b.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(user_id: UserId, username: &str) -> Member {
        Member { user_id, username: username.to_string() }
    }

    fn record(sequence: i64, user_id: UserId, item_id: ItemId, position: u32) -> PositionRecord {
        PositionRecord { sequence, user_id, item_id, position }
    }

    fn pair(a: &str, b: &str, percent: f64) -> PairComparison {
        PairComparison {
            user_a: a.to_string(),
            user_b: b.to_string(),
            comparison: PairwiseComparison {
                compatibility_percent: percent,
                shared_count: 1,
                report: None,
            },
        }
    }

    #[test]
    fn test_member_pairs() {
        let members = vec![member(1, "ana"), member(2, "bia"), member(3, "caio")];
        let names: Vec<(&str, &str)> = member_pairs(&members)
            .into_iter()
            .map(|(a, b)| (a.username.as_str(), b.username.as_str()))
            .collect();
        assert_eq!(names, vec![("ana", "bia"), ("ana", "caio"), ("bia", "caio")]);
    }

    #[test]
    fn test_members_without_rankings() {
        let members = vec![member(1, "ana"), member(2, "bia"), member(3, "caio")];
        let records = vec![record(1, 2, 10, 1)];
        assert_eq!(members_without_rankings(&members, &records), vec!["ana", "caio"]);
    }

    #[test]
    fn test_best_and_worst_pairs_keep_first_on_ties() {
        let members = vec![member(1, "ana"), member(2, "bia"), member(3, "caio")];
        let comparisons = vec![pair("ana", "bia", 80.0), pair("ana", "caio", 40.0), pair("bia", "caio", 80.0)];
        let analysis = summarize_group(&members, comparisons, &[]);

        assert_eq!(analysis.group_compatibility_percent, 66.67);
        let best = analysis.best_pair.unwrap();
        assert_eq!(best.percent, 80.0);
        assert_eq!(best.users, ("ana".to_string(), "bia".to_string()));
        let worst = analysis.worst_pair.unwrap();
        assert_eq!(worst.users, ("ana".to_string(), "caio".to_string()));
        assert_eq!(analysis.comparisons.len(), 3);
    }

    #[test]
    fn test_consensus_discord_and_polarization() {
        let members = vec![member(1, "ana"), member(2, "bia")];
        let records = vec![
            record(1, 1, 10, 1),
            record(2, 1, 20, 2),
            record(3, 1, 30, 3),
            record(4, 2, 10, 1),
            record(5, 2, 20, 6),
            record(6, 2, 30, 4),
            // ranked by one member only
            record(7, 1, 40, 9),
        ];
        let analysis = summarize_group(&members, vec![pair("ana", "bia", 50.0)], &records);

        assert_eq!(analysis.item_stats.len(), 3);
        assert_eq!(analysis.consensus_id, Some(10));
        assert_eq!(analysis.discord_id, Some(20));
        assert_eq!(analysis.polarization_id, Some(20));
        assert_eq!(analysis.item_stats[&30].avg_position, 3.5);
        assert_eq!(analysis.item_stats[&20].std_dev, 2.83);
    }

    #[test]
    fn test_empty_group_summary() {
        let analysis = summarize_group(&[], Vec::new(), &[]);
        assert_eq!(analysis.group_compatibility_percent, 0.0);
        assert!(analysis.best_pair.is_none());
        assert!(analysis.consensus_id.is_none());
    }
}
