use serde::Serialize;
use serde_json::Value;

use crate::ranking::group_analysis::{CollectiveStats, GroupAnalysis, PairComparison, PairHighlight};
use crate::ranking::{ItemKind, PairwiseComparison, Scope};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityResponse {
    pub user_a: i64,
    pub user_b: i64,
    pub album_id: Option<i64>,
    pub compatibility_percent: f64,
    pub shared_count: usize,
    pub report: Value,
}

impl CompatibilityResponse {
    pub fn new(user_a: i64, user_b: i64, scope: Scope, comparison: &PairwiseComparison) -> Self {
        Self {
            user_a,
            user_b,
            album_id: album_of(scope),
            compatibility_percent: comparison.compatibility_percent,
            shared_count: comparison.shared_count,
            report: comparison.report_json(scope.item_kind()),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryAggregateItem {
    pub country_name: String,
    pub user_count: i64,
    pub consensus_album_id: Option<i64>,
    pub polarization_album_id: Option<i64>,
    pub global_consensus_track_id: Option<i64>,
    /// Stored document, returned as-is
    pub analysis: Value,
    pub calculated_at: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalRankingsResponse {
    pub items: Vec<CountryAggregateItem>,
    pub total: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoherenceResponse {
    pub group_id: i64,
    pub group_name: String,
    pub coherence_percent: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairComparisonItem {
    pub user_a: String,
    pub user_b: String,
    pub compatibility_percent: f64,
    pub shared_count: usize,
    pub report: Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairHighlightItem {
    pub percent: f64,
    pub users: [String; 2],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectiveStatsItem {
    pub item_id: i64,
    pub avg_position: f64,
    pub std_dev: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupAnalysisResponse {
    pub group_id: i64,
    pub album_id: Option<i64>,
    pub member_count: usize,
    pub group_compatibility_percent: f64,
    pub consensus_id: Option<i64>,
    pub discord_id: Option<i64>,
    pub polarization_id: Option<i64>,
    pub best_pair: Option<PairHighlightItem>,
    pub worst_pair: Option<PairHighlightItem>,
    pub item_stats: Vec<CollectiveStatsItem>,
    pub comparisons: Vec<PairComparisonItem>,
}

impl GroupAnalysisResponse {
    pub fn new(group_id: i64, scope: Scope, analysis: GroupAnalysis) -> Self {
        let kind = scope.item_kind();
        Self {
            group_id,
            album_id: album_of(scope),
            member_count: analysis.member_count,
            group_compatibility_percent: analysis.group_compatibility_percent,
            consensus_id: analysis.consensus_id,
            discord_id: analysis.discord_id,
            polarization_id: analysis.polarization_id,
            best_pair: analysis.best_pair.map(highlight_item),
            worst_pair: analysis.worst_pair.map(highlight_item),
            item_stats: analysis
                .item_stats
                .into_iter()
                .map(|(item_id, stats)| stats_item(item_id, stats))
                .collect(),
            comparisons: analysis
                .comparisons
                .into_iter()
                .map(|pair| comparison_item(pair, kind))
                .collect(),
        }
    }
}

/// Body of a 400 answer when the group cannot be analysed.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupAnalysisError {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_users: Vec<String>,
}

fn album_of(scope: Scope) -> Option<i64> {
    match scope {
        Scope::Albums => None,
        Scope::TracksOfAlbum(album_id) => Some(album_id),
    }
}

fn highlight_item(highlight: PairHighlight) -> PairHighlightItem {
    let (a, b) = highlight.users;
    PairHighlightItem {
        percent: highlight.percent,
        users: [a, b],
    }
}

fn stats_item(item_id: i64, stats: CollectiveStats) -> CollectiveStatsItem {
    CollectiveStatsItem {
        item_id,
        avg_position: stats.avg_position,
        std_dev: stats.std_dev,
    }
}

fn comparison_item(pair: PairComparison, kind: ItemKind) -> PairComparisonItem {
    PairComparisonItem {
        report: pair.comparison.report_json(kind),
        compatibility_percent: pair.comparison.compatibility_percent,
        shared_count: pair.comparison.shared_count,
        user_a: pair.user_a,
        user_b: pair.user_b,
    }
}
