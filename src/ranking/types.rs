use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub type UserId = i64;
pub type ItemId = i64;
pub type Position = u32;

/// What a pair of rankings is compared over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    Albums,
    TracksOfAlbum(ItemId),
}

impl Scope {
    pub fn item_kind(&self) -> ItemKind {
        match self {
            Scope::Albums => ItemKind::Album,
            Scope::TracksOfAlbum(_) => ItemKind::Track,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Album,
    Track,
}

impl ItemKind {
    pub fn as_str(&self) -> &str {
        match self {
            ItemKind::Album => "album",
            ItemKind::Track => "track",
        }
    }
}

/// Positions two users gave the same item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharedPosition {
    pub item_id: ItemId,
    pub position_a: Position,
    pub position_b: Position,
}

/// A stored ranking entry with its insertion sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionRecord {
    pub sequence: i64,
    pub user_id: UserId,
    pub item_id: ItemId,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DivergenceReport {
    /// Lowest sum of both positions
    pub favorite_id: ItemId,
    /// Highest sum of both positions
    pub least_favorite_id: ItemId,
    pub most_divergent_id: ItemId,
    pub most_concordant_id: ItemId,
    pub max_position_difference: u64,
    pub min_position_difference: u64,
}

impl DivergenceReport {
    /// Renders the report with item-specific keys, e.g. `favorite_album_id`.
    pub fn to_json(&self, kind: ItemKind) -> Value {
        let kind = kind.as_str();
        let mut map = Map::new();
        map.insert(format!("favorite_{kind}_id"), json!(self.favorite_id));
        map.insert(format!("least_favorite_{kind}_id"), json!(self.least_favorite_id));
        map.insert(format!("most_divergent_{kind}_id"), json!(self.most_divergent_id));
        map.insert(format!("most_concordant_{kind}_id"), json!(self.most_concordant_id));
        map.insert("max_position_difference".to_string(), json!(self.max_position_difference));
        map.insert("min_position_difference".to_string(), json!(self.min_position_difference));
        Value::Object(map)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseComparison {
    pub compatibility_percent: f64,
    pub shared_count: usize,
    pub report: Option<DivergenceReport>,
}

impl PairwiseComparison {
    /// Comparing a user with themselves.
    pub fn identical() -> Self {
        Self {
            compatibility_percent: 100.0,
            shared_count: 0,
            report: None,
        }
    }

    /// Two users without any shared item.
    pub fn nothing_shared() -> Self {
        Self {
            compatibility_percent: 0.0,
            shared_count: 0,
            report: None,
        }
    }

    /// The report as JSON, `{}` when there is none.
    pub fn report_json(&self, kind: ItemKind) -> Value {
        self.report
            .as_ref()
            .map(|report| report.to_json(kind))
            .unwrap_or_else(|| Value::Object(Map::new()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStats {
    pub avg_rank: f64,
    pub std_dev_rank: f64,
    pub votes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumStats {
    pub title: String,
    #[serde(flatten)]
    pub stats: ItemStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumTrackBreakdown {
    pub top_track_id: Option<ItemId>,
    pub polarization_track_id: Option<ItemId>,
    pub tracks: BTreeMap<ItemId, ItemStats>,
}

/// The persisted analysis document of one country.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CountryAnalysis {
    pub albums: BTreeMap<ItemId, AlbumStats>,
    pub tracks_by_album: BTreeMap<ItemId, AlbumTrackBreakdown>,
    pub global_consensus_track_id: Option<ItemId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountryAggregate {
    pub country_name: String,
    pub user_count: usize,
    pub consensus_album_id: Option<ItemId>,
    pub polarization_album_id: Option<ItemId>,
    pub global_consensus_track_id: Option<ItemId>,
    pub analysis: CountryAnalysis,
}

/// One album position cast by a user of a country.
#[derive(Debug, Clone, PartialEq)]
pub struct AlbumVote {
    pub album_id: ItemId,
    pub title: String,
    pub position: Position,
}

/// One track position cast by a user of a country.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackVote {
    pub track_id: ItemId,
    pub album_id: ItemId,
    pub position: Position,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_keys_follow_item_kind() {
        let report = DivergenceReport {
            favorite_id: 1,
            least_favorite_id: 2,
            most_divergent_id: 3,
            most_concordant_id: 1,
            max_position_difference: 3,
            min_position_difference: 0,
        };

        let albums = report.to_json(ItemKind::Album);
        assert_eq!(albums["favorite_album_id"], 1);
        assert_eq!(albums["most_divergent_album_id"], 3);
        assert_eq!(albums["max_position_difference"], 3);

        let tracks = report.to_json(ItemKind::Track);
        assert_eq!(tracks["least_favorite_track_id"], 2);
        assert!(tracks.get("favorite_album_id").is_none());
    }

    #[test]
    fn test_missing_report_renders_as_empty_object() {
        let comparison = PairwiseComparison::identical();
        assert_eq!(comparison.report_json(ItemKind::Album), json!({}));
    }

    #[test]
    fn test_analysis_document_uses_string_keys() {
        let mut analysis = CountryAnalysis::default();
        analysis.albums.insert(
            4,
            AlbumStats {
                title: "Folklore".to_string(),
                stats: ItemStats { avg_rank: 1.5, std_dev_rank: 0.5, votes: 2 },
            },
        );

        let value = serde_json::to_value(&analysis).unwrap();
        assert_eq!(value["albums"]["4"]["title"], "Folklore");
        assert_eq!(value["albums"]["4"]["votes"], 2);

        let back: CountryAnalysis = serde_json::from_value(value).unwrap();
        assert_eq!(back, analysis);
    }
}
