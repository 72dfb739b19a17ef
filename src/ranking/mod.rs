pub mod aggregation;
pub mod coherence;
pub mod compatibility;
pub mod group_analysis;
pub mod statistics;
pub mod types;

pub use aggregation::aggregate_country;
pub use coherence::calculate_coherence;
pub use compatibility::calculate_compatibility;
pub use group_analysis::{GroupAnalysis, GroupAnalysisOutcome};
pub use types::{CountryAggregate, CountryAnalysis, ItemKind, PairwiseComparison, Scope};
