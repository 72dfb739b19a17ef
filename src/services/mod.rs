pub mod aggregation;
pub mod compatibility;
pub mod groups;
pub mod scheduler;
pub mod server;

pub use aggregation::{AggregationService, AggregationSummary};
pub use compatibility::CompatibilityService;
pub use groups::GroupService;
pub use scheduler::{run_scheduler, RecomputeQueue};
