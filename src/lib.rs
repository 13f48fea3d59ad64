// cargo watch -x 'fmt' -x 'run'

pub mod config;
pub mod ipam;
pub mod models;
pub mod output;
pub mod processing;
pub mod sdn;

pub use models::{PlanEntry, SubnetPlan};
pub use processing::{sync_plan, SyncOutcome, SyncReport};
