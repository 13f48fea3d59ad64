//! Subnet synchronization logic.
//!
//! - [`sync`] - the ensure-present loop over the plan

mod sync;

// Re-export public functions
pub use sync::{sync_plan, SyncOutcome, SyncRecord, SyncReport, TargetSystem};
