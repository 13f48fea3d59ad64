//! Domain models for subnet synchronization.
//!
//! This module contains the core data structures used throughout the
//! application:
//! - [`Ipv4`] - IPv4 address with CIDR notation support
//! - [`PlanEntry`] and [`SubnetPlan`] - the subnets being onboarded

mod ipv4;
mod plan;

// Re-export public types
pub use ipv4::{cut_addr, Ipv4, MAX_LENGTH};
pub use plan::{PlanEntry, SubnetPlan};
