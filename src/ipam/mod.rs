//! IPAM service interaction.
//!
//! - [`client`] - REST client for the Infoblox-style WAPI

mod client;

// Re-export public types
pub use client::{IpamClient, NetworkRecord};
