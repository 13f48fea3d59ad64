//! SDN controller interaction.
//!
//! - [`client`] - REST client for the NSX-T-style manager API

mod client;

// Re-export public types
pub use client::{LogicalSwitch, SdnClient, SwitchSubnet, SwitchTag};
