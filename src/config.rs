//! Runtime configuration for the two API endpoints.
//!
//! Endpoints and credentials come from environment variables (loaded via
//! `dotenv` in `main`), falling back to the onboarding defaults when unset.

use std::env;

/// Pause between subnet operations, milliseconds.
pub const SLEEP_MSEC: u64 = 100;

/// Value written to the `ManagedBy` attribute/tag in both systems.
pub const MANAGED_BY: &str = "Infoblox";

/// Connection details for one REST endpoint.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    /// Base URL, no trailing slash.
    pub base_url: String,
    pub username: String,
    pub password: String,
}

/// Full configuration for a sync run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// IPAM service (Infoblox WAPI).
    pub ipam: EndpointConfig,
    /// SDN controller (NSX-T manager).
    pub sdn: EndpointConfig,
    /// Skip TLS certificate verification (both systems commonly run
    /// self-signed certs on the management network).
    pub accept_invalid_certs: bool,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl SyncConfig {
    /// Build the configuration from environment variables.
    ///
    /// # Variables
    /// * `IPAM_URL`, `IPAM_USERNAME`, `IPAM_PASSWORD`
    /// * `SDN_MANAGER`, `SDN_USERNAME`, `SDN_PASSWORD`
    /// * `SYNC_ACCEPT_INVALID_CERTS` - "true"/"false", default true
    pub fn from_env() -> SyncConfig {
        SyncConfig {
            ipam: EndpointConfig {
                base_url: env_or("IPAM_URL", "https://infoblox.example.com/wapi/v2.10"),
                username: env_or("IPAM_USERNAME", "your_username"),
                password: env_or("IPAM_PASSWORD", "your_password"),
            },
            sdn: EndpointConfig {
                base_url: env_or("SDN_MANAGER", "https://nsx-manager.example.com"),
                username: env_or("SDN_USERNAME", "your_nsx_username"),
                password: env_or("SDN_PASSWORD", "your_nsx_password"),
            },
            accept_invalid_certs: env_or("SYNC_ACCEPT_INVALID_CERTS", "true") == "true",
        }
    }
}
