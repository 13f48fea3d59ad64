//! Plan synchronization logic.
//!
//! Walks the plan sequentially and makes sure every subnet exists in both
//! systems, creating it where it is missing. One run over an empty pair of
//! systems creates everything; a second run only reports existing entries.

use crate::config;
use crate::ipam::IpamClient;
use crate::models::{Ipv4, SubnetPlan};
use crate::sdn::SdnClient;
use std::error::Error;

/// What happened to one subnet in one system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Created,
    AlreadyExists,
}

impl std::fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            SyncOutcome::Created => write!(f, "created"),
            SyncOutcome::AlreadyExists => write!(f, "exists"),
        }
    }
}

/// Which system an outcome applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSystem {
    Ipam,
    Sdn,
}

impl std::fmt::Display for TargetSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TargetSystem::Ipam => write!(f, "IPAM"),
            TargetSystem::Sdn => write!(f, "SDN"),
        }
    }
}

/// One subnet/system outcome.
#[derive(Debug, Clone)]
pub struct SyncRecord {
    pub tag: String,
    pub cidr: Ipv4,
    pub system: TargetSystem,
    pub outcome: SyncOutcome,
}

/// Result of a full run over the plan.
#[derive(Debug)]
pub struct SyncReport {
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub records: Vec<SyncRecord>,
}

impl SyncReport {
    fn new() -> SyncReport {
        SyncReport {
            started_at: chrono::Utc::now(),
            records: Vec::new(),
        }
    }

    pub fn created_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome == SyncOutcome::Created)
            .count()
    }

    pub fn existing_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome == SyncOutcome::AlreadyExists)
            .count()
    }
}

/// Ensure every plan entry exists in both systems.
///
/// For each entry, IPAM first, then the SDN controller: check existence and
/// create when missing. Any HTTP failure aborts the run and propagates.
///
/// # Returns
/// * `Ok(SyncReport)` - Per-system outcome for every plan entry
/// * `Err` - First create/session/decoding failure encountered
pub async fn sync_plan(
    ipam: &IpamClient,
    sdn: &SdnClient,
    plan: &SubnetPlan,
) -> Result<SyncReport, Box<dyn Error>> {
    let mut report = SyncReport::new();
    log::info!(
        "#Start sync_plan() over {} plan entries",
        plan.entries.len()
    );

    for entry in &plan.entries {
        let outcome = if ipam.network_exists(&entry.cidr).await? {
            log::info!(
                "IPAM: subnet {} already exists and is managed by Infoblox",
                entry.cidr
            );
            SyncOutcome::AlreadyExists
        } else {
            ipam.create_network(&entry.cidr, &entry.tag).await?;
            SyncOutcome::Created
        };
        report.records.push(SyncRecord {
            tag: entry.tag.clone(),
            cidr: entry.cidr,
            system: TargetSystem::Ipam,
            outcome,
        });

        let outcome = if sdn.switch_exists(&entry.cidr).await? {
            log::info!("SDN: subnet {} already exists", entry.cidr);
            SyncOutcome::AlreadyExists
        } else {
            sdn.create_logical_switch(&entry.cidr, &entry.tag).await?;
            SyncOutcome::Created
        };
        report.records.push(SyncRecord {
            tag: entry.tag.clone(),
            cidr: entry.cidr,
            system: TargetSystem::Sdn,
            outcome,
        });

        // Pace sequential API calls
        std::thread::sleep(std::time::Duration::from_millis(config::SLEEP_MSEC));
    }

    log::info!(
        "sync_plan() done: {} created, {} already present",
        report.created_count(),
        report.existing_count()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(system: TargetSystem, outcome: SyncOutcome) -> SyncRecord {
        SyncRecord {
            tag: "dev".to_string(),
            cidr: Ipv4::new("192.168.1.0/24").unwrap(),
            system,
            outcome,
        }
    }

    #[test]
    fn test_report_counts() {
        let mut report = SyncReport::new();
        report
            .records
            .push(record(TargetSystem::Ipam, SyncOutcome::Created));
        report
            .records
            .push(record(TargetSystem::Sdn, SyncOutcome::AlreadyExists));
        report
            .records
            .push(record(TargetSystem::Sdn, SyncOutcome::AlreadyExists));

        assert_eq!(report.created_count(), 1);
        assert_eq!(report.existing_count(), 2);
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(SyncOutcome::Created.to_string(), "created");
        assert_eq!(SyncOutcome::AlreadyExists.to_string(), "exists");
        assert_eq!(TargetSystem::Ipam.to_string(), "IPAM");
        assert_eq!(TargetSystem::Sdn.to_string(), "SDN");
    }
}
