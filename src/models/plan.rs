//! The subnet onboarding plan.
//!
//! A fixed mapping from environment tag to subnet CIDR. The built-in plan
//! carries the three environments being onboarded; it is validated once at
//! startup and never mutated afterwards.

use super::Ipv4;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::error::Error;

lazy_static! {
    /// Environment tag -> subnet CIDR. BTreeMap keeps run order stable.
    static ref BUILTIN_SUBNETS: BTreeMap<&'static str, &'static str> = BTreeMap::from([
        ("dev", "192.168.1.0/24"),
        ("prod", "192.168.2.0/24"),
        ("qa", "192.168.3.0/24"),
    ]);
}

/// One subnet to be onboarded into both systems.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PlanEntry {
    /// Environment tag, e.g. "dev".
    pub tag: String,
    /// The subnet to create.
    pub cidr: Ipv4,
}

/// Ordered list of subnets to synchronize.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SubnetPlan {
    pub entries: Vec<PlanEntry>,
}

impl SubnetPlan {
    /// The built-in three-environment plan, parsed and validated.
    pub fn builtin() -> Result<SubnetPlan, Box<dyn Error>> {
        SubnetPlan::from_pairs(BUILTIN_SUBNETS.iter().map(|(tag, cidr)| (*tag, *cidr)))
    }

    /// Build a plan from (tag, cidr) pairs.
    ///
    /// # Returns
    /// * `Ok(SubnetPlan)` - All CIDRs parsed and the plan passed validation
    /// * `Err` - On a bad CIDR, duplicate tag, or duplicate network
    pub fn from_pairs<'a, I>(pairs: I) -> Result<SubnetPlan, Box<dyn Error>>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut entries = Vec::new();
        for (tag, cidr) in pairs {
            let cidr = Ipv4::new(cidr).map_err(|e| format!("Bad CIDR for tag {tag}: {e}"))?;
            entries.push(PlanEntry {
                tag: tag.to_string(),
                cidr,
            });
        }
        let plan = SubnetPlan { entries };
        plan.validate()?;
        Ok(plan)
    }

    /// Reject duplicate tags, duplicate networks, and host addresses.
    fn validate(&self) -> Result<(), Box<dyn Error>> {
        let mut seen_tags = HashSet::new();
        let mut seen_networks = HashSet::new();

        for entry in &self.entries {
            if !seen_tags.insert(entry.tag.clone()) {
                return Err(format!("Duplicate tag in plan: {}", entry.tag).into());
            }
            if !seen_networks.insert(entry.cidr) {
                return Err(format!("Duplicate network in plan: {}", entry.cidr).into());
            }
            if !entry.cidr.is_network_addr() {
                return Err(format!(
                    "Plan entry {} is not a network address: {}",
                    entry.tag, entry.cidr
                )
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_plan() {
        let plan = SubnetPlan::builtin().expect("Built-in plan should validate");
        assert_eq!(plan.entries.len(), 3);

        // BTreeMap ordering: dev, prod, qa
        assert_eq!(plan.entries[0].tag, "dev");
        assert_eq!(plan.entries[0].cidr.to_string(), "192.168.1.0/24");
        assert_eq!(plan.entries[1].tag, "prod");
        assert_eq!(plan.entries[1].cidr.to_string(), "192.168.2.0/24");
        assert_eq!(plan.entries[2].tag, "qa");
        assert_eq!(plan.entries[2].cidr.to_string(), "192.168.3.0/24");
    }

    #[test]
    fn test_duplicate_tag_rejected() {
        let result = SubnetPlan::from_pairs([("dev", "10.0.0.0/24"), ("dev", "10.0.1.0/24")]);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Duplicate tag"));
    }

    #[test]
    fn test_duplicate_network_rejected() {
        let result = SubnetPlan::from_pairs([("dev", "10.0.0.0/24"), ("qa", "10.0.0.0/24")]);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Duplicate network"));
    }

    #[test]
    fn test_bad_cidr_rejected() {
        assert!(SubnetPlan::from_pairs([("dev", "10.0.0.0")]).is_err());
        assert!(SubnetPlan::from_pairs([("dev", "10.0.0.0/33")]).is_err());
    }

    #[test]
    fn test_host_address_rejected() {
        let result = SubnetPlan::from_pairs([("dev", "10.0.0.5/24")]);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("not a network address"));
    }
}
