//! SDN controller (NSX-T manager) REST client.
//!
//! Wraps session-token creation plus the logical-switch list and create
//! calls. After `create_session()` every request carries a bearer token.

use crate::config::{EndpointConfig, MANAGED_BY};
use crate::models::Ipv4;
use reqwest::header;
use serde::{Deserialize, Serialize};
use std::error::Error;

#[derive(Deserialize, Debug)]
struct SessionResponse {
    token: String,
}

/// One subnet attached to a logical switch.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SwitchSubnet {
    pub network: Ipv4,
}

/// Scope/tag pair attached to a logical switch.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SwitchTag {
    pub scope: String,
    pub tag: String,
}

/// Logical switch as sent to and returned by the controller.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LogicalSwitch {
    #[serde(default)]
    pub display_name: String,
    pub subnets: Vec<SwitchSubnet>,
    #[serde(default)]
    pub tags: Vec<SwitchTag>,
}

/// Body of `GET {manager}/api/v1/logical-switches`.
#[derive(Deserialize, Debug)]
struct ListResult {
    results: Vec<LogicalSwitch>,
}

/// Client for the SDN controller.
pub struct SdnClient {
    http: reqwest::Client,
    manager_url: String,
    username: String,
    password: String,
    token: Option<String>,
}

impl SdnClient {
    /// Build a client for the given manager. Call
    /// [`SdnClient::create_session`] before anything else.
    pub fn new(
        config: &EndpointConfig,
        accept_invalid_certs: bool,
    ) -> Result<SdnClient, Box<dyn Error>> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(|e| format!("Error building SDN HTTP client: {e}"))?;

        Ok(SdnClient {
            http,
            manager_url: config.base_url.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            token: None,
        })
    }

    /// Authenticate and store the session token from the JSON response.
    pub async fn create_session(&mut self) -> Result<(), Box<dyn Error>> {
        let response = self
            .http
            .post(format!("{}/api/session/create", self.manager_url))
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?
            .error_for_status()
            .map_err(|e| format!("SDN session create failed: {e}"))?;

        let body = response.text().await?;
        let mut deserializer = serde_json::Deserializer::from_str(&body);
        let session: SessionResponse = serde_path_to_error::deserialize(&mut deserializer)
            .map_err(|e| format!("Error parsing SDN session response: path={} error={}", e.path(), e))?;

        log::info!("SDN: session established at {}", self.manager_url);
        self.token = Some(session.token);
        Ok(())
    }

    fn bearer(&self) -> Result<String, Box<dyn Error>> {
        match &self.token {
            Some(token) => Ok(format!("Bearer {token}")),
            None => Err("SDN client has no session token, call create_session() first".into()),
        }
    }

    /// Fetch all logical switches from the controller.
    pub async fn logical_switches(&self) -> Result<Vec<LogicalSwitch>, Box<dyn Error>> {
        let response = self
            .http
            .get(format!("{}/api/v1/logical-switches", self.manager_url))
            .header(header::AUTHORIZATION, self.bearer()?)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| format!("SDN logical-switch list failed: {e}"))?;

        let body = response.text().await?;
        let mut deserializer = serde_json::Deserializer::from_str(&body);
        let list: ListResult = serde_path_to_error::deserialize(&mut deserializer)
            .map_err(|e| {
                format!(
                    "Error parsing SDN logical-switch list: path={} error={}",
                    e.path(),
                    e
                )
            })?;

        log::debug!("SDN: listed {} logical switch(es)", list.results.len());
        Ok(list.results)
    }

    /// Check whether any logical switch already fronts the given network.
    ///
    /// The first subnet of each listed switch is compared as a parsed CIDR.
    /// Switches without subnets are skipped.
    pub async fn switch_exists(&self, cidr: &Ipv4) -> Result<bool, Box<dyn Error>> {
        for switch in self.logical_switches().await? {
            match switch.subnets.first() {
                Some(subnet) if subnet.network == *cidr => return Ok(true),
                Some(_) => {}
                None => {
                    log::warn!(
                        "SDN: logical switch {} has no subnets, skipping",
                        switch.display_name
                    );
                }
            }
        }
        Ok(false)
    }

    /// Create a logical switch named `<tag>_subnet` fronting the network.
    pub async fn create_logical_switch(
        &self,
        cidr: &Ipv4,
        tag: &str,
    ) -> Result<(), Box<dyn Error>> {
        let body = LogicalSwitch {
            display_name: format!("{tag}_subnet"),
            subnets: vec![SwitchSubnet { network: *cidr }],
            tags: vec![
                SwitchTag {
                    scope: "Environment".to_string(),
                    tag: tag.to_string(),
                },
                SwitchTag {
                    scope: "ManagedBy".to_string(),
                    tag: MANAGED_BY.to_string(),
                },
            ],
        };

        self.http
            .post(format!("{}/api/v1/logical-switches", self.manager_url))
            .header(header::AUTHORIZATION, self.bearer()?)
            .json(&body)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| format!("SDN logical-switch create failed for {cidr}: {e}"))?;

        log::info!("SDN: subnet {cidr} with tag {tag} created successfully");
        Ok(())
    }
}
