//! IPAM (Infoblox WAPI) REST client.
//!
//! Wraps the three WAPI calls this program needs: session login, network
//! lookup, and network creation. The WAPI hands the session back as the
//! `ibapauth` cookie, which every later call replays.

use crate::config::{EndpointConfig, MANAGED_BY};
use crate::models::Ipv4;
use reqwest::header;
use serde::{Deserialize, Serialize};
use std::error::Error;

/// Session cookie name used by the WAPI.
const SESSION_COOKIE: &str = "ibapauth";

/// One extensible attribute value, e.g. `{"value": "dev"}`.
#[derive(Serialize, Debug)]
struct ExtAttrValue {
    value: String,
}

#[derive(Serialize, Debug)]
struct ExtAttrs {
    #[serde(rename = "Environment")]
    environment: ExtAttrValue,
    #[serde(rename = "ManagedBy")]
    managed_by: ExtAttrValue,
}

/// Body for `POST {base}/network`.
#[derive(Serialize, Debug)]
struct CreateNetworkRequest {
    network: String,
    extattrs: ExtAttrs,
}

/// One record from `GET {base}/network`. Only the fields we look at.
#[derive(Deserialize, Debug)]
pub struct NetworkRecord {
    #[serde(rename = "_ref", default)]
    pub object_ref: Option<String>,
    #[serde(default)]
    pub network: Option<Ipv4>,
}

/// Client for the IPAM service.
pub struct IpamClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
    session_token: Option<String>,
}

impl IpamClient {
    /// Build a client for the given endpoint. No network traffic yet;
    /// call [`IpamClient::login`] before anything else.
    pub fn new(
        config: &EndpointConfig,
        accept_invalid_certs: bool,
    ) -> Result<IpamClient, Box<dyn Error>> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(|e| format!("Error building IPAM HTTP client: {e}"))?;

        Ok(IpamClient {
            http,
            base_url: config.base_url.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            session_token: None,
        })
    }

    /// Authenticate and capture the session cookie.
    pub async fn login(&mut self) -> Result<(), Box<dyn Error>> {
        let response = self
            .http
            .post(format!("{}/session", self.base_url))
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?
            .error_for_status()
            .map_err(|e| format!("IPAM session login failed: {e}"))?;

        let token = response
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or(format!(
                "IPAM session response missing {SESSION_COOKIE} cookie"
            ))?;

        log::info!("IPAM: session established at {}", self.base_url);
        self.session_token = Some(token);
        Ok(())
    }

    fn session_cookie(&self) -> Result<String, Box<dyn Error>> {
        match &self.session_token {
            Some(token) => Ok(format!("{SESSION_COOKIE}={token}")),
            None => Err("IPAM client has no session, call login() first".into()),
        }
    }

    /// Check whether a network already exists.
    ///
    /// Exists means status 200 and a non-empty result array. Any other
    /// status is treated as "not found".
    pub async fn network_exists(&self, cidr: &Ipv4) -> Result<bool, Box<dyn Error>> {
        let response = self
            .http
            .get(format!("{}/network", self.base_url))
            .query(&[("network", cidr.to_string())])
            .header(header::COOKIE, self.session_cookie()?)
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            log::debug!(
                "IPAM: network lookup for {cidr} returned {}",
                response.status()
            );
            return Ok(false);
        }

        let body = response.text().await?;
        let mut deserializer = serde_json::Deserializer::from_str(&body);
        let records: Vec<NetworkRecord> = serde_path_to_error::deserialize(&mut deserializer)
            .map_err(|e| {
                format!(
                    "Error parsing IPAM network list for {cidr}: path={} error={}",
                    e.path(),
                    e
                )
            })?;

        log::debug!("IPAM: lookup {cidr} matched {} record(s)", records.len());
        Ok(!records.is_empty())
    }

    /// Create a network with Environment and ManagedBy extensible attributes.
    pub async fn create_network(&self, cidr: &Ipv4, tag: &str) -> Result<(), Box<dyn Error>> {
        let body = CreateNetworkRequest {
            network: cidr.to_string(),
            extattrs: ExtAttrs {
                environment: ExtAttrValue {
                    value: tag.to_string(),
                },
                managed_by: ExtAttrValue {
                    value: MANAGED_BY.to_string(),
                },
            },
        };

        self.http
            .post(format!("{}/network", self.base_url))
            .header(header::COOKIE, self.session_cookie()?)
            .json(&body)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| format!("IPAM network create failed for {cidr}: {e}"))?;

        log::info!("IPAM: subnet {cidr} with tag {tag} created successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(base_url: String) -> EndpointConfig {
        EndpointConfig {
            base_url,
            username: "admin".to_string(),
            password: "secret".to_string(),
        }
    }

    async fn logged_in_client(server: &mut mockito::ServerGuard) -> IpamClient {
        let _session = server
            .mock("POST", "/session")
            .with_status(200)
            .with_header("set-cookie", "ibapauth=test-session-token; Path=/")
            .create_async()
            .await;

        let mut client = IpamClient::new(&test_config(server.url()), false).unwrap();
        client.login().await.expect("login should succeed");
        client
    }

    #[tokio::test]
    async fn test_login_captures_session_cookie() {
        let mut server = mockito::Server::new_async().await;
        let client = logged_in_client(&mut server).await;
        assert_eq!(
            client.session_cookie().unwrap(),
            "ibapauth=test-session-token"
        );
    }

    #[tokio::test]
    async fn test_login_fails_without_cookie() {
        let mut server = mockito::Server::new_async().await;
        let _session = server
            .mock("POST", "/session")
            .with_status(200)
            .create_async()
            .await;

        let mut client = IpamClient::new(&test_config(server.url()), false).unwrap();
        let result = client.login().await;
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("missing ibapauth cookie"));
    }

    #[tokio::test]
    async fn test_login_fails_on_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        let _session = server
            .mock("POST", "/session")
            .with_status(401)
            .create_async()
            .await;

        let mut client = IpamClient::new(&test_config(server.url()), false).unwrap();
        assert!(client.login().await.is_err());
    }

    #[tokio::test]
    async fn test_calls_without_login_rejected() {
        let server = mockito::Server::new_async().await;
        let client = IpamClient::new(&test_config(server.url()), false).unwrap();
        let cidr = Ipv4::new("192.168.1.0/24").unwrap();
        assert!(client.network_exists(&cidr).await.is_err());
        assert!(client.create_network(&cidr, "dev").await.is_err());
    }

    #[tokio::test]
    async fn test_network_exists_true_on_nonempty_result() {
        let mut server = mockito::Server::new_async().await;
        let client = logged_in_client(&mut server).await;

        let _lookup = server
            .mock("GET", "/network")
            .match_query(mockito::Matcher::UrlEncoded(
                "network".into(),
                "192.168.1.0/24".into(),
            ))
            .with_status(200)
            .with_body(r#"[{"_ref": "network/ZG5ldHdvcms:192.168.1.0", "network": "192.168.1.0/24"}]"#)
            .create_async()
            .await;

        let cidr = Ipv4::new("192.168.1.0/24").unwrap();
        assert!(client.network_exists(&cidr).await.unwrap());
    }

    #[tokio::test]
    async fn test_network_exists_false_on_empty_result() {
        let mut server = mockito::Server::new_async().await;
        let client = logged_in_client(&mut server).await;

        let _lookup = server
            .mock("GET", "/network")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let cidr = Ipv4::new("192.168.1.0/24").unwrap();
        assert!(!client.network_exists(&cidr).await.unwrap());
    }

    #[tokio::test]
    async fn test_network_exists_false_on_error_status() {
        let mut server = mockito::Server::new_async().await;
        let client = logged_in_client(&mut server).await;

        let _lookup = server
            .mock("GET", "/network")
            .match_query(mockito::Matcher::Any)
            .with_status(400)
            .with_body(r#"{"Error": "bad request"}"#)
            .create_async()
            .await;

        let cidr = Ipv4::new("192.168.1.0/24").unwrap();
        assert!(!client.network_exists(&cidr).await.unwrap());
    }

    #[tokio::test]
    async fn test_network_exists_rejects_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let client = logged_in_client(&mut server).await;

        let _lookup = server
            .mock("GET", "/network")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let cidr = Ipv4::new("192.168.1.0/24").unwrap();
        assert!(client.network_exists(&cidr).await.is_err());
    }

    #[tokio::test]
    async fn test_create_network_sends_extattrs() {
        let mut server = mockito::Server::new_async().await;
        let client = logged_in_client(&mut server).await;

        let create = server
            .mock("POST", "/network")
            .match_header("cookie", "ibapauth=test-session-token")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "network": "192.168.2.0/24",
                "extattrs": {
                    "Environment": {"value": "prod"},
                    "ManagedBy": {"value": "Infoblox"}
                }
            })))
            .with_status(201)
            .create_async()
            .await;

        let cidr = Ipv4::new("192.168.2.0/24").unwrap();
        client.create_network(&cidr, "prod").await.unwrap();
        create.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_network_propagates_error_status() {
        let mut server = mockito::Server::new_async().await;
        let client = logged_in_client(&mut server).await;

        let _create = server
            .mock("POST", "/network")
            .with_status(400)
            .create_async()
            .await;

        let cidr = Ipv4::new("192.168.2.0/24").unwrap();
        let result = client.create_network(&cidr, "prod").await;
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("IPAM network create failed"));
    }
}
