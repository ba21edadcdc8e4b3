//! Client for the dappnet manager daemon.
//!
//! All reads and writes of remote environment state go through [`ManagerApi`];
//! the HTTP implementation talks to the daemon's JSON API under `/api/v0`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ManagerConfig;
use crate::error::{EnvSyncError, Result};
use crate::network::Network;

/// A package currently installed on the node, as reported by the manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledPackage {
    pub name: String,
    pub version: String,
}

/// Staker configuration pushed whole to the manager. Never diffed against
/// the remote value; the push overwrites whatever is there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakerConfig {
    #[serde(default)]
    pub execution_client: Option<String>,
    #[serde(default)]
    pub consensus_client: Option<String>,
    #[serde(default)]
    pub mev_boost: bool,
}

/// Backend the node's IPFS client points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IpfsClientTarget {
    Local,
    Remote,
    /// Any backend this client does not know about. Treated as non-local.
    #[serde(untagged)]
    Other(String),
}

impl IpfsClientTarget {
    pub fn as_str(&self) -> &str {
        match self {
            IpfsClientTarget::Local => "local",
            IpfsClientTarget::Remote => "remote",
            IpfsClientTarget::Other(s) => s,
        }
    }
}

impl std::fmt::Display for IpfsClientTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for IpfsClientTarget {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(match s.to_lowercase().as_str() {
            "local" => IpfsClientTarget::Local,
            "remote" => IpfsClientTarget::Remote,
            _ => IpfsClientTarget::Other(s),
        })
    }
}

/// Operations the reconciler needs from the manager daemon.
#[async_trait]
pub trait ManagerApi: Send + Sync {
    /// Liveness ping; Ok iff the daemon answers healthy.
    async fn health_check(&self) -> Result<()>;

    /// List all installed packages.
    async fn packages_get(&self) -> Result<Vec<InstalledPackage>>;

    /// Install a package at the given version tag.
    async fn package_install(&self, name: &str, version: &str) -> Result<()>;

    /// Remove a package, optionally deleting its volumes. Destructive.
    async fn package_remove(&self, name: &str, delete_volumes: bool) -> Result<()>;

    /// Overwrite the staker configuration for a network.
    async fn staker_config_set(&self, network: Network, config: &StakerConfig) -> Result<()>;

    /// Read the current IPFS client target.
    async fn ipfs_client_target_get(&self) -> Result<IpfsClientTarget>;

    /// Point the IPFS client at `target`. `delete_local_client` controls
    /// whether an existing local client is torn down in the same call.
    async fn ipfs_client_target_set(
        &self,
        target: IpfsClientTarget,
        delete_local_client: bool,
    ) -> Result<()>;
}

#[derive(Serialize)]
struct InstallRequest<'a> {
    name: &'a str,
    version: &'a str,
}

#[derive(Serialize)]
struct RemoveRequest<'a> {
    name: &'a str,
    delete_volumes: bool,
}

#[derive(Serialize)]
struct StakerConfigRequest<'a> {
    network: Network,
    #[serde(flatten)]
    config: &'a StakerConfig,
}

#[derive(Serialize)]
struct IpfsTargetRequest {
    target: IpfsClientTarget,
    delete_local_client: bool,
}

#[derive(Deserialize)]
struct IpfsTargetResponse {
    target: IpfsClientTarget,
}

/// HTTP implementation of [`ManagerApi`] against the manager daemon.
pub struct HttpManagerClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpManagerClient {
    /// Build a client with its own connection pool, using the configured
    /// timeouts.
    pub fn new(config: &ManagerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(std::time::Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| EnvSyncError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::from_client(client, config.base_url.clone()))
    }

    /// Reuse an existing client (one pool shared across the whole run).
    pub fn from_client(client: reqwest::Client, base_url: String) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response> {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| EnvSyncError::RemoteOperation(format!("GET {} failed: {}", path, e)))?;
        Self::check_status(path, resp).await
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<reqwest::Response> {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| EnvSyncError::RemoteOperation(format!("POST {} failed: {}", path, e)))?;
        Self::check_status(path, resp).await
    }

    async fn check_status(path: &str, resp: reqwest::Response) -> Result<reqwest::Response> {
        if !resp.status().is_success() {
            let status = resp.status();
            let error_body = resp.text().await.unwrap_or_default();
            return Err(EnvSyncError::RemoteOperation(format!(
                "Manager returned {} for {}: {}",
                status, path, error_body
            )));
        }
        Ok(resp)
    }
}

#[async_trait]
impl ManagerApi for HttpManagerClient {
    async fn health_check(&self) -> Result<()> {
        self.get("/api/v0/health").await?;
        Ok(())
    }

    async fn packages_get(&self) -> Result<Vec<InstalledPackage>> {
        let resp = self.get("/api/v0/packages").await?;
        resp.json().await.map_err(|e| {
            EnvSyncError::RemoteOperation(format!("Failed to parse package list: {}", e))
        })
    }

    async fn package_install(&self, name: &str, version: &str) -> Result<()> {
        self.post("/api/v0/packages/install", &InstallRequest { name, version })
            .await?;
        Ok(())
    }

    async fn package_remove(&self, name: &str, delete_volumes: bool) -> Result<()> {
        self.post(
            "/api/v0/packages/remove",
            &RemoveRequest {
                name,
                delete_volumes,
            },
        )
        .await?;
        Ok(())
    }

    async fn staker_config_set(&self, network: Network, config: &StakerConfig) -> Result<()> {
        self.post(
            "/api/v0/staker/config",
            &StakerConfigRequest { network, config },
        )
        .await?;
        Ok(())
    }

    async fn ipfs_client_target_get(&self) -> Result<IpfsClientTarget> {
        let resp = self.get("/api/v0/ipfs/client-target").await?;
        let parsed: IpfsTargetResponse = resp.json().await.map_err(|e| {
            EnvSyncError::RemoteOperation(format!("Failed to parse IPFS client target: {}", e))
        })?;
        Ok(parsed.target)
    }

    async fn ipfs_client_target_set(
        &self,
        target: IpfsClientTarget,
        delete_local_client: bool,
    ) -> Result<()> {
        self.post(
            "/api/v0/ipfs/client-target",
            &IpfsTargetRequest {
                target,
                delete_local_client,
            },
        )
        .await?;
        Ok(())
    }
}
