use serde::{Deserialize, Serialize};

// Constants for hardcoded values
/// Default manager daemon API base URL, as reachable from the host
pub const DEFAULT_MANAGER_URL: &str = "http://manager.dappnet";

/// Well-known host alias probed before any reconciliation step
pub const DEFAULT_ALIAS_URL: &str = "http://manager.dappnet/ping";

/// Default per-request timeout for manager API calls
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Default TCP connect timeout for manager API calls
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Version tag requested when installing missing packages
pub const LATEST_VERSION: &str = "latest";

/// Endpoint and timeouts for the manager daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerConfig {
    #[serde(default = "default_manager_url")]
    pub base_url: String,
    /// Probed with a single GET before reconciliation starts.
    #[serde(default = "default_alias_url")]
    pub alias_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_manager_url() -> String {
    DEFAULT_MANAGER_URL.to_string()
}

fn default_alias_url() -> String {
    DEFAULT_ALIAS_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            base_url: default_manager_url(),
            alias_url: default_alias_url(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl ManagerConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("ManagerConfig base_url must not be empty".to_string());
        }
        if self.alias_url.is_empty() {
            return Err("ManagerConfig alias_url must not be empty".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("ManagerConfig request_timeout_secs must be > 0".to_string());
        }
        Ok(())
    }
}
