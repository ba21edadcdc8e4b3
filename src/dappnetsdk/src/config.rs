//! Run configuration: manager endpoint, package sets, the per-network
//! profile table, and verification knobs. Defaults are built in code and
//! cached; a TOML file can override any section.

use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use envsync::{ManagerConfig, Network, StakerConfig};
use verify::{AttestationPolicy, VerifyConfig};

// Constants for hardcoded values
/// Prefix mapping a service name to its container name
pub const DEFAULT_CONTAINER_PREFIX: &str = "dappnet-pkg-";

/// Validator-status API for the prater test network
pub const PRATER_ATTESTATION_API: &str = "https://prater.beaconcha.in/api/v1";

/// Parsed default configuration (built once at first access)
static DEFAULT_CONFIG: OnceLock<Config> = OnceLock::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub manager: ManagerConfig,
    #[serde(default)]
    pub packages: PackagesConfig,
    #[serde(default)]
    pub profiles: NetworkProfiles,
    #[serde(default)]
    pub verify: VerifyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagesConfig {
    /// Platform packages a reconciliation run must never remove, regardless
    /// of network.
    #[serde(default = "default_core_packages")]
    pub core: Vec<String>,
    /// Network-independent packages that must be installed.
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default = "default_container_prefix")]
    pub container_prefix: String,
}

fn default_core_packages() -> Vec<String> {
    [
        "core.dnp.dappnet.eth",
        "manager.dnp.dappnet.eth",
        "bind.dnp.dappnet.eth",
        "ipfs.dnp.dappnet.eth",
        "https.dnp.dappnet.eth",
        "wifi.dnp.dappnet.eth",
    ]
    .map(String::from)
    .to_vec()
}

fn default_container_prefix() -> String {
    DEFAULT_CONTAINER_PREFIX.to_string()
}

impl Default for PackagesConfig {
    fn default() -> Self {
        Self {
            core: default_core_packages(),
            required: Vec::new(),
            container_prefix: default_container_prefix(),
        }
    }
}

/// Everything network-conditional, in one table keyed by [`Network`]. No
/// component branches on the network variant; they receive the resolved
/// profile's data explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkProfiles {
    #[serde(default = "default_mainnet_profile")]
    pub mainnet: NetworkProfile,
    #[serde(default = "default_gnosis_profile")]
    pub gnosis: NetworkProfile,
    #[serde(default = "default_prater_profile")]
    pub prater: NetworkProfile,
    #[serde(default)]
    pub undefined: NetworkProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkProfile {
    /// Packages kept on top of the core set when this network is active.
    #[serde(default)]
    pub keep_packages: Vec<String>,
    /// Staker configuration pushed for this network; absent means the sync
    /// step is a no-op.
    #[serde(default)]
    pub staker: Option<StakerConfig>,
    /// Attestation policy; absent means the network is exempt from
    /// attestation verification.
    #[serde(default)]
    pub attestation: Option<AttestationPolicy>,
}

fn default_mainnet_profile() -> NetworkProfile {
    NetworkProfile {
        keep_packages: [
            "geth.dnp.dappnet.eth",
            "lighthouse.dnp.dappnet.eth",
            "web3signer.dnp.dappnet.eth",
            "mev-boost.dnp.dappnet.eth",
        ]
        .map(String::from)
        .to_vec(),
        staker: Some(StakerConfig {
            execution_client: Some("geth.dnp.dappnet.eth".to_string()),
            consensus_client: Some("lighthouse.dnp.dappnet.eth".to_string()),
            mev_boost: false,
        }),
        // Mainnet validators are watched by dedicated monitoring, not by
        // test runs.
        attestation: None,
    }
}

fn default_gnosis_profile() -> NetworkProfile {
    NetworkProfile {
        keep_packages: [
            "nethermind-xdai.dnp.dappnet.eth",
            "gnosis-beacon-chain-prysm.dnp.dappnet.eth",
            "web3signer-gnosis.dnp.dappnet.eth",
        ]
        .map(String::from)
        .to_vec(),
        staker: Some(StakerConfig {
            execution_client: Some("nethermind-xdai.dnp.dappnet.eth".to_string()),
            consensus_client: Some("gnosis-beacon-chain-prysm.dnp.dappnet.eth".to_string()),
            mev_boost: false,
        }),
        attestation: None,
    }
}

fn default_prater_profile() -> NetworkProfile {
    NetworkProfile {
        keep_packages: [
            "goerli-geth.dnp.dappnet.eth",
            "prysm-prater.dnp.dappnet.eth",
            "web3signer-prater.dnp.dappnet.eth",
            "mev-boost-goerli.dnp.dappnet.eth",
        ]
        .map(String::from)
        .to_vec(),
        staker: Some(StakerConfig {
            execution_client: Some("goerli-geth.dnp.dappnet.eth".to_string()),
            consensus_client: Some("prysm-prater.dnp.dappnet.eth".to_string()),
            mev_boost: true,
        }),
        attestation: Some(AttestationPolicy {
            api_base: PRATER_ATTESTATION_API.to_string(),
            // Supplied per run (--validator-index); polling without one is a
            // configuration error.
            validator_index: None,
        }),
    }
}

impl Default for NetworkProfiles {
    fn default() -> Self {
        Self {
            mainnet: default_mainnet_profile(),
            gnosis: default_gnosis_profile(),
            prater: default_prater_profile(),
            undefined: NetworkProfile::default(),
        }
    }
}

impl NetworkProfiles {
    /// The one place a network variant is mapped to its data.
    pub fn profile(&self, network: Network) -> &NetworkProfile {
        match network {
            Network::Mainnet => &self.mainnet,
            Network::Gnosis => &self.gnosis,
            Network::Prater => &self.prater,
            Network::Undefined => &self.undefined,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, or the built-in defaults when no
    /// path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, String> {
        let Some(path) = path else {
            tracing::info!("No config file given, using defaults");
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {:?}: {}", path, e))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file {:?}: {}", path, e))?;

        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Packages that must survive a reconciliation run on `network`: the
    /// core set, the network profile's additions, and the required set,
    /// first occurrence wins. Required packages are kept by construction;
    /// a second pass never removes what the first one installed.
    pub fn keep_list(&self, network: Network) -> Vec<String> {
        let mut keep = self.packages.core.clone();
        for name in self
            .profiles
            .profile(network)
            .keep_packages
            .iter()
            .chain(&self.packages.required)
        {
            if !keep.contains(name) {
                keep.push(name.clone());
            }
        }
        keep
    }

    /// Container name for a service of the package under test.
    pub fn container_name(&self, service: &str) -> String {
        format!("{}{}", self.packages.container_prefix, service)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.manager.validate()?;
        self.verify.validate()?;
        if self.packages.core.is_empty() {
            return Err(
                "PackagesConfig core must not be empty, a run would remove the platform itself"
                    .to_string(),
            );
        }
        if self.packages.container_prefix.is_empty() {
            return Err("PackagesConfig container_prefix must not be empty".to_string());
        }
        Ok(())
    }

    /// Get the default configuration (built in Rust code, cached in OnceLock)
    fn default_parsed() -> &'static Config {
        DEFAULT_CONFIG.get_or_init(|| Config {
            manager: ManagerConfig::default(),
            packages: PackagesConfig::default(),
            profiles: NetworkProfiles::default(),
            verify: VerifyConfig::default(),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_parsed().clone()
    }
}
