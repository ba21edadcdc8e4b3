//! envsync: environment reconciliation for dappnet test runs.
//!
//! Drives a running node's package set and configuration toward a desired
//! state before deployment verification: resolves the target network from
//! runner labels, probes the manager alias, removes packages outside the
//! keep list, installs missing required packages, pushes the network's
//! staker configuration, and pins the IPFS client to the local backend.
//! All remote state lives behind [`ManagerApi`].

pub mod config;
pub mod error;
pub mod ipfs;
pub mod manager;
pub mod network;
pub mod packages;
pub mod probe;
pub mod staker;

pub use config::ManagerConfig;
pub use error::{EnvSyncError, Result};
pub use manager::{
    HttpManagerClient, InstalledPackage, IpfsClientTarget, ManagerApi, StakerConfig,
};
pub use network::Network;
pub use packages::{reconcile_packages, ReconcileSummary};
