//! dappnetsdk: test runner for freshly published dappnet packages.
//!
//! Ties envsync (environment reconciliation) and verify (deployment checks)
//! into one pipeline behind the `dappnet-test` binary.

pub mod config;
pub mod run;

pub use config::{Config, NetworkProfile, NetworkProfiles, PackagesConfig};
pub use run::{RunError, RunReport, RunRequest, TestEnvRunner};
