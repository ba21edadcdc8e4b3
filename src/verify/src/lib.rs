//! verify: deployment verification for dappnet packages.
//!
//! Independent bounded checks against a freshly deployed package: container
//! health polling, log error scanning, an optional HTTP health probe, and
//! validator attestation polling. Checks run concurrently under per-check
//! timeouts and a caller cancellation token; every check always runs, and
//! failures are reported jointly.

pub mod attestation;
pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod logs;
pub mod report;
pub mod runtime;

pub use config::{AttestationPolicy, VerifyConfig};
pub use error::{Result, VerifyError};
pub use logs::{LogClassifier, WordErrorClassifier};
pub use report::{CheckOutcome, Verifier, VerifyReport, VerifyTarget};
pub use runtime::{ContainerRuntime, ContainerStatus, DockerRuntime, LogQuery};
