//! End-to-end pipeline: resolve the network, drive the node's environment to
//! its desired state, then verify the deployed package.
//!
//! Reconciliation errors abort immediately, since verification must not
//! start against an environment in an unknown state. Verification itself
//! always runs every check and reports failures jointly.

use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use envsync::{
    ipfs, packages, probe, staker, EnvSyncError, HttpManagerClient, ManagerApi, Network,
    ReconcileSummary,
};
use verify::{ContainerRuntime, DockerRuntime, Verifier, VerifyReport, VerifyTarget};

use crate::config::Config;

pub type Result<T> = std::result::Result<T, RunError>;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Env(#[from] EnvSyncError),

    #[error(transparent)]
    Verify(#[from] verify::VerifyError),
}

/// Per-run inputs that are not static configuration. Everything the run
/// needs arrives here or in [`Config`]; no step reads process-wide state.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    /// Package under test.
    pub package: String,
    /// Service names whose containers get checked. Empty means the package
    /// runs a single service named after itself.
    pub services: Vec<String>,
    /// Runner labels. `None` means the label source is absent, which fails
    /// resolution with a configuration error.
    pub labels: Option<Vec<String>>,
    /// Health endpoint probed once with GET; absent skips the probe.
    pub health_url: Option<String>,
    /// Overrides the profile's validator index for this run.
    pub validator_index: Option<u64>,
    /// Overrides the configured log wait window for this run.
    pub log_wait_secs: Option<u64>,
}

/// What one run did, for logging and assertions.
#[derive(Debug)]
pub struct RunReport {
    pub network: Network,
    pub reconcile: ReconcileSummary,
    /// Whether the IPFS client target had to be switched to local.
    pub ipfs_mutated: bool,
    pub verify: VerifyReport,
}

pub struct TestEnvRunner {
    config: Config,
    manager: Arc<dyn ManagerApi>,
    runtime: Arc<dyn ContainerRuntime>,
    client: reqwest::Client,
}

impl TestEnvRunner {
    /// Wire up the real collaborators: one HTTP client shared by the manager
    /// client and the checks, plus the local Docker daemon.
    pub fn connect(config: Config) -> Result<Self> {
        config.validate().map_err(RunError::Config)?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(
                config.manager.request_timeout_secs,
            ))
            .connect_timeout(std::time::Duration::from_secs(
                config.manager.connect_timeout_secs,
            ))
            .build()
            .map_err(|e| RunError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let manager = Arc::new(HttpManagerClient::from_client(
            client.clone(),
            config.manager.base_url.clone(),
        ));
        let runtime = Arc::new(DockerRuntime::connect()?);

        Ok(Self::new(config, manager, runtime, client))
    }

    /// Assemble from explicit collaborators. Tests inject mocks here.
    pub fn new(
        config: Config,
        manager: Arc<dyn ManagerApi>,
        runtime: Arc<dyn ContainerRuntime>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            config,
            manager,
            runtime,
            client,
        }
    }

    pub async fn run(&self, request: &RunRequest, cancel: &CancellationToken) -> Result<RunReport> {
        let network = Network::resolve(request.labels.as_deref())?;

        probe::check_host_alias(&self.client, &self.config.manager.alias_url).await?;

        self.manager.health_check().await.map_err(|e| {
            EnvSyncError::EnvironmentNotReady(format!("Manager health check failed: {}", e))
        })?;
        tracing::info!("[TestEnvRunner] Manager is healthy, reconciling environment");

        let keep = self.config.keep_list(network);
        let reconcile = packages::reconcile_packages(
            self.manager.as_ref(),
            &keep,
            &self.config.packages.required,
        )
        .await?;

        let profile = self.config.profiles.profile(network);
        staker::sync_staker_config(self.manager.as_ref(), network, profile.staker.as_ref())
            .await?;

        let ipfs_mutated = ipfs::enforce_local_ipfs(self.manager.as_ref()).await?;

        tracing::info!(
            "[TestEnvRunner] Environment reconciled, verifying {}",
            request.package
        );

        let mut verify_config = self.config.verify.clone();
        if let Some(wait) = request.log_wait_secs {
            verify_config.log_wait_secs = wait;
        }

        let policy = profile.attestation.clone().map(|mut p| {
            if request.validator_index.is_some() {
                p.validator_index = request.validator_index;
            }
            p
        });

        let services: Vec<String> = if request.services.is_empty() {
            vec![request.package.clone()]
        } else {
            request.services.clone()
        };
        let target = VerifyTarget {
            package: request.package.clone(),
            containers: services
                .iter()
                .map(|s| self.config.container_name(s))
                .collect(),
            health_url: request.health_url.clone(),
            log_wait_secs: verify_config.log_wait_secs,
        };

        let verifier = Verifier::new(self.runtime.clone(), self.client.clone(), verify_config);
        let report = verifier.run_checks(&target, policy.as_ref(), cancel).await;

        let failures = report.failures();
        let run_report = RunReport {
            network,
            reconcile,
            ipfs_mutated,
            verify: report,
        };

        if failures.is_empty() {
            Ok(run_report)
        } else {
            Err(verify::VerifyError::Aggregate { failures }.into())
        }
    }
}
