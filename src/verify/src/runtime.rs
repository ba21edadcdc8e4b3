//! Container runtime seam. Checks talk to [`ContainerRuntime`] so tests can
//! substitute scripted runtimes; [`DockerRuntime`] is the bollard-backed
//! implementation against the local Docker daemon.

use async_trait::async_trait;
use bollard::container::{InspectContainerOptions, LogsOptions};
use bollard::models::ContainerStateStatusEnum;
use futures::StreamExt;

use crate::error::{Result, VerifyError};

/// One observation of a container's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerStatus {
    Running,
    /// Any reported state other than running ("exited", "restarting", ...).
    NotRunning(String),
    /// The runtime reported no state for the container.
    Unknown,
}

impl ContainerStatus {
    /// The observed state as text, for error reporting.
    pub fn observed(&self) -> &str {
        match self {
            ContainerStatus::Running => "running",
            ContainerStatus::NotRunning(s) => s,
            ContainerStatus::Unknown => "unknown",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, ContainerStatus::Running)
    }
}

impl std::fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.observed())
    }
}

/// Parameters for a log fetch.
#[derive(Debug, Clone)]
pub struct LogQuery {
    pub stdout: bool,
    pub stderr: bool,
    pub timestamps: bool,
    /// Only logs at or after this Unix timestamp.
    pub since: Option<i64>,
}

impl LogQuery {
    /// Both streams, timestamped, from the given Unix timestamp on.
    pub fn full_since(since: i64) -> Self {
        Self {
            stdout: true,
            stderr: true,
            timestamps: true,
            since: Some(since),
        }
    }
}

/// Read-only container operations the checks need.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Current status of a container by name.
    async fn status(&self, name: &str) -> Result<ContainerStatus>;

    /// Accumulated logs as one text blob, one line per log record.
    async fn logs(&self, name: &str, query: &LogQuery) -> Result<String>;
}

/// Docker daemon implementation.
pub struct DockerRuntime {
    docker: bollard::Docker,
}

impl DockerRuntime {
    /// Connect with the platform's default socket/pipe settings.
    pub fn connect() -> Result<Self> {
        let docker = bollard::Docker::connect_with_local_defaults().map_err(|e| {
            VerifyError::Runtime(format!("Failed to connect to Docker daemon: {}", e))
        })?;
        Ok(Self { docker })
    }
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn status(&self, name: &str) -> Result<ContainerStatus> {
        let inspect = self
            .docker
            .inspect_container(name, None::<InspectContainerOptions>)
            .await
            .map_err(|e| {
                VerifyError::Runtime(format!("Failed to inspect container {}: {}", name, e))
            })?;

        let status = inspect.state.and_then(|state| state.status);
        Ok(match status {
            Some(ContainerStateStatusEnum::RUNNING) => ContainerStatus::Running,
            Some(other) => ContainerStatus::NotRunning(other.to_string()),
            None => ContainerStatus::Unknown,
        })
    }

    async fn logs(&self, name: &str, query: &LogQuery) -> Result<String> {
        let options = LogsOptions::<String> {
            stdout: query.stdout,
            stderr: query.stderr,
            timestamps: query.timestamps,
            since: query.since.unwrap_or(0),
            ..Default::default()
        };

        let mut stream = self.docker.logs(name, Some(options));
        let mut text = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                VerifyError::Runtime(format!("Failed to read logs of container {}: {}", name, e))
            })?;
            text.push_str(&chunk.to_string());
        }
        Ok(text)
    }
}
