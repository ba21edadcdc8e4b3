use std::time::Duration;

use crate::config::VerifyConfig;
use crate::error::{Result, VerifyError};
use crate::runtime::{ContainerRuntime, ContainerStatus};

/// Poll a container's status for a bounded number of rounds.
///
/// Fail-fast semantics, on purpose: the first round observing anything but
/// Running fails immediately with the observed state. There is no tolerance
/// window; a container that is up must stay up for every round. An unknown
/// status counts as a failing observation.
pub async fn check_container_running(
    runtime: &dyn ContainerRuntime,
    name: &str,
    config: &VerifyConfig,
) -> Result<()> {
    for round in 1..=config.health_rounds {
        let status = runtime.status(name).await?;
        match status {
            ContainerStatus::Running => {
                tracing::debug!(
                    "[ContainerHealthCheck] {} running (round {}/{})",
                    name,
                    round,
                    config.health_rounds
                );
            }
            other => {
                tracing::warn!(
                    "[ContainerHealthCheck] {} observed {} at round {}",
                    name,
                    other,
                    round
                );
                return Err(VerifyError::ContainerNotRunning {
                    name: name.to_string(),
                    observed: other.observed().to_string(),
                });
            }
        }

        if round < config.health_rounds {
            tokio::time::sleep(Duration::from_secs(config.health_interval_secs)).await;
        }
    }

    tracing::info!(
        "[ContainerHealthCheck] {} stayed running for {} round(s)",
        name,
        config.health_rounds
    );
    Ok(())
}
