use crate::error::{EnvSyncError, Result};

/// Confirm the well-known manager alias resolves from the host and answers
/// with a 2xx status. One request, no retries: if the alias is not up by the
/// time a test run starts, the environment is not ready and the run must not
/// proceed to reconciliation.
pub async fn check_host_alias(client: &reqwest::Client, alias_url: &str) -> Result<()> {
    tracing::info!("[HostAliasProbe] Probing {}", alias_url);

    let resp = client.get(alias_url).send().await.map_err(|e| {
        EnvSyncError::EnvironmentNotReady(format!("Alias {} is unreachable: {}", alias_url, e))
    })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(EnvSyncError::EnvironmentNotReady(format!(
            "Alias {} answered with status {}",
            alias_url, status
        )));
    }

    tracing::info!("[HostAliasProbe] Alias answered {}", status);
    Ok(())
}
