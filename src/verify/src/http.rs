use crate::error::{Result, VerifyError};

/// Single-shot GET against a package's health endpoint. Success iff the
/// status is 2xx. Callers skip this check entirely when the package declares
/// no endpoint; an absent URL is neither a pass nor a failure.
pub async fn probe_health_url(client: &reqwest::Client, url: &str) -> Result<()> {
    let resp = client.get(url).send().await.map_err(|e| {
        VerifyError::HealthCheckFailed(format!("GET {} failed: {}", url, e))
    })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(VerifyError::HealthCheckFailed(format!(
            "{} answered with status {}",
            url, status
        )));
    }

    tracing::info!("[HttpHealthProbe] {} answered {}", url, status);
    Ok(())
}
