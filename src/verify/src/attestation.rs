//! Attestation polling: confirm the package's validator is attesting by
//! querying an external validator-status API with bounded retries.

use std::time::Duration;

use serde::Deserialize;

use crate::config::{AttestationPolicy, VerifyConfig};
use crate::error::{Result, VerifyError};

/// Status the validator must report before the check passes.
pub const ACTIVE_STATUS: &str = "active_online";

#[derive(Deserialize)]
struct ValidatorStatusResponse {
    data: ValidatorStatusData,
}

#[derive(Deserialize)]
struct ValidatorStatusData {
    status: String,
}

/// Poll the validator-status API until the validator reports active.
///
/// `None` policy means the network is exempt: immediate success, zero
/// network calls. With a policy, up to `attestation_rounds` queries are
/// made, sleeping `attestation_interval_secs` after each miss. A non-2xx
/// response is immediately fatal, not retried: a broken API is a different
/// failure than a validator that is slow to appear.
pub async fn poll_validator_active(
    client: &reqwest::Client,
    policy: Option<&AttestationPolicy>,
    config: &VerifyConfig,
) -> Result<()> {
    let Some(policy) = policy else {
        tracing::info!("[AttestationPoller] Network exempt from attestation, skipping");
        return Ok(());
    };

    let index = policy.validator_index.ok_or_else(|| {
        VerifyError::Config("attestation policy carries no validator index".to_string())
    })?;
    let url = format!("{}/validator/{}", policy.api_base.trim_end_matches('/'), index);

    let mut last_status = String::from("unknown");
    for round in 1..=config.attestation_rounds {
        let resp = client.get(&url).send().await.map_err(|e| {
            VerifyError::RemoteOperation(format!("GET {} failed: {}", url, e))
        })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_body = resp.text().await.unwrap_or_default();
            return Err(VerifyError::RemoteOperation(format!(
                "Attestation API returned {} for validator {}: {}",
                status, index, error_body
            )));
        }

        let parsed: ValidatorStatusResponse = resp.json().await.map_err(|e| {
            VerifyError::RemoteOperation(format!("Failed to parse validator status: {}", e))
        })?;
        last_status = parsed.data.status;

        if last_status == ACTIVE_STATUS {
            tracing::info!(
                "[AttestationPoller] Validator {} is {} (round {}/{})",
                index,
                ACTIVE_STATUS,
                round,
                config.attestation_rounds
            );
            return Ok(());
        }

        tracing::info!(
            "[AttestationPoller] Validator {} status {} (round {}/{}), retrying in {}s",
            index,
            last_status,
            round,
            config.attestation_rounds,
            config.attestation_interval_secs
        );
        tokio::time::sleep(Duration::from_secs(config.attestation_interval_secs)).await;
    }

    Err(VerifyError::ValidatorNotActive {
        index,
        rounds: config.attestation_rounds,
        last_status,
    })
}
