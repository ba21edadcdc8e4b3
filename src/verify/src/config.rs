use serde::{Deserialize, Serialize};

// Constants for hardcoded values
/// Rounds of container status polling during the health check
pub const DEFAULT_HEALTH_ROUNDS: u32 = 10;

/// Delay between health check rounds
pub const DEFAULT_HEALTH_INTERVAL_SECS: u64 = 1;

/// Hard ceiling the log scanner clamps any requested wait window to
pub const MAX_LOG_WAIT_SECS: u64 = 120;

/// Default requested log wait window (the full ceiling)
pub const DEFAULT_LOG_WAIT_SECS: u64 = 120;

/// Rounds of validator status polling
pub const DEFAULT_ATTESTATION_ROUNDS: u32 = 8;

/// Delay between validator status polls (2 minutes; 8 rounds ≈ 16 minutes)
pub const DEFAULT_ATTESTATION_INTERVAL_SECS: u64 = 120;

/// Time ceiling for one container health check
pub const DEFAULT_HEALTH_TIMEOUT_SECS: u64 = 30;

/// Time ceiling for one log scan (wait window plus fetch slack)
pub const DEFAULT_LOG_TIMEOUT_SECS: u64 = 180;

/// Time ceiling for the single-shot HTTP probe
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

/// Time ceiling for the attestation poll (worst case plus slack)
pub const DEFAULT_ATTESTATION_TIMEOUT_SECS: u64 = 1020;

/// Knobs for the verification checks. Every delay and bound the checks use
/// comes from here; nothing reads process-wide state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyConfig {
    #[serde(default = "default_health_rounds")]
    pub health_rounds: u32,
    #[serde(default = "default_health_interval_secs")]
    pub health_interval_secs: u64,
    #[serde(default = "default_health_timeout_secs")]
    pub health_timeout_secs: u64,
    #[serde(default = "default_log_wait_secs")]
    pub log_wait_secs: u64,
    #[serde(default = "default_log_timeout_secs")]
    pub log_timeout_secs: u64,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    #[serde(default = "default_attestation_rounds")]
    pub attestation_rounds: u32,
    #[serde(default = "default_attestation_interval_secs")]
    pub attestation_interval_secs: u64,
    #[serde(default = "default_attestation_timeout_secs")]
    pub attestation_timeout_secs: u64,
}

fn default_health_rounds() -> u32 {
    DEFAULT_HEALTH_ROUNDS
}

fn default_health_interval_secs() -> u64 {
    DEFAULT_HEALTH_INTERVAL_SECS
}

fn default_health_timeout_secs() -> u64 {
    DEFAULT_HEALTH_TIMEOUT_SECS
}

fn default_log_wait_secs() -> u64 {
    DEFAULT_LOG_WAIT_SECS
}

fn default_log_timeout_secs() -> u64 {
    DEFAULT_LOG_TIMEOUT_SECS
}

fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn default_attestation_rounds() -> u32 {
    DEFAULT_ATTESTATION_ROUNDS
}

fn default_attestation_interval_secs() -> u64 {
    DEFAULT_ATTESTATION_INTERVAL_SECS
}

fn default_attestation_timeout_secs() -> u64 {
    DEFAULT_ATTESTATION_TIMEOUT_SECS
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            health_rounds: default_health_rounds(),
            health_interval_secs: default_health_interval_secs(),
            health_timeout_secs: default_health_timeout_secs(),
            log_wait_secs: default_log_wait_secs(),
            log_timeout_secs: default_log_timeout_secs(),
            http_timeout_secs: default_http_timeout_secs(),
            attestation_rounds: default_attestation_rounds(),
            attestation_interval_secs: default_attestation_interval_secs(),
            attestation_timeout_secs: default_attestation_timeout_secs(),
        }
    }
}

impl VerifyConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.health_rounds == 0 {
            return Err("VerifyConfig health_rounds must be > 0".to_string());
        }
        if self.attestation_rounds == 0 {
            return Err("VerifyConfig attestation_rounds must be > 0".to_string());
        }
        if self.health_timeout_secs == 0
            || self.log_timeout_secs == 0
            || self.http_timeout_secs == 0
            || self.attestation_timeout_secs == 0
        {
            return Err("VerifyConfig check timeouts must be > 0".to_string());
        }
        Ok(())
    }
}

/// Per-network attestation policy. Networks without one are exempt from
/// attestation verification entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationPolicy {
    /// Validator-status API base, e.g. `https://prater.beaconcha.in/api/v1`.
    pub api_base: String,
    /// Index of the validator whose liveness proves the deployment. May be
    /// supplied per run; polling with a policy but no index is a
    /// configuration error.
    #[serde(default)]
    pub validator_index: Option<u64>,
}
