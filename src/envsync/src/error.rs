use thiserror::Error;

pub type Result<T> = std::result::Result<T, EnvSyncError>;

/// Failures while driving the remote environment toward its desired state.
///
/// Everything here is fatal to the run: verification must not start against
/// an environment whose package set or configuration is in an unknown state.
#[derive(Error, Debug)]
pub enum EnvSyncError {
    /// A required input (runner labels, manager URL) is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The manager alias or daemon is unreachable or unhealthy.
    #[error("Environment not ready: {0}")]
    EnvironmentNotReady(String),

    /// A manager API call failed or returned an unexpected status.
    #[error("Remote operation failed: {0}")]
    RemoteOperation(String),
}
