use thiserror::Error;

pub type Result<T> = std::result::Result<T, VerifyError>;

/// Failures detected while verifying a deployed package.
///
/// Individual check failures are recovered into the aggregator and only
/// surfaced jointly as [`VerifyError::Aggregate`] once every check has run.
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Container {name} is not running (observed: {observed})")]
    ContainerNotRunning { name: String, observed: String },

    #[error("Error logs found in container {name}:\n{}", .lines.join("\n"))]
    ErrorLogsFound { name: String, lines: Vec<String> },

    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Validator {index} not active after {rounds} round(s), last status: {last_status}")]
    ValidatorNotActive {
        index: u64,
        rounds: u32,
        last_status: String,
    },

    /// An external service call failed or answered with an unexpected status.
    #[error("Remote operation failed: {0}")]
    RemoteOperation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Container runtime transport failure (daemon unreachable, inspect failed).
    #[error("Container runtime error: {0}")]
    Runtime(String),

    /// A check exceeded its time ceiling. A check failure, never a crash.
    #[error("Check timed out: {0}")]
    Timeout(String),

    /// The caller's cancellation signal fired while the check was in flight.
    #[error("Check cancelled: {0}")]
    Cancelled(String),

    /// Combined failure joining every independent check that failed.
    #[error("{} verification check(s) failed:\n{}", .failures.len(), .failures.join("\n"))]
    Aggregate { failures: Vec<String> },
}
