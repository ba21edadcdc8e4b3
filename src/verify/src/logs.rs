//! Log error scanning: wait out a bounded window, fetch everything the
//! container logged during it, and flag error-looking lines.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::config::MAX_LOG_WAIT_SECS;
use crate::error::{Result, VerifyError};
use crate::runtime::{ContainerRuntime, LogQuery};

/// Classifies a single log line as error or not.
///
/// The scanner's control flow does not care how: structured-log backends can
/// plug in a precise classifier without touching the scan itself.
pub trait LogClassifier: Send + Sync {
    fn is_error(&self, line: &str) -> bool;
}

/// Default classifier: flags any whitespace-delimited token equal to
/// `error`, ignoring case. Coarse by policy: "no error" matches, "error:"
/// does not.
pub struct WordErrorClassifier;

impl LogClassifier for WordErrorClassifier {
    fn is_error(&self, line: &str) -> bool {
        line.split_whitespace()
            .any(|token| token.eq_ignore_ascii_case("error"))
    }
}

/// Clamp a requested wait window to the scanner's ceiling. Callers may ask
/// for any window; nobody waits longer than [`MAX_LOG_WAIT_SECS`].
pub fn clamp_wait_secs(requested: u64) -> u64 {
    requested.min(MAX_LOG_WAIT_SECS)
}

/// Wait the clamped window once, then scan the logs accumulated during it.
///
/// A single observation point, not a poll: the container gets the whole
/// window to misbehave, and every matching line is reported together.
pub async fn scan_container_logs(
    runtime: &dyn ContainerRuntime,
    name: &str,
    requested_wait_secs: u64,
    classifier: &dyn LogClassifier,
) -> Result<()> {
    let wait_secs = clamp_wait_secs(requested_wait_secs);
    if wait_secs < requested_wait_secs {
        tracing::warn!(
            "[LogErrorScanner] Requested wait of {}s clamped to {}s",
            requested_wait_secs,
            wait_secs
        );
    }

    let window_start = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);

    tracing::info!(
        "[LogErrorScanner] Waiting {}s before scanning logs of {}",
        wait_secs,
        name
    );
    tokio::time::sleep(Duration::from_secs(wait_secs)).await;

    let text = runtime
        .logs(name, &LogQuery::full_since(window_start))
        .await?;

    let matches: Vec<String> = text
        .lines()
        .filter(|line| classifier.is_error(line))
        .map(str::to_string)
        .collect();

    if !matches.is_empty() {
        return Err(VerifyError::ErrorLogsFound {
            name: name.to_string(),
            lines: matches,
        });
    }

    tracing::info!(
        "[LogErrorScanner] No error lines in {} ({} line(s) scanned)",
        name,
        text.lines().count()
    );
    Ok(())
}
