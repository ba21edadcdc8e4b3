//! Check runner and error aggregation.
//!
//! Every verification check is attempted regardless of the others' outcomes;
//! failures are collected in order and surfaced jointly as one combined
//! error, maximizing the diagnostic value of a single run.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future;
use tokio_util::sync::CancellationToken;

use crate::attestation;
use crate::config::{AttestationPolicy, VerifyConfig};
use crate::error::{Result, VerifyError};
use crate::health;
use crate::http;
use crate::logs::{self, LogClassifier, WordErrorClassifier};
use crate::runtime::ContainerRuntime;

/// The deployed package to verify.
#[derive(Debug, Clone)]
pub struct VerifyTarget {
    /// Package under test, for reporting.
    pub package: String,
    /// Container names to check, already fully qualified.
    pub containers: Vec<String>,
    /// Optional HTTP health endpoint. Absent means the probe is not run.
    pub health_url: Option<String>,
    /// Requested log wait window; the scanner clamps it.
    pub log_wait_secs: u64,
}

/// One check's result, by name.
#[derive(Debug)]
pub struct CheckOutcome {
    pub check: String,
    pub result: Result<()>,
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

/// All outcomes of one verification run, in scheduling order.
#[derive(Debug, Default)]
pub struct VerifyReport {
    pub outcomes: Vec<CheckOutcome>,
}

impl VerifyReport {
    /// Formatted messages of every failed check, in order.
    pub fn failures(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter_map(|o| {
                o.result
                    .as_ref()
                    .err()
                    .map(|e| format!("{}: {}", o.check, e))
            })
            .collect()
    }

    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    /// Collapse into a single result: Ok when every check passed, otherwise
    /// one combined error joining all failure messages.
    pub fn into_result(self) -> Result<()> {
        let failures = self.failures();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(VerifyError::Aggregate { failures })
        }
    }
}

/// Bound a check with a time ceiling and the caller's cancellation signal.
/// Timeout and cancellation surface as check failures, never as crashes or
/// hung runs.
async fn bounded<F>(
    check: String,
    limit: Duration,
    cancel: CancellationToken,
    fut: F,
) -> CheckOutcome
where
    F: Future<Output = Result<()>>,
{
    let result = tokio::select! {
        _ = cancel.cancelled() => Err(VerifyError::Cancelled(check.clone())),
        res = tokio::time::timeout(limit, fut) => match res {
            Ok(inner) => inner,
            Err(_) => Err(VerifyError::Timeout(format!(
                "{} exceeded {}s",
                check,
                limit.as_secs()
            ))),
        },
    };

    match &result {
        Ok(()) => tracing::info!("[Verifier] Check passed: {}", check),
        Err(e) => tracing::warn!("[Verifier] Check failed: {}: {}", check, e),
    }
    CheckOutcome { check, result }
}

/// Runs the verification checks for one target concurrently and collects
/// every outcome.
pub struct Verifier {
    runtime: Arc<dyn ContainerRuntime>,
    client: reqwest::Client,
    classifier: Arc<dyn LogClassifier>,
    config: VerifyConfig,
}

impl Verifier {
    pub fn new(
        runtime: Arc<dyn ContainerRuntime>,
        client: reqwest::Client,
        config: VerifyConfig,
    ) -> Self {
        Self {
            runtime,
            client,
            classifier: Arc::new(WordErrorClassifier),
            config,
        }
    }

    /// Replace the default log classifier.
    pub fn with_classifier(mut self, classifier: Arc<dyn LogClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Run every check for the target: per container a health check and a
    /// log scan, plus the HTTP probe when a URL is present, plus the
    /// attestation poll. Checks are independent and run concurrently; no
    /// failure suppresses another check's execution.
    pub async fn run_checks(
        &self,
        target: &VerifyTarget,
        policy: Option<&AttestationPolicy>,
        cancel: &CancellationToken,
    ) -> VerifyReport {
        tracing::info!(
            "[Verifier] Verifying {} ({} container(s))",
            target.package,
            target.containers.len()
        );

        let mut labels = Vec::new();
        let mut handles = Vec::new();

        for name in &target.containers {
            let check = format!("container-health {}", name);
            let runtime = self.runtime.clone();
            let config = self.config.clone();
            let container = name.clone();
            let token = cancel.clone();
            let limit = Duration::from_secs(self.config.health_timeout_secs);
            labels.push(check.clone());
            handles.push(tokio::spawn(async move {
                bounded(check, limit, token, async {
                    health::check_container_running(runtime.as_ref(), &container, &config).await
                })
                .await
            }));

            let check = format!("log-scan {}", name);
            let runtime = self.runtime.clone();
            let classifier = self.classifier.clone();
            let container = name.clone();
            let token = cancel.clone();
            let wait_secs = target.log_wait_secs;
            let limit = Duration::from_secs(self.config.log_timeout_secs);
            labels.push(check.clone());
            handles.push(tokio::spawn(async move {
                bounded(check, limit, token, async {
                    logs::scan_container_logs(
                        runtime.as_ref(),
                        &container,
                        wait_secs,
                        classifier.as_ref(),
                    )
                    .await
                })
                .await
            }));
        }

        if let Some(url) = &target.health_url {
            let check = format!("http-probe {}", url);
            let client = self.client.clone();
            let url = url.clone();
            let token = cancel.clone();
            let limit = Duration::from_secs(self.config.http_timeout_secs);
            labels.push(check.clone());
            handles.push(tokio::spawn(async move {
                bounded(check, limit, token, async {
                    http::probe_health_url(&client, &url).await
                })
                .await
            }));
        }

        {
            let check = "attestation".to_string();
            let client = self.client.clone();
            let config = self.config.clone();
            let policy = policy.cloned();
            let token = cancel.clone();
            let limit = Duration::from_secs(self.config.attestation_timeout_secs);
            labels.push(check.clone());
            handles.push(tokio::spawn(async move {
                bounded(check, limit, token, async {
                    attestation::poll_validator_active(&client, policy.as_ref(), &config).await
                })
                .await
            }));
        }

        let results = future::join_all(handles).await;

        let mut report = VerifyReport::default();
        for (check, result) in labels.into_iter().zip(results) {
            match result {
                Ok(outcome) => report.outcomes.push(outcome),
                Err(e) => {
                    tracing::error!("[Verifier] Check task panicked: {}: {}", check, e);
                    report.outcomes.push(CheckOutcome {
                        check,
                        result: Err(VerifyError::Runtime(format!("check task panicked: {}", e))),
                    });
                }
            }
        }

        tracing::info!(
            "[Verifier] {} of {} check(s) passed for {}",
            report.passed_count(),
            report.outcomes.len(),
            target.package
        );
        report
    }
}
