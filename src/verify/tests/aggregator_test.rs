//! Tests for the check runner: independent execution, aggregation of
//! failures, per-check time ceilings and cancellation.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use verify::config::VerifyConfig;
use verify::{ContainerRuntime, ContainerStatus, LogQuery, Verifier, VerifyError, VerifyTarget};

/// Runtime with a fixed status and log text per container. `status_delay`
/// makes every status call slow, for timeout and cancellation tests.
struct FixtureRuntime {
    statuses: HashMap<String, ContainerStatus>,
    logs: HashMap<String, String>,
    status_delay: Option<Duration>,
    status_calls: Mutex<HashMap<String, u32>>,
}

impl FixtureRuntime {
    fn new() -> Self {
        Self {
            statuses: HashMap::new(),
            logs: HashMap::new(),
            status_delay: None,
            status_calls: Mutex::new(HashMap::new()),
        }
    }

    fn container(mut self, name: &str, status: ContainerStatus, logs: &str) -> Self {
        self.statuses.insert(name.to_string(), status);
        self.logs.insert(name.to_string(), logs.to_string());
        self
    }

    fn slow_status(mut self, delay: Duration) -> Self {
        self.status_delay = Some(delay);
        self
    }

    fn status_calls(&self, name: &str) -> u32 {
        *self.status_calls.lock().unwrap().get(name).unwrap_or(&0)
    }
}

#[async_trait]
impl ContainerRuntime for FixtureRuntime {
    async fn status(&self, name: &str) -> verify::Result<ContainerStatus> {
        *self
            .status_calls
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_insert(0) += 1;
        if let Some(delay) = self.status_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self
            .statuses
            .get(name)
            .cloned()
            .unwrap_or(ContainerStatus::Running))
    }

    async fn logs(&self, name: &str, _query: &LogQuery) -> verify::Result<String> {
        Ok(self.logs.get(name).cloned().unwrap_or_default())
    }
}

/// Minimal HTTP server answering every request with a fixed status.
async fn start_mock_http(status: u16) -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        loop {
            let (mut stream, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => break,
            };

            tokio::spawn(async move {
                use tokio::io::{AsyncReadExt, AsyncWriteExt};

                let mut buf = vec![0u8; 4096];
                let _ = stream.read(&mut buf).await;

                let body = "ok";
                let response = format!(
                    "HTTP/1.1 {} {}\r\n\
                     Content-Type: text/plain\r\n\
                     Content-Length: {}\r\n\
                     Connection: close\r\n\
                     \r\n\
                     {}",
                    status,
                    if status < 400 { "OK" } else { "Error" },
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.flush().await;
            });
        }
    });

    (addr, handle)
}

fn fast_config() -> VerifyConfig {
    VerifyConfig {
        health_rounds: 2,
        health_interval_secs: 0,
        attestation_interval_secs: 0,
        ..VerifyConfig::default()
    }
}

fn target(containers: &[&str], health_url: Option<String>) -> VerifyTarget {
    VerifyTarget {
        package: "mypackage.dnp.dappnet.eth".to_string(),
        containers: containers.iter().map(|s| s.to_string()).collect(),
        health_url,
        log_wait_secs: 0,
    }
}

#[tokio::test]
async fn test_every_check_runs_and_failures_aggregate() {
    let runtime = Arc::new(
        FixtureRuntime::new()
            .container(
                "dappnet-pkg-bad",
                ContainerStatus::NotRunning("exited".to_string()),
                "clean\n",
            )
            .container("dappnet-pkg-good", ContainerStatus::Running, "clean\n"),
    );
    let (addr, _server) = start_mock_http(500).await;
    let health_url = format!("http://{}/health", addr);

    let verifier = Verifier::new(runtime.clone(), reqwest::Client::new(), fast_config());
    let report = verifier
        .run_checks(
            &target(&["dappnet-pkg-bad", "dappnet-pkg-good"], Some(health_url)),
            None,
            &CancellationToken::new(),
        )
        .await;

    // health + log scan per container, http probe, attestation
    assert_eq!(report.outcomes.len(), 6);

    let failures = report.failures();
    assert_eq!(failures.len(), 2, "failures: {:?}", failures);
    assert!(failures.iter().any(|f| f.contains("dappnet-pkg-bad")));
    assert!(failures.iter().any(|f| f.starts_with("http-probe")));

    // the passing container's health check really ran, all rounds of it
    assert_eq!(runtime.status_calls("dappnet-pkg-good"), 2);

    let err = report.into_result().unwrap_err();
    let message = err.to_string();
    assert!(
        message.contains("2 verification check(s) failed"),
        "got: {}",
        message
    );
    assert!(message.contains("dappnet-pkg-bad"), "got: {}", message);
    assert!(message.contains("http-probe"), "got: {}", message);
}

#[tokio::test]
async fn test_http_probe_is_skipped_without_a_url() {
    let runtime = Arc::new(FixtureRuntime::new().container(
        "dappnet-pkg-geth",
        ContainerStatus::Running,
        "clean\n",
    ));

    let verifier = Verifier::new(runtime, reqwest::Client::new(), fast_config());
    let report = verifier
        .run_checks(
            &target(&["dappnet-pkg-geth"], None),
            None,
            &CancellationToken::new(),
        )
        .await;

    assert_eq!(report.outcomes.len(), 3);
    assert!(report
        .outcomes
        .iter()
        .all(|o| !o.check.starts_with("http-probe")));
    assert!(report.into_result().is_ok());
}

#[tokio::test]
async fn test_log_errors_do_not_block_other_checks() {
    let runtime = Arc::new(FixtureRuntime::new().container(
        "dappnet-pkg-geth",
        ContainerStatus::Running,
        "synced\nERROR dial tcp refused\n",
    ));
    let (addr, _server) = start_mock_http(200).await;

    let verifier = Verifier::new(runtime, reqwest::Client::new(), fast_config());
    let report = verifier
        .run_checks(
            &target(
                &["dappnet-pkg-geth"],
                Some(format!("http://{}/health", addr)),
            ),
            None,
            &CancellationToken::new(),
        )
        .await;

    let failures = report.failures();
    assert_eq!(failures.len(), 1, "failures: {:?}", failures);
    assert!(failures[0].starts_with("log-scan"));
    assert!(failures[0].contains("dial tcp refused"));
    assert_eq!(report.passed_count(), 3);
}

#[tokio::test]
async fn test_slow_check_times_out_as_a_failure() {
    let runtime = Arc::new(
        FixtureRuntime::new()
            .container("dappnet-pkg-geth", ContainerStatus::Running, "clean\n")
            .slow_status(Duration::from_secs(10)),
    );
    let config = VerifyConfig {
        health_timeout_secs: 1,
        ..fast_config()
    };

    let verifier = Verifier::new(runtime, reqwest::Client::new(), config);
    let report = verifier
        .run_checks(
            &target(&["dappnet-pkg-geth"], None),
            None,
            &CancellationToken::new(),
        )
        .await;

    let failures = report.failures();
    assert_eq!(failures.len(), 1, "failures: {:?}", failures);
    assert!(failures[0].starts_with("container-health"));
    assert!(failures[0].contains("exceeded 1s"), "got: {}", failures[0]);

    let health = report
        .outcomes
        .iter()
        .find(|o| o.check.starts_with("container-health"))
        .unwrap();
    assert!(matches!(
        health.result,
        Err(VerifyError::Timeout(_))
    ));
}

#[tokio::test]
async fn test_cancellation_surfaces_as_check_failure() {
    let runtime = Arc::new(
        FixtureRuntime::new()
            .container("dappnet-pkg-geth", ContainerStatus::Running, "clean\n")
            .slow_status(Duration::from_secs(30)),
    );

    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let verifier = Verifier::new(runtime, reqwest::Client::new(), fast_config());
    let start = Instant::now();
    let report = verifier
        .run_checks(&target(&["dappnet-pkg-geth"], None), None, &cancel)
        .await;

    assert!(
        start.elapsed() < Duration::from_secs(5),
        "cancellation must not wait out the full check"
    );
    let health = report
        .outcomes
        .iter()
        .find(|o| o.check.starts_with("container-health"))
        .unwrap();
    assert!(matches!(health.result, Err(VerifyError::Cancelled(_))));
}
