//! Tests for the host alias readiness probe.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use envsync::{probe, EnvSyncError};
use tokio::net::TcpListener;

/// Minimal HTTP server answering every request with a fixed status.
async fn start_mock_alias(
    status: u16,
) -> (SocketAddr, Arc<AtomicU32>, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicU32::new(0));
    let hits_in_server = hits.clone();

    let handle = tokio::spawn(async move {
        loop {
            let (mut stream, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => break,
            };

            hits_in_server.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                use tokio::io::{AsyncReadExt, AsyncWriteExt};

                let mut buf = vec![0u8; 4096];
                let _ = stream.read(&mut buf).await;

                let body = "pong";
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

    (addr, hits, handle)
}

#[tokio::test]
async fn test_alias_probe_succeeds_on_2xx() {
    let (addr, hits, _server) = start_mock_alias(200).await;
    let url = format!("http://{}/ping", addr);

    probe::check_host_alias(&reqwest::Client::new(), &url)
        .await
        .unwrap();

    // single shot, no retries
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_alias_probe_rejects_non_2xx() {
    let (addr, hits, _server) = start_mock_alias(503).await;
    let url = format!("http://{}/ping", addr);

    let err = probe::check_host_alias(&reqwest::Client::new(), &url)
        .await
        .unwrap_err();

    assert!(matches!(err, EnvSyncError::EnvironmentNotReady(_)));
    assert!(err.to_string().contains("503"), "got: {}", err);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_alias_probe_reports_unreachable_host() {
    // Bind then drop a listener so the port is known to refuse connections.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = format!("http://{}/ping", addr);
    let err = probe::check_host_alias(&reqwest::Client::new(), &url)
        .await
        .unwrap_err();

    assert!(matches!(err, EnvSyncError::EnvironmentNotReady(_)));
    assert!(err.to_string().contains("unreachable"), "got: {}", err);
}
