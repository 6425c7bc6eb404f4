//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use slb_proxy::Settings;

/// Start a mock backend that answers the health check contract on
/// `/healthck` and echoes `name` for every other path.
pub async fn start_backend(name: &'static str, healthy: bool) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 2048];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let head = String::from_utf8_lossy(&buf[..n]).to_string();
                        let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();

                        let (status, body) = if path == "/healthck" {
                            if healthy {
                                ("200 OK", "ok".to_string())
                            } else {
                                ("500 Internal Server Error", "down".to_string())
                            }
                        } else {
                            ("200 OK", name.to_string())
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a mock backend whose health-check result can be flipped at
/// runtime. Normal paths keep answering regardless of the flag.
#[allow(dead_code)]
pub async fn start_toggle_backend(
    name: &'static str,
    healthy: std::sync::Arc<std::sync::atomic::AtomicBool>,
) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let healthy = healthy.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 2048];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let head = String::from_utf8_lossy(&buf[..n]).to_string();
                        let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();

                        let (status, body) = if path == "/healthck" {
                            if healthy.load(std::sync::atomic::Ordering::SeqCst) {
                                ("200 OK", "ok".to_string())
                            } else {
                                ("500 Internal Server Error", "down".to_string())
                            }
                        } else {
                            ("200 OK", name.to_string())
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a mock backend that serves exactly `connections` connections,
/// then closes its listening socket.
#[allow(dead_code)]
pub async fn start_backend_serving_n(name: &'static str, connections: usize) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        for _ in 0..connections {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let mut buf = vec![0u8; 2048];
            let n = socket.read(&mut buf).await.unwrap_or(0);
            let head = String::from_utf8_lossy(&buf[..n]).to_string();
            let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
            let body = if path == "/healthck" { "ok" } else { name };
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    addr
}

/// Reserve an address nothing listens on (bind then drop).
#[allow(dead_code)]
pub async fn dead_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Write a configuration file to a unique temp path and return the path.
pub fn write_config(tag: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "slb-proxy-test-{tag}-{}.json",
        std::process::id()
    ));
    std::fs::write(&path, contents).unwrap();
    path
}

/// Test settings with a fast reload cycle.
pub fn test_settings(config_path: PathBuf) -> Settings {
    Settings {
        config_path,
        reload_interval: Duration::from_secs(1),
        probe_timeout: Duration::from_secs(2),
        request_timeout: Duration::from_secs(5),
        upstream_timeout: Duration::from_secs(5),
        metrics_address: None,
    }
}

/// A reqwest client that never reuses pooled connections, so a retired
/// listener cannot answer through a kept-alive socket.
#[allow(dead_code)]
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
