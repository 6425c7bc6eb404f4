//! Active health probing.

use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use tokio::time;

use crate::health::state::HealthRecord;

/// Path probed on every backend.
pub const HEALTH_CHECK_PATH: &str = "/healthck";

/// Body a backend must answer with to count as reachable.
pub const HEALTH_CHECK_BODY: &str = "ok";

/// Issues bounded health checks against backend addresses.
///
/// A backend is reachable only when `GET <backend>/healthck` answers 200
/// with a body of exactly `ok` within the timeout.
pub struct Prober {
    client: Client<HttpConnector, Body>,
    timeout: Duration,
}

impl Prober {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { client, timeout }
    }

    /// Probe a single backend. Never retries, never returns an error.
    pub async fn probe(&self, backend: &str) -> HealthRecord {
        let uri = format!("{}{}", backend.trim_end_matches('/'), HEALTH_CHECK_PATH);
        let started = Instant::now();

        let request = match Request::builder()
            .method("GET")
            .uri(uri.as_str())
            .header(header::USER_AGENT, "slb-proxy-health-probe")
            .body(Body::empty())
        {
            Ok(request) => request,
            Err(error) => {
                tracing::warn!(backend = %backend, error = %error, "health probe skipped: bad address");
                return HealthRecord::unreachable();
            }
        };

        let response = match time::timeout(self.timeout, self.client.request(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(error)) => {
                tracing::warn!(backend = %backend, error = %error, "health probe failed: connection error");
                return HealthRecord::unreachable();
            }
            Err(_) => {
                tracing::warn!(backend = %backend, timeout = ?self.timeout, "health probe failed: timeout");
                return HealthRecord::unreachable();
            }
        };

        if response.status() != StatusCode::OK {
            tracing::warn!(backend = %backend, status = %response.status(), "health probe failed: non-OK status");
            return HealthRecord::unreachable();
        }

        match axum::body::to_bytes(Body::new(response.into_body()), 4096).await {
            Ok(bytes) if bytes.as_ref() == HEALTH_CHECK_BODY.as_bytes() => {
                // Clamp to 1ms so loopback-fast backends stay visible to
                // least-latency selection, which ignores latency <= 0.
                let latency_ms = (started.elapsed().as_millis() as i64).max(1);
                HealthRecord::reachable(latency_ms)
            }
            Ok(_) => {
                tracing::warn!(backend = %backend, "health probe failed: unexpected body");
                HealthRecord::unreachable()
            }
            Err(error) => {
                tracing::warn!(backend = %backend, error = %error, "health probe failed: body read error");
                HealthRecord::unreachable()
            }
        }
    }
}
