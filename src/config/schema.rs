//! Configuration schema definitions.
//!
//! `SlbConfig` is the on-disk record the reload cycle re-reads every
//! interval; `Settings` is process configuration fixed at startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Backend substituted when a configuration names no servers and no routes.
pub const DEFAULT_BACKEND: &str = "http://127.0.0.1:8000";

/// Listen port used when the configured port is empty.
pub const DEFAULT_PORT: &str = "8080";

/// The balancer configuration as stored on disk.
///
/// Every field is optional; an empty `{}` document yields a config that
/// serves the built-in default backend on the default port.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SlbConfig {
    /// Top-level backend pool. When non-empty, all requests are balanced
    /// across it and `routes` is ignored.
    pub servers: Vec<String>,

    /// Path-prefix routes, each with its own backend pool. Consulted only
    /// when `servers` is empty.
    pub routes: Vec<RouteConfig>,

    /// Listen port as a bare port string (e.g. `"8080"`).
    pub port: String,

    /// Selection strategy label: `roundrobin`, `random` or `best`.
    pub mode: String,
}

/// A path prefix mapped to an ordered backend pool.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Path prefix, e.g. `/orders`. Matching is on the first path segment.
    pub route: String,

    /// Backend addresses for this route.
    pub endpoints: Vec<String>,
}

impl SlbConfig {
    /// Apply the documented fallbacks: an empty port becomes
    /// [`DEFAULT_PORT`], and a configuration with neither servers nor
    /// routes is given the single built-in [`DEFAULT_BACKEND`].
    pub fn normalize(mut self) -> Self {
        if self.port.is_empty() {
            self.port = DEFAULT_PORT.to_string();
        }
        if self.servers.is_empty() && self.routes.is_empty() {
            tracing::warn!(
                backend = DEFAULT_BACKEND,
                "configuration names no backends, substituting built-in default"
            );
            self.servers.push(DEFAULT_BACKEND.to_string());
        }
        self
    }
}

/// Process configuration, fixed for the lifetime of the process.
///
/// Changing any of these requires a restart; the reload cycle only picks up
/// changes to the [`SlbConfig`] file.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Path of the JSON configuration file re-read every reload cycle.
    pub config_path: PathBuf,

    /// Sleep between reload/probe cycles.
    pub reload_interval: Duration,

    /// Per-backend health probe timeout.
    pub probe_timeout: Duration,

    /// Inbound request timeout enforced on the listener.
    pub request_timeout: Duration,

    /// Timeout for the proxied upstream call.
    pub upstream_timeout: Duration,

    /// Optional Prometheus exporter bind address.
    pub metrics_address: Option<SocketAddr>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("./slb.json"),
            reload_interval: Duration::from_secs(120),
            probe_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
            upstream_timeout: Duration::from_secs(30),
            metrics_address: None,
        }
    }
}
