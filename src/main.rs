use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use slb_proxy::lifecycle::{launch, signals, Shutdown};
use slb_proxy::observability::{logging, metrics};
use slb_proxy::Settings;

/// Health-aware HTTP load balancer with hot configuration reload.
#[derive(Debug, Parser)]
#[command(name = "slb-proxy", version)]
struct Args {
    /// Path to the JSON configuration file.
    #[arg(default_value = "./slb.json")]
    config: PathBuf,

    /// Seconds between configuration reload / health probe cycles.
    #[arg(long, default_value_t = 120)]
    reload_interval_secs: u64,

    /// Per-backend health probe timeout in seconds.
    #[arg(long, default_value_t = 5)]
    probe_timeout_secs: u64,

    /// Inbound request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    request_timeout_secs: u64,

    /// Timeout for the proxied upstream call in seconds.
    #[arg(long, default_value_t = 30)]
    upstream_timeout_secs: u64,

    /// Optional Prometheus exporter bind address (e.g. 0.0.0.0:9090).
    #[arg(long)]
    metrics_address: Option<SocketAddr>,
}

impl From<Args> for Settings {
    fn from(args: Args) -> Self {
        Self {
            config_path: args.config,
            reload_interval: Duration::from_secs(args.reload_interval_secs),
            probe_timeout: Duration::from_secs(args.probe_timeout_secs),
            request_timeout: Duration::from_secs(args.request_timeout_secs),
            upstream_timeout: Duration::from_secs(args.upstream_timeout_secs),
            metrics_address: args.metrics_address,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init("slb_proxy=debug,tower_http=debug");

    let settings: Settings = Args::parse().into();

    tracing::info!(
        config = ?settings.config_path,
        reload_interval = ?settings.reload_interval,
        "slb-proxy starting"
    );

    if let Some(address) = settings.metrics_address {
        metrics::init(address);
    }

    let shutdown = Shutdown::new();
    let app = launch(settings, &shutdown)?;

    signals::wait_for_signal().await;
    shutdown.trigger();

    app.join().await;
    tracing::info!("shutdown complete");
    Ok(())
}
