//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured logging via tracing; level configurable through RUST_LOG
//! - Metric updates are cheap atomic operations; the exporter is optional
//!   and its absence turns recording into a no-op

pub mod logging;
pub mod metrics;
