//! Configuration hot-reload subsystem.
//!
//! # Data Flow
//! ```text
//! reloader.rs (infinite cycle):
//!     sleep interval elapsed
//!     → re-read config file
//!     → probe every backend in every pool
//!     → diff against last published table
//!     → on change: publish Arc<RoutingTable> on the update channel
//!
//! coordinator.rs (consumer):
//!     receives tables in publish order
//!     → reconciles rotation counters
//!     → swaps the shared ArcSwap snapshot
//!     → drives net::supervisor (listener restart on port change)
//! ```
//!
//! # Design Decisions
//! - Single-producer/single-consumer channel preserves publish order and
//!   never drops an update
//! - A reload-time parse failure keeps the last-known-good table serving;
//!   only the initial startup load is fatal
//! - Republish on config content change or a reachability flip; latency
//!   jitter alone republishes nothing, so listeners never churn on it

pub mod coordinator;
pub mod reloader;

pub use coordinator::run_coordinator;
pub use reloader::ConfigReloader;
