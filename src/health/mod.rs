//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Reload cycle (reload::reloader):
//!     Every backend in every pool
//!     → probe.rs (bounded GET /healthck)
//!     → HealthRecord { reachable, latency_ms }
//!     → baked into the next RoutingTable snapshot
//! ```
//!
//! # Design Decisions
//! - A probe never retries and never propagates an error: every failure
//!   mode (connect error, non-200, wrong body, timeout) collapses into an
//!   unreachable record
//! - Latency is wall-clock from request start to body completion and is
//!   recorded on success only
//! - Health state lives inside the immutable snapshot, so readers never
//!   observe a half-updated record

pub mod probe;
pub mod state;

pub use probe::Prober;
pub use state::HealthRecord;
