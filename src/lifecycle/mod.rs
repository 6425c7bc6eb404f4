//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Fail-fast config load → shared state → spawn reloader + coordinator
//!
//! Shutdown (shutdown.rs):
//!     Signal received → broadcast → reloader, coordinator and every
//!     listener exit their loops → join barrier completes
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - A corrupt config at startup is fatal; at runtime the last-known-good
//!   table keeps serving
//! - The process exits only after every long-running task has joined

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{launch, App, StartupError};
