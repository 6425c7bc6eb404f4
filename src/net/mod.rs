//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Coordinator observes a published RoutingTable
//!     → supervisor.rs (ensure a listener is bound to its port)
//!     → unchanged port: no-op
//!     → changed port: retire the old listener (graceful drain),
//!       bind and spawn the new one
//!
//! Listener task:
//!     axum::serve(listener, proxy router)
//!     → drains on retire signal or process shutdown
//! ```
//!
//! # Design Decisions
//! - The supervisor is owned by the coordinator task alone, so listener
//!   bookkeeping needs no lock
//! - Retired listeners drain in the background; their join handles are kept
//!   so process shutdown can await every task

pub mod supervisor;

pub use supervisor::{ListenerError, ListenerSupervisor};
