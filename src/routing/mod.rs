//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Reload cycle:
//!     SlbConfig + probe results
//!     → table.rs (assemble immutable RoutingTable)
//!     → published whole via ArcSwap
//!
//! Per request:
//!     snapshot loaded once at request start
//!     → matcher.rs (first path segment → pool key)
//!     → balance (select index within pool)
//! ```
//!
//! # Design Decisions
//! - The table is immutable after assembly; a reload publishes a whole new
//!   value instead of mutating fields readers can observe
//! - Each request keeps its snapshot for its entire lifetime, so a reload
//!   mid-flight never shows it a half-updated table
//! - Republishing is driven by configuration content and reachability
//!   flips, not by latency jitter

pub mod matcher;
pub mod table;

pub use matcher::{first_segment, resolve};
pub use table::RoutingTable;
