//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (JSON)
//!     → loader.rs (parse & deserialize)
//!     → SlbConfig (plain on-disk record)
//!     → normalize() (fallback backend, default port)
//!     → consumed by the reload cycle, which probes health and
//!       assembles the published RoutingTable
//!
//! On mode toggle (/chgmode):
//!     loader.rs re-reads the file
//!     → mode field rewritten
//!     → loader.rs persists the file (pretty JSON)
//!     → live snapshot patched in place via ArcSwap
//! ```
//!
//! # Design Decisions
//! - The on-disk record keeps the minimal historical shape
//!   (`servers`/`routes`/`port`/`mode`); everything else is process
//!   configuration supplied at startup
//! - All fields have defaults so an empty `{}` file is valid
//! - A reload-time parse failure never replaces the active table; only the
//!   initial startup load is fatal

pub mod loader;
pub mod schema;

pub use loader::{load_config, persist_config, ConfigError};
pub use schema::{RouteConfig, Settings, SlbConfig};
