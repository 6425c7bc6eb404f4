//! HTTP proxying subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request (via net::supervisor's listener)
//!     → server.rs (dispatch: snapshot load, route resolution, selection)
//!     → forward.rs (URI/Host rewrite, bounded upstream call)
//!     → response relayed verbatim to the client
//!
//! /manager  → manager.rs (render snapshot state)
//! /chgmode  → manager.rs (toggle strategy, persist, republish)
//! ```

pub mod forward;
pub mod manager;
pub mod request_id;
pub mod server;

pub use server::{build_router, AppState, SharedRouting};
