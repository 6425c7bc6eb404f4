//! Request-to-pool resolution.
//!
//! # Design Decisions
//! - Routing is on the first path segment only, so `/orders/123` and
//!   `/orders` land on the same route
//! - A non-empty top-level server list takes precedence over all routes
//! - No match is an explicit `None`, which the dispatcher turns into a 404
//!   response rather than leaving the client hanging

use crate::balance::ListKey;
use crate::routing::table::RoutingTable;

/// First path segment of a request path or route prefix, without slashes.
/// `/orders/123` → `orders`; `/` → ``.
pub fn first_segment(path: &str) -> &str {
    path.trim_start_matches('/')
        .split('/')
        .next()
        .unwrap_or("")
}

/// Resolve a request path to the pool that should serve it.
pub fn resolve(table: &RoutingTable, path: &str) -> Option<ListKey> {
    if !table.servers.is_empty() {
        return Some(ListKey::Servers);
    }

    let segment = first_segment(path);
    if segment.is_empty() {
        return None;
    }

    table
        .routes
        .iter()
        .position(|route| first_segment(&route.route) == segment)
        .map(ListKey::Route)
}
