//! Request dispatch and router construction.
//!
//! # Responsibilities
//! - Hold the shared routing state handed to every handler
//! - Build the Axum router with the proxy wildcard and manager routes
//! - Dispatch: snapshot load → route resolution → backend selection →
//!   forward → relay
//! - Map every failure mode to an explicit response (404 / 502 / 503 / 504)

use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::balance::{PoolView, RotationCounters};
use crate::config::schema::Settings;
use crate::observability::metrics;
use crate::proxy::forward::{forward, HttpClient, ProxyError};
use crate::proxy::manager;
use crate::proxy::request_id::UuidRequestId;
use crate::routing::{resolve, RoutingTable};

/// Routing state shared between the dispatcher, the coordinator and the
/// manager endpoints.
///
/// The table is swapped whole on publish; the rotation counters live here
/// so they survive the swap.
#[derive(Debug, Default)]
pub struct SharedRouting {
    pub table: ArcSwap<RoutingTable>,
    pub counters: RotationCounters,
}

impl SharedRouting {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedRouting>,
    pub client: HttpClient,
    pub settings: Settings,
}

/// Build the Axum router served by every listener.
pub fn build_router(state: AppState) -> Router {
    let request_timeout = state.settings.request_timeout;
    Router::new()
        .route("/manager", get(manager::manager_page))
        .route("/chgmode", get(manager::change_mode))
        .route("/", any(dispatch))
        .route("/{*path}", any(dispatch))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}

/// Per-request entry point.
///
/// Loads one snapshot at request start and uses it for the request's whole
/// lifetime; a reload landing mid-flight is observed only by later
/// requests.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let started = Instant::now();
    let table = state.shared.table.load_full();

    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let Some(key) = resolve(&table, &path) else {
        tracing::warn!(method = %method, path = %path, "no route for request");
        metrics::record_request(&method, StatusCode::NOT_FOUND.as_u16(), "none", started);
        return (StatusCode::NOT_FOUND, "no matching route").into_response();
    };

    let Some((endpoints, health)) = table.pool(key) else {
        // resolve only hands out keys valid for this table
        metrics::record_request(&method, StatusCode::NOT_FOUND.as_u16(), "none", started);
        return (StatusCode::NOT_FOUND, "no matching route").into_response();
    };

    let counter = state.shared.counters.counter(key);
    let pool = PoolView {
        endpoints,
        health,
        counter: counter.as_ref(),
    };

    let Some(index) = table.mode.strategy().select(&pool) else {
        tracing::warn!(method = %method, path = %path, pool = %key, "every backend in pool unreachable");
        metrics::record_request(
            &method,
            StatusCode::SERVICE_UNAVAILABLE.as_u16(),
            "none",
            started,
        );
        return (StatusCode::SERVICE_UNAVAILABLE, "no reachable backend").into_response();
    };

    let target = endpoints[index].clone();
    tracing::debug!(
        method = %method,
        path = %path,
        backend = %target,
        mode = %table.mode,
        "forwarding request"
    );

    match forward(&state.client, &target, request, state.settings.upstream_timeout).await {
        Ok(response) => {
            metrics::record_request(&method, response.status().as_u16(), &target, started);
            response.into_response()
        }
        Err(ProxyError::Timeout) => {
            tracing::error!(backend = %target, path = %path, "upstream timed out");
            metrics::record_request(
                &method,
                StatusCode::GATEWAY_TIMEOUT.as_u16(),
                &target,
                started,
            );
            (StatusCode::GATEWAY_TIMEOUT, "upstream timed out").into_response()
        }
        Err(error) => {
            tracing::error!(backend = %target, path = %path, error = %error, "upstream request failed");
            metrics::record_request(&method, StatusCode::BAD_GATEWAY.as_u16(), &target, started);
            (StatusCode::BAD_GATEWAY, "upstream request failed").into_response()
        }
    }
}
