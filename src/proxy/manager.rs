//! Management endpoints: status page and strategy toggle.
//!
//! Presentation only; both operate on the same shared routing state as the
//! dispatcher. `/chgmode` persists the switched mode back to the
//! configuration file so it survives the next reload cycle and a restart.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::config::loader;
use crate::health::HealthRecord;
use crate::proxy::server::AppState;
use crate::routing::RoutingTable;

/// Render the current routing state as a small HTML status page.
pub async fn manager_page(State(state): State<AppState>) -> Html<String> {
    let table = state.shared.table.load_full();

    let mut page = String::from(
        "<html><head><title>SLB Server Status</title>\
         <meta http-equiv=\"pragma\" content=\"no-cache\">\
         <meta http-equiv=\"cache-control\" content=\"no-cache\">\
         <meta http-equiv=\"expires\" content=\"0\"></head><body>",
    );
    page.push_str(&format!(
        "SLB server is running on port <b>{}</b> in mode <b>{}</b>",
        table.listen_port, table.mode
    ));
    page.push_str("<form action=\"/chgmode\"><input type=\"submit\" value=\"Mode-Switch\"></form>");

    if !table.servers.is_empty() {
        page.push_str(&pool_section("Servers", &table.servers, &table.server_health));
    }
    for (route, health) in table.routes.iter().zip(&table.route_health) {
        page.push_str(&pool_section(&route.route, &route.endpoints, health));
    }

    page.push_str("</body></html>");
    Html(page)
}

fn pool_section(title: &str, endpoints: &[String], health: &[HealthRecord]) -> String {
    let mut section = format!(
        "<h3>{title}</h3><table border=2><tr><td>Backend URL</td><td>Delay</td></tr>"
    );
    for (endpoint, record) in endpoints.iter().zip(health) {
        section.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>",
            endpoint, record.latency_ms
        ));
    }
    section.push_str("</table>");
    section
}

/// Cycle the selection strategy, persist it, and publish it immediately.
pub async fn change_mode(State(state): State<AppState>) -> Response {
    let table = state.shared.table.load_full();
    let next = table.mode.next();

    // Persist first so the toggle survives the next reload cycle.
    let path = &state.settings.config_path;
    let mut config = match loader::load_config(path) {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(error = %error, path = ?path, "mode toggle failed: cannot load config");
            return (StatusCode::INTERNAL_SERVER_ERROR, "failed to persist mode change")
                .into_response();
        }
    };
    config.mode = next.label().to_string();
    if let Err(error) = loader::persist_config(path, &config).await {
        tracing::error!(error = %error, path = ?path, "mode toggle failed: cannot persist config");
        return (StatusCode::INTERNAL_SERVER_ERROR, "failed to persist mode change")
            .into_response();
    }

    // Patch the live snapshot so the very next request selects with the
    // new strategy instead of waiting a reload cycle.
    state.shared.table.rcu(|current| {
        let mut table = RoutingTable::clone(current);
        table.mode = next;
        table
    });

    tracing::info!(mode = %next, "selection mode switched");
    Redirect::temporary("/manager").into_response()
}
