/// HTTP endpoint for the dashboard
///
/// Serves the same fields the page shows, as JSON.
///
/// Endpoints:
/// - GET  /health                  - Service health check
/// - GET  /stations                - Station registry and current selection
/// - GET  /dashboard               - Current river panel and tide list
/// - POST /stations/{id}/select    - Switch the river panel to a station
/// - GET  /river/{id}              - One-shot load of a station's panel
/// - POST /refresh                 - Reload both panels

use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::dashboard::Dashboard;
use crate::logging::{self, DataSource};
use crate::model::ReadingError;

// ---------------------------------------------------------------------------
// Response Types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct StationSummary {
    pub id: String,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub selected: String,
    pub stations: Vec<StationSummary>,
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// A routed response: status code and JSON body.
pub type RouteResponse = (u16, serde_json::Value);

fn to_json<T: Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or_else(|e| json!({ "error": e.to_string() }))
}

fn not_found() -> RouteResponse {
    (
        404,
        json!({
            "error": "Not found",
            "available_endpoints": [
                "GET /health",
                "GET /stations",
                "GET /dashboard",
                "POST /stations/{id}/select",
                "GET /river/{id}",
                "POST /refresh"
            ]
        }),
    )
}

fn station_error(id: &str, err: &ReadingError) -> RouteResponse {
    (404, json!({ "error": err.to_string(), "station_id": id }))
}

fn decode_id(raw: &str) -> Option<String> {
    let id = urlencoding::decode(raw).ok()?.into_owned();
    (!id.is_empty() && !id.contains('/')).then_some(id)
}

/// Routes one request. Query strings are ignored.
pub fn route(dashboard: &Dashboard, method: &str, url: &str) -> RouteResponse {
    let path = url.split('?').next().unwrap_or_default();

    match (method, path) {
        ("GET", "/health") => handle_health(),
        ("GET", "/stations") => handle_stations(dashboard),
        ("GET", "/dashboard") => (200, to_json(&dashboard.snapshot())),
        ("POST", "/refresh") => {
            let ticket = dashboard.load_all();
            (202, json!({ "refreshing": true, "epoch": ticket.epoch }))
        }
        ("POST", p) => match p
            .strip_prefix("/stations/")
            .and_then(|rest| rest.strip_suffix("/select"))
            .and_then(decode_id)
        {
            Some(id) => handle_select(dashboard, &id),
            None => not_found(),
        },
        ("GET", p) => match p.strip_prefix("/river/").and_then(decode_id) {
            Some(id) => handle_river_query(dashboard, &id),
            None => not_found(),
        },
        _ => not_found(),
    }
}

/// Handle /health endpoint
fn handle_health() -> RouteResponse {
    (
        200,
        json!({
            "status": "ok",
            "service": "riverwatch_service",
            "version": env!("CARGO_PKG_VERSION")
        }),
    )
}

fn handle_stations(dashboard: &Dashboard) -> RouteResponse {
    let response = StationsResponse {
        selected: dashboard.snapshot().station_id,
        stations: dashboard
            .stations()
            .iter()
            .map(|s| StationSummary {
                id: s.id.clone(),
                name: s.name.clone(),
                url: s.url.clone(),
            })
            .collect(),
    };
    (200, to_json(&response))
}

fn handle_select(dashboard: &Dashboard, id: &str) -> RouteResponse {
    match dashboard.select_station(id) {
        Ok(ticket) => (202, json!({ "selected": ticket.station_id, "epoch": ticket.epoch })),
        Err(e) => station_error(id, &e),
    }
}

fn handle_river_query(dashboard: &Dashboard, id: &str) -> RouteResponse {
    match dashboard.query_station(id) {
        Ok(panel) => (200, json!({ "station_id": id, "river": to_json(&panel) })),
        Err(e) => station_error(id, &e),
    }
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Create HTTP response with JSON body
fn create_response(status_code: u16, json: &serde_json::Value) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let body = serde_json::to_string_pretty(json).unwrap_or_else(|_| "{}".to_string());
    let response = tiny_http::Response::from_data(body.into_bytes())
        .with_status_code(tiny_http::StatusCode::from(status_code));

    match tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        Ok(header) => response.with_header(header),
        Err(_) => response,
    }
}

/// Serves requests from an already-bound server until it is closed.
pub fn serve(server: tiny_http::Server, dashboard: Arc<Dashboard>) {
    for request in server.incoming_requests() {
        let method = request.method().to_string();
        let url = request.url().to_string();

        let (status, body) = route(&dashboard, &method, &url);
        logging::debug(DataSource::Endpoint, None, &format!("{} {} -> {}", method, url, status));

        if let Err(e) = request.respond(create_response(status, &body)) {
            logging::warn(DataSource::Endpoint, None, &format!("Failed to send response: {}", e));
        }
    }
}

/// Binds the endpoint on all interfaces. Hand the server to `serve`.
pub fn bind_endpoint(port: u16) -> Result<tiny_http::Server, String> {
    let server = tiny_http::Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| format!("Failed to start HTTP server on port {}: {}", port, e))?;

    logging::info(
        DataSource::Endpoint,
        None,
        &format!("HTTP endpoint listening on http://0.0.0.0:{}", port),
    );
    Ok(server)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
