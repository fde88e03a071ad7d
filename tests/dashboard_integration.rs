/// Integration tests for the full load pipeline
///
/// These tests verify, against a local tiny_http server standing in for
/// the tide proxy and the river sources:
/// 1. HTTP fetch → interpret → render for tide and river panels
/// 2. Failure placeholders for HTTP errors and non-JSON bodies
/// 3. Station switching with a slow, superseded response
/// 4. The JSON endpoint serving the dashboard over real HTTP
///
/// No external network access is needed.
///
/// Run with: cargo test --test dashboard_integration

use riverwatch_service::config::{parse_config, RiverwatchConfig};
use riverwatch_service::dashboard::Dashboard;
use riverwatch_service::display;
use riverwatch_service::endpoint;
use riverwatch_service::ingest::http::{HttpSource, JsonSource};
use riverwatch_service::model::ReadingError;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Local source server
// ---------------------------------------------------------------------------

const TIDES: &str = r#"{
  "tides": [
    { "title": "High Tide", "time": "Tue 14 Oct 12:41" },
    { "title": "Low Tide", "time": "Tue 14 Oct 19:02" },
    { "title": "High Tide", "time": "Wed 15 Oct 01:05" }
  ]
}"#;

const DEE_LEVELS: &str = r#"{
  "levels": [
    { "record_date": "2026-10-14 09:00:00", "avg_level": "0.431" },
    { "record_date": "2026-10-14 08:45:00", "avg_level": "0.412" }
  ]
}"#;

const GAUGE_READINGS: &str = r#"{
  "readings": [
    { "date": "t1", "level": "2.0" },
    { "date": "t2", "level": "2.0" }
  ]
}"#;

fn respond(request: tiny_http::Request) {
    let (status, body): (u16, &str) = match request.url() {
        "/tides" => (200, TIDES),
        "/levels/dee" => (200, DEE_LEVELS),
        "/levels/gauge" => (200, GAUGE_READINGS),
        "/levels/slow" => {
            thread::sleep(Duration::from_millis(400));
            (200, DEE_LEVELS)
        }
        "/levels/empty" => (200, "[]"),
        "/levels/odd" => (200, r#"{ "foo": "bar" }"#),
        "/levels/html" => (200, "<html>maintenance</html>"),
        _ => (500, r#"{ "error": "boom" }"#),
    };
    let response = tiny_http::Response::from_string(body).with_status_code(status);
    let _ = request.respond(response);
}

/// Starts the stand-in source server and returns its base URL.
fn start_source_server() -> String {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("bind local source server");
    let addr = server.server_addr().to_ip().expect("tcp listener");

    thread::spawn(move || {
        for request in server.incoming_requests() {
            // each request on its own thread so a slow one does not block the rest
            thread::spawn(move || respond(request));
        }
    });

    format!("http://{}", addr)
}

fn config_for(base: &str) -> RiverwatchConfig {
    let text = format!(
        r#"
        [tides]
        url = "{base}/tides"
        max_entries = 2

        [service]
        request_timeout_secs = 5
        refresh_interval_minutes = 0

        [[station]]
        id = "dee"
        name = "River Dee"
        url = "{base}/levels/dee"
        order = "newest_first"

        [[station]]
        id = "gauge"
        name = "Gauge"
        url = "{base}/levels/gauge"

        [[station]]
        id = "slow"
        name = "Slow gauge"
        url = "{base}/levels/slow"
        order = "newest_first"

        [[station]]
        id = "empty"
        name = "Empty gauge"
        url = "{base}/levels/empty"

        [[station]]
        id = "odd"
        name = "Odd gauge"
        url = "{base}/levels/odd"

        [[station]]
        id = "html"
        name = "Maintenance page"
        url = "{base}/levels/html"

        [[station]]
        id = "down"
        name = "Broken gauge"
        url = "{base}/levels/down"
        "#
    );
    parse_config(&text).expect("test config should be valid")
}

/// Loopback client; proxies from the environment are bypassed.
fn local_source() -> HttpSource {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(5))
        .no_proxy()
        .build()
        .expect("http client");
    HttpSource::with_client(client)
}

fn dashboard_for(base: &str) -> Dashboard {
    Dashboard::new(config_for(base), Arc::new(local_source())).expect("test config should be valid")
}

// ---------------------------------------------------------------------------
// 1. Happy path
// ---------------------------------------------------------------------------

#[test]
fn test_http_source_parses_json_bodies() {
    let base = start_source_server();
    let source = local_source();

    let payload = source.fetch_json(&format!("{}/tides", base)).expect("tides should load");
    assert_eq!(payload["tides"].as_array().map(Vec::len), Some(3));
}

#[test]
fn test_load_all_renders_dee_and_capped_tides() {
    let base = start_source_server();
    let dashboard = dashboard_for(&base);

    dashboard.load_all();
    dashboard.wait();

    let snap = dashboard.snapshot();
    assert_eq!(snap.station_id, "dee");
    assert_eq!(snap.river.level, "0.43 m");
    assert_eq!(snap.river.time, "2026-10-14 09:00:00");
    assert_eq!(snap.river.trend, "Rising");
    assert_eq!(snap.river.chart.len(), 2);
    assert_eq!(snap.river.chart[0].label, "2026-10-14 08:45:00", "chart must be chronological");
    assert_eq!(
        snap.tides.items,
        vec!["High Tide — Tue 14 Oct 12:41", "Low Tide — Tue 14 Oct 19:02"]
    );
}

#[test]
fn test_query_station_steady_readings() {
    let base = start_source_server();
    let dashboard = dashboard_for(&base);

    let panel = dashboard.query_station("gauge").expect("gauge is registered");
    assert_eq!(panel.level, "2.00 m");
    assert_eq!(panel.trend, "Steady");
    assert_eq!(panel.time, "t2");
}

// ---------------------------------------------------------------------------
// 2. Failure placeholders
// ---------------------------------------------------------------------------

#[test]
fn test_empty_and_unrecognized_payloads() {
    let base = start_source_server();
    let dashboard = dashboard_for(&base);

    let empty = dashboard.query_station("empty").unwrap();
    assert_eq!(empty.level, "-- m");
    assert_eq!(empty.trend, display::NO_READINGS);

    let odd = dashboard.query_station("odd").unwrap();
    assert_eq!(odd.level, "--");
    assert!(odd.trend.starts_with("Unknown JSON format"));
}

#[test]
fn test_http_error_and_non_json_show_error_placeholder() {
    let base = start_source_server();
    let source = local_source();

    assert_eq!(
        source.fetch_json(&format!("{}/levels/down", base)),
        Err(ReadingError::HttpError(500))
    );
    assert!(matches!(
        source.fetch_json(&format!("{}/levels/html", base)),
        Err(ReadingError::ParseError(_))
    ));

    let dashboard = dashboard_for(&base);
    assert_eq!(dashboard.query_station("down").unwrap().level, display::LEVEL_ERROR);
    assert_eq!(dashboard.query_station("html").unwrap().level, display::LEVEL_ERROR);
}

#[test]
fn test_broken_tide_source_shows_error_item() {
    let base = start_source_server();
    let mut config = config_for(&base);
    config.tides.url = format!("{}/no-such-tides", base);
    let dashboard = Dashboard::new(config, Arc::new(local_source())).unwrap();

    dashboard.load_tides();
    dashboard.wait();
    assert_eq!(dashboard.snapshot().tides.items, vec![display::TIDE_ERROR]);
}

// ---------------------------------------------------------------------------
// 3. Station switching
// ---------------------------------------------------------------------------

#[test]
fn test_slow_response_for_previous_station_is_discarded() {
    let base = start_source_server();
    let dashboard = dashboard_for(&base);

    // "slow" answers after ~400ms with Dee data; "gauge" answers at once
    let slow = dashboard.select_station("slow").unwrap();
    let gauge = dashboard.select_station("gauge").unwrap();
    assert!(gauge.epoch > slow.epoch);

    dashboard.wait();

    let snap = dashboard.snapshot();
    assert_eq!(snap.station_id, "gauge");
    assert_eq!(snap.river.trend, "Steady");
    assert_eq!(snap.river.level, "2.00 m");
    assert_eq!(snap.river_epoch, gauge.epoch);
}

#[test]
fn test_unknown_station_selection_is_rejected() {
    let base = start_source_server();
    let dashboard = dashboard_for(&base);
    assert_eq!(
        dashboard.select_station("severn"),
        Err(ReadingError::UnknownStation("severn".into()))
    );
}

// ---------------------------------------------------------------------------
// 4. Endpoint over HTTP
// ---------------------------------------------------------------------------

#[test]
fn test_endpoint_serves_dashboard_json() {
    let base = start_source_server();
    let dashboard = Arc::new(dashboard_for(&base));

    let server = tiny_http::Server::http("127.0.0.1:0").expect("bind endpoint");
    let endpoint_addr = server.server_addr().to_ip().expect("tcp listener");
    let served = Arc::clone(&dashboard);
    thread::spawn(move || endpoint::serve(server, served));

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(5))
        .no_proxy()
        .build()
        .unwrap();
    let endpoint_url = format!("http://{}", endpoint_addr);

    let select = client
        .post(format!("{}/stations/gauge/select", endpoint_url))
        .send()
        .expect("select request");
    assert_eq!(select.status().as_u16(), 202);
    dashboard.wait();

    let body: serde_json::Value = client
        .get(format!("{}/dashboard", endpoint_url))
        .send()
        .expect("dashboard request")
        .json()
        .expect("dashboard JSON");
    assert_eq!(body["station_id"], "gauge");
    assert_eq!(body["river"]["trend"], "Steady");

    let missing = client
        .get(format!("{}/river/severn", endpoint_url))
        .send()
        .expect("river request");
    assert_eq!(missing.status().as_u16(), 404);
}
