//! Riverwatch Service - tide and river-level dashboard
//!
//! Loads the tide list and the selected station's river series, then
//! either prints them once or keeps them fresh behind an HTTP endpoint.
//!
//! Usage:
//!   cargo run --release                              # Load once and print
//!   cargo run --release -- --station dee-ironbridge  # Pick the river station
//!   cargo run --release -- --endpoint 8080           # Serve JSON and refresh periodically
//!   cargo run --release -- --config other.toml --once
//!
//! Environment:
//!   RIVERWATCH_CONFIG   - config file path (default: riverwatch.toml)
//!   RIVERWATCH_TIDE_URL - tide source override
//!   RUST_LOG            - log filter (default: info)

use riverwatch_service::config;
use riverwatch_service::dashboard::Dashboard;
use riverwatch_service::display;
use riverwatch_service::endpoint;
use riverwatch_service::ingest::http::HttpSource;
use riverwatch_service::logging::{self, DataSource};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Chart points shown in terminal output.
const TERMINAL_CHART_POINTS: usize = 8;

struct Args {
    config_path: Option<PathBuf>,
    station: Option<String>,
    endpoint_port: Option<u16>,
    once: bool,
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {} [--config PATH] [--station ID] [--endpoint PORT] [--once]",
        program
    )
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let program = args.first().map(String::as_str).unwrap_or("riverwatch_service");
    let mut parsed = Args {
        config_path: None,
        station: None,
        endpoint_port: None,
        once: false,
    };

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match (args[i].as_str(), value) {
            ("--config", Some(path)) => parsed.config_path = Some(PathBuf::from(path)),
            ("--station", Some(id)) => parsed.station = Some(id.clone()),
            ("--endpoint", Some(port)) => {
                parsed.endpoint_port = Some(
                    port.parse()
                        .map_err(|_| format!("--endpoint requires a port number, got '{}'", port))?,
                )
            }
            ("--once", _) => {
                parsed.once = true;
                i += 1;
                continue;
            }
            (flag @ ("--config" | "--station" | "--endpoint"), None) => {
                return Err(format!("{} requires a value\n{}", flag, usage(program)));
            }
            (other, _) => return Err(format!("Unknown argument: {}\n{}", other, usage(program))),
        }
        i += 2;
    }

    Ok(parsed)
}

fn main() {
    dotenv::dotenv().ok();
    logging::init_logger("info");

    let args: Vec<String> = env::args().collect();
    let args = match parse_args(&args) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = run(args) {
        logging::error(DataSource::System, None, &e.to_string());
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    println!("🌊 Riverwatch Service");
    println!("=====================\n");

    let config = config::load_config(args.config_path.as_deref())?;
    let source = HttpSource::new(Duration::from_secs(config.service.request_timeout_secs))?;
    let refresh = Duration::from_secs(config.service.refresh_interval_minutes * 60);

    logging::info(
        DataSource::System,
        None,
        &format!("{} stations, tides from {}", config.stations.len(), config.tides.url),
    );

    let dashboard = Arc::new(Dashboard::new(config, Arc::new(source))?);
    if let Some(id) = &args.station {
        // selection starts its own river load
        dashboard.select_station(id)?;
        dashboard.load_tides();
    } else {
        dashboard.load_all();
    }

    match args.endpoint_port {
        Some(port) if !args.once => {
            let server = endpoint::bind_endpoint(port)?;
            let server_dashboard = Arc::clone(&dashboard);
            std::thread::spawn(move || endpoint::serve(server, server_dashboard));
            println!("🚀 Endpoint running on http://0.0.0.0:{}", port);

            dashboard.wait();
            print!("{}", display::render_text(&dashboard.snapshot(), TERMINAL_CHART_POINTS));

            if refresh.is_zero() {
                println!("\nRefresh disabled; serving the loaded data. Press Ctrl+C to stop");
                loop {
                    std::thread::park();
                }
            }

            println!("\n🔄 Refreshing every {} minutes. Press Ctrl+C to stop", refresh.as_secs() / 60);
            dashboard.run(refresh);
            Ok(())
        }
        _ => {
            dashboard.wait();
            print!("{}", display::render_text(&dashboard.snapshot(), TERMINAL_CHART_POINTS));
            Ok(())
        }
    }
}
