//! Tournament matchmaking server.
//!
//! Players register over HTTP, find each other for head-to-head games, and
//! report results; the server runs a single-elimination tournament over the
//! registered pool via the `matchmaking` engine.

use std::net::SocketAddr;

use anyhow::Error;
use ctrlc::set_handler;
use mm_server::{api, config::ServerConfig, logging, metrics};
use pico_args::Arguments;
use tracing::info;

const HELP: &str = "\
Run a tournament matchmaking server

USAGE:
  mm_server [OPTIONS]

OPTIONS:
  --bind          IP:PORT    Server socket bind address    [default: env SERVER_BIND or 127.0.0.1:5000]
  --metrics-bind  IP:PORT    Prometheus exporter address   [default: env METRICS_BIND or disabled]

FLAGS:
  -h, --help                 Print help information

ENVIRONMENT:
  SERVER_BIND                Server bind address (e.g., 0.0.0.0:5000)
  METRICS_BIND               Prometheus exporter bind address
  STAGE_NAME                 Bracket stage display name      [default: Main]
  MIN_PARTICIPANTS           Players required to start       [default: 2]
  RUST_LOG                   Log filter (e.g., info,mm_server=debug)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let bind_override: Option<SocketAddr> = pargs.opt_value_from_str("--bind")?;
    let metrics_override: Option<SocketAddr> = pargs.opt_value_from_str("--metrics-bind")?;

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    logging::init();

    let config = ServerConfig::from_env(bind_override, metrics_override)?;
    config.validate()?;

    if let Some(addr) = config.metrics_bind {
        metrics::init_metrics(addr).map_err(Error::msg)?;
        info!("Prometheus metrics available at http://{addr}/metrics");
    }

    let state = api::AppState::new(&config);
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    info!(
        "Matchmaking server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
}
