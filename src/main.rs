//! Experience booking mock backend
//!
//! Serves the procedure catalog over HTTP from fixtures so the booking site
//! can be developed without a live server.
//!
//! Module structure:
//! - `domain/` - Core business types (Experience, Asset, Booking, AccessLevel)
//! - `mock/` - Procedure router, fixtures, envelopes
//! - `client/` - Typed procedure client
//! - `services/` - Page view-models (detail page, booking flow)
//! - `io/` - HTTP server
//! - `infra/` - Infrastructure (Config, Metrics)

use clap::Parser;
use experience_booking::infra::{Config, Metrics};
use experience_booking::io::{bind, run_server, ServerState};
use experience_booking::mock::{Fixtures, MockRouter};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// Mock procedure backend for the experience booking site
#[derive(Parser, Debug)]
#[command(name = "experience-booking", version, about)]
struct Args {
    /// Path to TOML configuration file [default: $CONFIG_FILE, else config/dev.toml]
    #[arg(short, long)]
    config: Option<String>,

    /// Override the listening port
    #[arg(short, long)]
    port: Option<u16>,
}

fn load_fixtures(config: &Config) -> anyhow::Result<Fixtures> {
    match config.fixtures_file() {
        Some(path) => Fixtures::from_file(path),
        None => Ok(Fixtures::default()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize structured logging with configurable level via RUST_LOG env var
    // Default: INFO, use RUST_LOG=debug for per-call logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        git_hash = env!("GIT_HASH"),
        "experience_booking_starting"
    );

    let args = Args::parse();
    let mut config = Config::load_with(args.config.as_deref());
    if let Some(port) = args.port {
        config.set_server_port(port);
    }

    info!(
        config_file = %config.config_file(),
        environment = %config.environment().as_str(),
        bind_address = %config.bind_address(),
        port = %config.server_port(),
        base_path = %config.base_path(),
        fixtures_file = ?config.fixtures_file(),
        "config_loaded"
    );

    let router = Arc::new(MockRouter::new(load_fixtures(&config)?));
    info!(
        experiences = %router.fixtures().experiences.len(),
        bookings = %router.fixtures().bookings.len(),
        procedures = %router.procedures().count(),
        "fixtures_loaded"
    );

    let metrics = Arc::new(Metrics::new());
    let state = Arc::new(ServerState::new(router, metrics.clone(), config.base_path()));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Periodic metrics log line
    let metrics_interval = config.metrics_interval_secs();
    if metrics_interval > 0 {
        let metrics_clone = metrics.clone();
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(std::time::Duration::from_secs(metrics_interval));
            interval.tick().await;
            loop {
                interval.tick().await;
                metrics_clone.report().log();
            }
        });
    }

    // Handle shutdown on Ctrl+C
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("shutdown_signal_received");
        let _ = shutdown_tx.send(true);
    });

    let listener = bind(config.bind_address(), config.server_port()).await?;
    run_server(listener, state, shutdown_rx).await?;

    info!("experience-booking shutdown complete");
    Ok(())
}
