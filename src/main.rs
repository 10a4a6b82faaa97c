//! obs-fortnite
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                 STATS GATEWAY                │
//!    Browser / OBS     │                                              │
//!    ──────────────────┼─▶ http::server ──▶ gateway::lookup           │
//!                      │        │                 │                   │
//!                      │        ▼                 ▼                   │
//!                      │   http::pages    resilience::rate_limit      │
//!                      │  (form, widget,   (one permit / interval)    │
//!                      │   assets)                │                   │
//!                      │                          ▼                   │
//!    ◀─────────────────┼── sentinel or stats ◀ upstream::client ◀─────┼── Tracker
//!                      │                                              │   Network
//!                      └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use obs_fortnite::config::loader::{apply_port, load_config};
use obs_fortnite::http::HttpServer;
use obs_fortnite::lifecycle::{signals::shutdown_signal, Shutdown};
use obs_fortnite::observability::{init_logging, metrics};

#[derive(Parser)]
#[command(name = "obs-fortnite")]
#[command(about = "Rate-limited Fortnite stats gateway", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port; overrides PORT and the config file.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        apply_port(&mut config, &port.to_string())?;
    }

    init_logging(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        interval_ms = config.rate_limit.interval_ms,
        max_wait_secs = ?config.rate_limit.max_wait_secs,
        upstream = %config.upstream.base_url,
        "obs-fortnite starting"
    );

    if config.observability.metrics_enabled {
        // Address already checked by config validation.
        let addr = config.observability.metrics_address.parse()?;
        if let Err(e) = metrics::init_metrics(addr) {
            tracing::error!(error = %e, "Failed to start metrics endpoint");
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
