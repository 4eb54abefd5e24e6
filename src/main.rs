//! Cleartrip partner relay.
//!
//! Forwards browser-facing calls to the hotel partner (API key plus
//! path-derived headers) and the flight partner (cached bearer token),
//! and serves a read-only location catalog.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                    RELAY                      │
//!   Client Request     │  ┌────────┐    ┌──────────┐    ┌──────────┐   │
//!   ───────────────────┼─▶│  http  │───▶│  relay   │───▶│  client  │───┼──▶ Hotel partner
//!                      │  │ server │    │dispatcher│    │ (reqwest)│───┼──▶ Flight partner
//!                      │  └───┬────┘    └────┬─────┘    └──────────┘   │
//!                      │      │              │                         │
//!                      │      │         ┌────┴─────┐   ┌──────────┐    │
//!                      │      │         │ headers  │   │   auth   │    │
//!                      │      │         │  rules   │   │  tokens  │    │
//!                      │      │         └──────────┘   └──────────┘    │
//!                      │      ▼                                        │
//!                      │  ┌────────┐                                   │
//!                      │  │catalog │──────────────────────────────────┼──▶ PostgreSQL
//!                      │  └────────┘                                   │
//!                      │                                               │
//!                      │  config · observability · resilience ·       │
//!                      │  lifecycle                                    │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use cleartrip_relay::config::load_config;
use cleartrip_relay::lifecycle::{build_state, signals, Shutdown};
use cleartrip_relay::observability::{logging, metrics};
use cleartrip_relay::HttpServer;

#[derive(Parser)]
#[command(name = "cleartrip-relay")]
#[command(about = "Relay for the Cleartrip hotel and flight partner APIs", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long, env = "RELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "cleartrip-relay starting");

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let state = build_state(config)?;

    let shutdown = Shutdown::new();
    let stop = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    HttpServer::new(state).run(listener, stop).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
