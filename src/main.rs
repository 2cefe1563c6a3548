//! Passive Balancer
//!
//! An HTTP relay that pairs producers and consumers through one bounded,
//! in-memory FIFO queue instead of routing work actively.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │               PASSIVE BALANCER               │
//!                         │                                              │
//!   POST /post ───────────┼─▶┌──────────┐    ┌────────────────────────┐  │
//!   POST /post_with_      │  │   http   │───▶│ balancer (producer /   │  │
//!        callback ────────┼─▶│  server  │    │  consumer operations)  │  │
//!   GET  /get  ───────────┼─▶└──────────┘    └───────────┬────────────┘  │
//!                         │                              │               │
//!                         │                              ▼               │
//!                         │                  ┌────────────────────────┐  │
//!                         │                  │  queue (bounded FIFO,  │  │
//!                         │                  │  callback reply slots) │  │
//!                         │                  └───────────▲────────────┘  │
//!                         │                              │ occupancy     │
//!   SIGTERM / SIGINT ─────┼─▶┌──────────────────────────┴────────────┐  │
//!                         │  │ lifecycle (signals → drain → shutdown) │  │
//!                         │  └───────────────────────────────────────┘  │
//!                         └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use passive_balancer::config::load_config;
use passive_balancer::http::HttpServer;
use passive_balancer::lifecycle::signals;
use passive_balancer::net;
use passive_balancer::observability::logging;

#[derive(Parser)]
#[command(name = "passive-balancer")]
#[command(about = "Bounded in-memory queue relaying producers to consumers over HTTP", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. PB_* environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    logging::init(&config.observability.log_level);
    tracing::info!("passive-balancer v{} starting", env!("CARGO_PKG_VERSION"));

    for (name, value) in config.fields() {
        tracing::info!(setting = name, value = %value, "Configuration");
    }

    let listener = net::bind(&config.listener).await?;
    let server = HttpServer::new(config);

    let os_signals = signals::listen()?;
    tokio::spawn(signals::watch(server.controller(), os_signals));

    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
