// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/trinetra-rs

//! Trinetra - Zone Safety Telemetry Server
//!
//! Ingests live zone telemetry, scores crowd risk, fans events out to
//! connected dashboards and manages cancellable dispatch actions.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::sync::broadcast;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use trinetra::config::Config;
use trinetra::core::EventBus;
use trinetra::dispatch::DispatchManager;
use trinetra::ingest::IngestGateway;
use trinetra::server::{self, AppState, WsServer};
use trinetra::simulator::SimulatorSupervisor;
use trinetra::zones::ZoneStore;
use trinetra::VERSION;

/// Trinetra - Zone Safety Telemetry Server
#[derive(Parser, Debug)]
#[command(name = "trinetra")]
#[command(author = "Trinetra Project")]
#[command(version = VERSION)]
#[command(about = "Real-time crowd risk monitoring and dispatch backend")]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HTTP API port
    #[arg(long)]
    port: Option<u16>,

    /// WebSocket fan-out port
    #[arg(long)]
    ws_port: Option<u16>,

    /// Start the telemetry simulator at boot
    #[arg(long)]
    sim: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable trace-level logging
    #[arg(long)]
    trace: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.trace {
        Level::TRACE
    } else if args.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_ansi(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Trinetra v{} - Zone Safety Telemetry Server", VERSION);

    // Load or create configuration
    let config_path = args.config.unwrap_or_else(Config::default_path);
    let mut config = Config::load_or_create(&config_path)?;

    // Override with command line args
    if let Some(port) = args.port {
        config.server.http_port = port;
        config.simulator.target_url = format!("http://localhost:{}", port);
    }
    if let Some(ws_port) = args.ws_port {
        config.server.ws_port = ws_port;
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(config, args.sim))
}

async fn run(config: Config, autostart_sim: bool) -> Result<()> {
    let events = Arc::new(EventBus::new(config.server.channel_capacity));
    let store = Arc::new(ZoneStore::new(config.store.history_len));
    let gateway = Arc::new(IngestGateway::new(store.clone(), events.clone()));
    let dispatch = Arc::new(DispatchManager::new(
        events.clone(),
        config.dispatch.window_secs,
    ));
    let simulator = Arc::new(SimulatorSupervisor::new(config.simulator.clone()));

    // WebSocket fan-out runs until the HTTP server decides to shut down
    let (shutdown_tx, _) = broadcast::channel(1);
    let ws = WsServer::new(
        config.server.ws_port,
        config.server.ws_max_clients,
        events.clone(),
    );
    ws.start(shutdown_tx.subscribe()).await?;

    if autostart_sim {
        simulator.start()?;
    }

    let state = AppState {
        store,
        gateway,
        dispatch,
        simulator: simulator.clone(),
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.http_port));

    // blocks until Ctrl+C / SIGTERM
    server::run_http(state, addr).await?;

    let _ = shutdown_tx.send(());
    simulator.stop();

    info!("Trinetra shutdown complete");
    Ok(())
}
