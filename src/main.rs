//! CLAIRON Feed Server
//!
//! Run with: cargo run --bin clairon
//!
//! Generates the session snapshot, starts the live statistics feed and
//! serves the API until Ctrl+C or SIGTERM.
//!
//! # Configuration
//!
//! Read from `--config`, or the default search path, with `CLAIRON_*`
//! environment overrides. `RUST_LOG` takes precedence over the configured
//! log level.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use clairon::api::{serve, AppState};
use clairon::config::{Config, LoadedConfig, LoggingConfig};
use clairon::market::{RngSource, Snapshot};
use clairon::telemetry::{spawn_all, LiveMutator, StatsFeed};
use clairon::websocket::{ConnectionHub, WsEvent};

#[derive(Parser)]
#[command(name = "clairon")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "CLAIRON convergence feed server")]
struct Args {
    /// Config file (default: search standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the random seed
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let loaded = match &args.config {
        Some(path) => LoadedConfig::from_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load_default(),
    };

    init_tracing(&loaded.config.logging);

    tracing::info!("Starting CLAIRON feed server v{}", env!("CARGO_PKG_VERSION"));
    loaded.report();

    let mut config = loaded.config;
    if args.seed.is_some() {
        config.simulation.seed = args.seed;
    }

    let seed = config.simulation.seed;
    match seed {
        Some(seed) => tracing::info!(seed, "Using seeded random source"),
        None => tracing::info!("Using entropy random source"),
    }

    let mut rng = RngSource::from_seed_option(seed);
    let snapshot = Snapshot::generate(&mut rng);
    tracing::info!(
        opportunities = snapshot.opportunities.len(),
        bridge_flows = snapshot.bridge_flows.len(),
        "Session snapshot generated"
    );

    let hub = ConnectionHub::new(config.websocket.hub_config());
    let feed = StatsFeed::new(config.simulation.initial_stats());

    let mutator = LiveMutator::new(feed.clone(), Box::new(rng))
        .interval(config.simulation.tick_interval())
        .hub(hub.clone())
        .start();
    let animators = spawn_all(
        &feed.subscribe(),
        config.simulation.smoothing_interval(),
        Some(hub.clone()),
    );

    hub.publish(WsEvent::system("feed started"));

    let state = AppState::with_hub(config, snapshot, feed, hub.clone());
    let result = serve(state).await;

    hub.publish(WsEvent::system("feed stopping"));
    mutator.stop().await;
    for animator in animators {
        animator.stop().await;
    }

    result.context("API server failed")?;

    tracing::info!("CLAIRON feed server stopped");
    Ok(())
}

/// Initialize tracing with the configured level and format
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.filter_directive()));

    let registry = tracing_subscriber::registry().with(filter);

    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
