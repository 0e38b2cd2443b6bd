//! CLAIRON CLI
//!
//! Command-line interface for the CLAIRON feed:
//! - Generate and inspect snapshots locally
//! - Run an offline random walk of the headline statistics
//! - Query a running server
//! - Emit a default config file

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use clairon::market::{RngSource, Snapshot};
use clairon::telemetry::{AggregateStats, SmoothedValue};

#[derive(Parser)]
#[command(name = "clairon-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect and query the CLAIRON convergence feed")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8082", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a snapshot locally
    Snapshot {
        /// Seed for a reproducible snapshot
        #[arg(short, long)]
        seed: Option<u64>,
        /// Only show the top N opportunities
        #[arg(short, long)]
        top: Option<usize>,
    },

    /// Run the statistics random walk offline
    Simulate {
        /// Number of ticks to apply
        #[arg(short, long, default_value = "10")]
        ticks: u32,
        /// Seed for a reproducible walk
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Show the live statistics of a running server
    Stats,

    /// Show server status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let json = cli.format == "json";

    match cli.command {
        Commands::Snapshot { seed, top } => {
            let snapshot = Snapshot::generate(&mut RngSource::from_seed_option(seed));

            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print_snapshot(&snapshot, top.unwrap_or(snapshot.opportunities.len()));
            }
        }

        Commands::Simulate { ticks, seed } => {
            let mut rng = RngSource::from_seed_option(seed);
            let mut stats = AggregateStats::default();
            let mut rows = Vec::with_capacity(ticks as usize + 1);
            rows.push(stats);

            for _ in 0..ticks {
                stats.tick(&mut rng);
                rows.push(stats);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print_walk(&rows);
            }
        }

        Commands::Stats => {
            let stats = fetch(&cli.api_url, "/api/v1/stats").await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                let display = &stats["display"];
                println!("{:<22} {}", "Total volume", display["volume"].as_str().unwrap_or("-"));
                println!(
                    "{:<22} {}",
                    "Active convergences",
                    display["active_vectors"].as_str().unwrap_or("-")
                );
                println!("{:<22} {}", "Avg spread", display["avg_spread"].as_str().unwrap_or("-"));
            }
        }

        Commands::Status => {
            let health = match fetch(&cli.api_url, "/health").await {
                Ok(health) => health,
                Err(e) => {
                    eprintln!("Cannot connect to CLAIRON API at {}", cli.api_url);
                    eprintln!("Error: {:#}", e);
                    eprintln!();
                    eprintln!("Make sure the feed server is running:");
                    eprintln!("  cargo run --bin clairon");
                    std::process::exit(1);
                }
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&health)?);
            } else {
                println!("CLAIRON v{}", health["version"].as_str().unwrap_or("?"));
                println!();
                println!("API Status: {}", health["status"].as_str().unwrap_or("unknown"));
                println!("Feed: {}", health["feed"].as_str().unwrap_or("unknown"));
                println!(
                    "WebSocket connections: {}",
                    health["ws_connections"].as_u64().unwrap_or(0)
                );
                if let Some(uptime) = health["uptime_seconds"].as_u64() {
                    println!();
                    println!("Uptime: {}", format_duration(uptime));
                }
            }
        }

        Commands::Config { output } => {
            let config = clairon::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// GET a JSON document from the server
async fn fetch(api_url: &str, path: &str) -> anyhow::Result<serde_json::Value> {
    let url = format!("{}{}", api_url.trim_end_matches('/'), path);
    let response = reqwest::get(&url)
        .await
        .with_context(|| format!("requesting {}", url))?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        bail!("{} returned {}: {}", url, status, text);
    }

    Ok(response.json().await?)
}

fn print_snapshot(snapshot: &Snapshot, top: usize) {
    println!(
        "{:<4} {:<10} {:<24} {:>6} {:>6} {:>7} {:>7} {:>5} {:>5} {:<6}",
        "Chn", "Market", "Bet", "Buy", "Sell", "Spread", "Volume", "Left", "Conf", "Risk"
    );
    println!("{}", "-".repeat(92));

    for opp in snapshot.top_performers(top) {
        println!(
            "{:<4} {:<10} {:<24} {:>6.3} {:>6.3} {:>6.1}% {:>7} {:>5} {:>4.0}% {:<6}",
            opp.chain_info().badge(),
            opp.target_market,
            opp.bet,
            opp.buy_price,
            opp.sell_price,
            opp.spread,
            opp.volume,
            opp.time_left,
            opp.confidence,
            opp.risk.to_string()
        );
    }

    println!();
    println!("Bridges:");
    for flow in &snapshot.bridge_flows {
        println!(
            "  {:<10} -> {:<8} {:>7} {:<10} {}ms",
            flow.from.name(),
            flow.to,
            flow.amount,
            flow.status.to_string(),
            flow.latency_ms
        );
    }

    println!();
    println!("Network load:");
    for load in &snapshot.network_loads {
        println!("  {:<10} {:>5.1}%", load.chain.name(), load.share_percent);
    }
}

/// Print each tick with the value a display would show after easing for one cadence
fn print_walk(rows: &[AggregateStats]) {
    println!(
        "{:>5} {:>12} {:>12} {:>10} {:>14}",
        "Tick", "Volume", "Convergences", "Spread", "Shown spread"
    );
    println!("{}", "-".repeat(57));

    let mut shown = SmoothedValue::new(rows.first().map(|s| s.avg_spread).unwrap_or_default());
    for (tick, stats) in rows.iter().enumerate() {
        shown.set_target(stats.avg_spread);
        let display = stats.display();
        println!(
            "{:>5} {:>12} {:>12} {:>10} {:>13.2}%",
            tick,
            display.volume,
            display.active_vectors,
            display.avg_spread,
            shown.step()
        );
    }
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}
