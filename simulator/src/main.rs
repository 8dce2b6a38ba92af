//! Bank Ledger Simulator
//!
//! Hammers a ledger with concurrent random transfers and checks that money
//! is conserved, or replays a scripted scenario with expected outcomes.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bankledger_ledger::LedgerEngine;

mod controller;
mod metrics;
mod scenario;

use controller::SimulationController;
use scenario::Scenario;

/// Bank Ledger Simulator CLI
#[derive(Parser, Debug)]
#[command(name = "simulator")]
#[command(about = "Concurrent transfer simulator for the bank ledger")]
struct Args {
    /// Number of accounts to open
    #[arg(short, long, default_value = "10")]
    accounts: usize,

    /// Opening balance of every account
    #[arg(long, default_value = "1000")]
    opening_balance: f64,

    /// Number of concurrent workers
    #[arg(short, long, default_value = "8")]
    workers: usize,

    /// Transfers attempted by each worker
    #[arg(short, long, default_value = "1000")]
    transfers: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Save and reload the ledger through this file after the run
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Run a scripted scenario instead of random load
    #[arg(short, long)]
    scenario: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Starting Bank Ledger Simulator");

    let engine = Arc::new(LedgerEngine::default());
    let mut controller = SimulationController::new(engine, args.seed);

    if let Some(scenario_name) = &args.scenario {
        let scenario = Scenario::load(scenario_name)?;
        let path = args
            .snapshot
            .clone()
            .unwrap_or_else(controller::default_snapshot_path);
        controller.run_scenario(&scenario, &path)?;
        return Ok(());
    }

    controller.initialize(args.accounts, args.opening_balance)?;
    let elapsed = controller.run_load(args.workers, args.transfers).await?;

    let total = controller.verify_conservation()?;

    if let Some(path) = &args.snapshot {
        controller.snapshot_round_trip(path)?;
        controller.verify_conservation()?;
    }

    let metrics = controller.metrics();
    info!("Simulation complete");
    info!("Total transfers: {}", metrics.total_transfers());
    info!("Applied: {}", metrics.successful_transfers);
    info!("Rejected: {}", metrics.rejected_transfers);
    info!("Success rate: {:.1}%", metrics.success_rate() * 100.0);
    info!("Latency: {}", metrics.latency());
    info!(
        "Throughput: {:.0} transfers/s",
        metrics.throughput(elapsed.as_secs_f64())
    );
    info!("Total balance: {:.2}", total);

    Ok(())
}
