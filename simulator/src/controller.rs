//! Simulation controller.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use bankledger_common::LedgerError;
use bankledger_ledger::{Account, LedgerEngine};

use crate::metrics::SimulationMetrics;
use crate::scenario::{AssertCondition, Outcome, Scenario, ScenarioStep};

/// Relative tolerance allowed when comparing summed balances.
const CONSERVATION_TOLERANCE: f64 = 1e-6;

/// Drives load and scenarios against a shared ledger engine.
pub struct SimulationController {
    /// Engine under test.
    engine: Arc<LedgerEngine>,
    /// Base seed for worker RNGs.
    seed: Option<u64>,
    /// Names of the accounts created by `initialize`.
    accounts: Vec<String>,
    /// Sum of balances right after `initialize`.
    expected_total: f64,
    /// Merged worker metrics.
    metrics: Arc<Mutex<SimulationMetrics>>,
}

impl SimulationController {
    /// Create a new simulation controller.
    pub fn new(engine: Arc<LedgerEngine>, seed: Option<u64>) -> Self {
        Self {
            engine,
            seed,
            accounts: Vec::new(),
            expected_total: 0.0,
            metrics: Arc::new(Mutex::new(SimulationMetrics::new())),
        }
    }

    /// Open `count` accounts, each holding `opening_balance`.
    pub fn initialize(&mut self, count: usize, opening_balance: f64) -> anyhow::Result<()> {
        if count < 2 {
            bail!("At least two accounts are needed to simulate transfers");
        }

        info!(accounts = count, opening_balance, "Initializing simulation");

        self.accounts = (0..count).map(|i| format!("acct-{:04}", i)).collect();
        for name in &self.accounts {
            self.engine.create_account(name, Some(opening_balance))?;
        }
        self.expected_total = self.engine.total_balance();

        Ok(())
    }

    /// Run `workers` concurrent tasks, each attempting `transfers` random transfers.
    ///
    /// Amounts are whole units up to a tenth of the opening balance, so
    /// workers regularly race on the same pair in opposite directions and
    /// regularly drain an account far enough to be rejected.
    pub async fn run_load(&self, workers: usize, transfers: usize) -> anyhow::Result<Duration> {
        let names = Arc::new(self.accounts.clone());
        if names.len() < 2 {
            bail!("Simulation has not been initialized");
        }

        let opening = self.expected_total / names.len() as f64;
        let max_amount = ((opening / 10.0).floor() as u64).max(1);

        info!(workers, transfers, max_amount, "Starting transfer load");
        let started = Instant::now();

        let mut handles = Vec::with_capacity(workers);
        for worker in 0..workers {
            let engine = self.engine.clone();
            let names = names.clone();
            let mut rng = match self.seed {
                Some(s) => StdRng::seed_from_u64(s.wrapping_add(worker as u64)),
                None => StdRng::from_entropy(),
            };

            handles.push(tokio::spawn(async move {
                let mut metrics = SimulationMetrics::new();

                for _ in 0..transfers {
                    let from = rng.gen_range(0..names.len());
                    let mut to = rng.gen_range(0..names.len());
                    while to == from {
                        to = rng.gen_range(0..names.len());
                    }
                    let amount = rng.gen_range(1..=max_amount) as f64;

                    let attempt = Instant::now();
                    match engine.transfer(&names[from], &names[to], amount) {
                        Ok(_) => metrics.record_success(attempt.elapsed().as_micros() as u64),
                        Err(LedgerError::InsufficientFunds { .. }) => metrics.record_rejection(),
                        Err(e) => return Err(e),
                    }

                    tokio::task::yield_now().await;
                }

                debug!(worker, attempted = metrics.total_transfers(), "Worker finished");
                Ok(metrics)
            }));
        }

        for handle in handles {
            let worker_metrics = handle.await??;
            self.metrics.lock().merge(&worker_metrics);
        }

        let elapsed = started.elapsed();
        info!(elapsed_ms = elapsed.as_millis() as u64, "Transfer load complete");
        Ok(elapsed)
    }

    /// Check that transfers neither created nor destroyed money and that
    /// no account went negative. Returns the observed total.
    pub fn verify_conservation(&self) -> anyhow::Result<f64> {
        let accounts = self.engine.store().snapshot_all();

        if let Some(account) = accounts.iter().find(|a| a.balance < 0.0) {
            bail!(
                "Account {} has negative balance {}",
                account.name,
                account.balance
            );
        }

        let total: f64 = accounts.iter().map(|a| a.balance).sum();
        if !within_tolerance(total, self.expected_total) {
            bail!(
                "Total balance drifted: expected {}, found {}",
                self.expected_total,
                total
            );
        }

        info!(total, "Total balance conserved");
        Ok(total)
    }

    /// Save the ledger, empty it, load it back and compare every account.
    pub fn snapshot_round_trip(&self, path: &Path) -> anyhow::Result<()> {
        let before = self.engine.store().snapshot_all();

        let written = self.engine.save(path)?;
        self.engine.store().clear();
        let loaded = self.engine.load(path)?;
        if written != loaded {
            bail!("Saved {} accounts but loaded {}", written, loaded);
        }

        let after = self.engine.store().snapshot_all();
        for (old, new) in before.iter().zip(&after) {
            if !same_account(old, new) {
                bail!("Account {} changed across save/load", old.name);
            }
        }

        info!(accounts = loaded, path = %path.display(), "Snapshot round trip verified");
        Ok(())
    }

    /// Run a scripted scenario. `snapshot_path` backs any save/reload step.
    pub fn run_scenario(&self, scenario: &Scenario, snapshot_path: &Path) -> anyhow::Result<()> {
        info!("Running scenario: {} - {}", scenario.name, scenario.description);

        for (index, step) in scenario.steps.iter().enumerate() {
            self.execute_step(step, snapshot_path)
                .map_err(|e| anyhow!("Step {} ({:?}) failed: {}", index + 1, step, e))?;
        }

        info!(steps = scenario.steps.len(), "Scenario passed");
        Ok(())
    }

    /// Execute a single scenario step.
    fn execute_step(&self, step: &ScenarioStep, snapshot_path: &Path) -> anyhow::Result<()> {
        match step {
            ScenarioStep::Create { name, balance } => {
                self.engine.create_account(name, *balance)?;
            }
            ScenarioStep::Deposit { account, amount } => {
                self.engine.deposit(account, *amount)?;
            }
            ScenarioStep::Withdraw {
                account,
                amount,
                expect,
            } => {
                let result = self.engine.withdraw(account, *amount).map(|_| ());
                self.check_outcome(result, *expect)?;
            }
            ScenarioStep::Transfer {
                from,
                to,
                amount,
                expect,
            } => {
                let started = Instant::now();
                let result = self.engine.transfer(from, to, *amount).map(|_| ());
                let mut metrics = self.metrics.lock();
                match &result {
                    Ok(()) => metrics.record_success(started.elapsed().as_micros() as u64),
                    Err(_) => metrics.record_rejection(),
                }
                drop(metrics);
                self.check_outcome(result, *expect)?;
            }
            ScenarioStep::SaveAndReload => {
                self.snapshot_round_trip(snapshot_path)?;
            }
            ScenarioStep::Assert { condition } => self.check_condition(condition)?,
        }

        Ok(())
    }

    fn check_outcome(&self, result: Result<(), LedgerError>, expect: Outcome) -> anyhow::Result<()> {
        match (result, expect) {
            (Ok(()), Outcome::Applied) => Ok(()),
            (Err(e), Outcome::Rejected) => {
                debug!(error = %e, "Rejected as expected");
                Ok(())
            }
            (Ok(()), Outcome::Rejected) => bail!("Operation was applied but should be rejected"),
            (Err(e), Outcome::Applied) => Err(e.into()),
        }
    }

    fn check_condition(&self, condition: &AssertCondition) -> anyhow::Result<()> {
        match condition {
            AssertCondition::BalanceEquals { account, amount } => {
                let view = self.engine.account(account)?;
                if !within_tolerance(view.balance, *amount) {
                    bail!("{} has balance {}, expected {}", account, view.balance, amount);
                }
            }
            AssertCondition::HistoryEquals {
                account,
                transactions,
            } => {
                let view = self.engine.account(account)?;
                if &view.transactions != transactions {
                    bail!(
                        "{} has history {:?}, expected {:?}",
                        account,
                        view.transactions,
                        transactions
                    );
                }
            }
            AssertCondition::TotalEquals { amount } => {
                let total = self.engine.total_balance();
                if !within_tolerance(total, *amount) {
                    warn!(total, expected = amount, "Total balance mismatch");
                    bail!("Total balance is {}, expected {}", total, amount);
                }
            }
        }

        Ok(())
    }

    /// Merged metrics so far.
    pub fn metrics(&self) -> SimulationMetrics {
        self.metrics.lock().clone()
    }
}

/// Default location for scenario snapshots when none is given.
pub fn default_snapshot_path() -> PathBuf {
    std::env::temp_dir().join(format!("bankledger-simulator-{}.csv", std::process::id()))
}

fn within_tolerance(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() <= expected.abs().max(1.0) * CONSERVATION_TOLERANCE
}

/// Snapshots keep two decimals, so balances are compared at that precision.
fn same_account(old: &Account, new: &Account) -> bool {
    old.id == new.id
        && old.name == new.name
        && (old.balance - new.balance).abs() < 0.005
        && old.transactions == new.transactions
}
