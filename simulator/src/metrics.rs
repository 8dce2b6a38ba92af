//! Simulation metrics.

use std::collections::VecDeque;
use std::fmt;

/// Most recent latency samples kept per metrics instance.
const MAX_LATENCY_SAMPLES: usize = 10_000;

/// Transfer outcomes and latency samples collected during a run.
#[derive(Debug, Clone, Default)]
pub struct SimulationMetrics {
    /// Transfers the ledger applied.
    pub successful_transfers: u64,
    /// Transfers the ledger rejected.
    pub rejected_transfers: u64,
    /// Latency of applied transfers (µs), oldest first.
    latency_samples: VecDeque<u64>,
}

/// Latency distribution of applied transfers, in µs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LatencySummary {
    pub samples: usize,
    pub mean: u64,
    pub p50: u64,
    pub p99: u64,
    pub max: u64,
}

impl SimulationMetrics {
    /// Create new metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transfers attempted, applied or not.
    pub fn total_transfers(&self) -> u64 {
        self.successful_transfers + self.rejected_transfers
    }

    /// Record an applied transfer.
    pub fn record_success(&mut self, latency_us: u64) {
        self.successful_transfers += 1;
        self.push_sample(latency_us);
    }

    /// Record a rejected transfer.
    pub fn record_rejection(&mut self) {
        self.rejected_transfers += 1;
    }

    /// Fold another worker's metrics into this one.
    pub fn merge(&mut self, other: &SimulationMetrics) {
        self.successful_transfers += other.successful_transfers;
        self.rejected_transfers += other.rejected_transfers;
        for &sample in &other.latency_samples {
            self.push_sample(sample);
        }
    }

    fn push_sample(&mut self, latency_us: u64) {
        if self.latency_samples.len() == MAX_LATENCY_SAMPLES {
            self.latency_samples.pop_front();
        }
        self.latency_samples.push_back(latency_us);
    }

    /// Summarize the retained latency samples with a single sort.
    pub fn latency(&self) -> LatencySummary {
        let mut sorted: Vec<u64> = self.latency_samples.iter().copied().collect();
        let Some(&max) = sorted.iter().max() else {
            return LatencySummary::default();
        };
        sorted.sort_unstable();

        let rank = |percentile: usize| sorted[(sorted.len() * percentile / 100).min(sorted.len() - 1)];
        let sum: u64 = sorted.iter().sum();

        LatencySummary {
            samples: sorted.len(),
            mean: sum / sorted.len() as u64,
            p50: rank(50),
            p99: rank(99),
            max,
        }
    }

    /// Fraction of attempted transfers that were applied.
    pub fn success_rate(&self) -> f64 {
        match self.total_transfers() {
            0 => 0.0,
            total => self.successful_transfers as f64 / total as f64,
        }
    }

    /// Transfers attempted per second.
    pub fn throughput(&self, elapsed_secs: f64) -> f64 {
        if elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.total_transfers() as f64 / elapsed_secs
    }
}

impl fmt::Display for LatencySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mean {}µs, p50 {}µs, p99 {}µs, max {}µs over {} samples",
            self.mean, self.p50, self.p99, self.max, self.samples
        )
    }
}
