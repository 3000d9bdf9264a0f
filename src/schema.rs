use serde::{Deserialize, Serialize};

use crate::OrderPolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMeta {
    pub schema_version: u32,
    pub bench_version: String,
    pub profile: String,
    pub seed: u64,
    pub timestamp_utc: String,
    pub git_sha: Option<String>,
    /// Hex SHA-256 of the fixture shared by every strategy.
    pub fixture_sha256: String,
    pub iters: u64,
    pub warmup_iters: u64,
    pub order: OrderPolicy,
}

/// Summary of one strategy's measured phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStat {
    pub name: String,
    /// Position in the registered strategy list.
    pub declared_index: usize,

    pub mean_ns: f64,
    pub std_dev_ns: f64,
    pub median_ns: f64,
    pub min_ns: f64,
    pub max_ns: f64,

    /// `None` when memory diagnostics were off.
    pub mean_allocated_bytes: Option<f64>,

    pub sample_count: u64,
    /// Failed attempts that a retry recovered from.
    pub retries: u64,
}

/// A strategy dropped from the ranking because a sample exhausted its retries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedStrategy {
    pub name: String,
    pub declared_index: usize,
    pub reason: String,
    pub failures: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchReport {
    pub run: RunMeta,
    /// Stats in report order.
    pub ranked: Vec<AggregateStat>,
    pub excluded: Vec<ExcludedStrategy>,
}

impl BenchReport {
    /// Mean time of the fastest strategy that produced samples.
    pub fn baseline_ns(&self) -> Option<f64> {
        self.ranked
            .iter()
            .filter(|s| s.sample_count > 0)
            .map(|s| s.mean_ns)
            .min_by(f64::total_cmp)
    }

    /// `stat`'s mean relative to the fastest, or `None` when either side has no data.
    pub fn ratio(&self, stat: &AggregateStat) -> Option<f64> {
        let base = self.baseline_ns()?;
        if stat.sample_count == 0 || base <= 0.0 {
            return None;
        }
        Some(stat.mean_ns / base)
    }
}
