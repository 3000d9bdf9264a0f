use std::hint::black_box;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::alloc;
use crate::error::{BenchError, MapError};
use crate::schema::{AggregateStat, ExcludedStrategy};
use crate::strategies::StrategyDescriptor;

#[derive(Clone, Copy, Debug)]
pub enum Profile {
    Quick,
    Full,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Quick => "quick",
            Profile::Full => "full",
        }
    }

    pub fn warmup_iters(&self) -> u64 {
        match self {
            Profile::Quick => 1_000,
            Profile::Full => 10_000,
        }
    }

    pub fn iters(&self) -> u64 {
        match self {
            Profile::Quick => 10_000,
            Profile::Full => 100_000,
        }
    }
}

/// Runner settings. Start from a [`Profile`] preset and override fields.
#[derive(Clone, Debug)]
pub struct BenchConfig {
    pub profile: Profile,
    pub iters: u64,
    pub warmup_iters: u64,
    /// Extra attempts allowed per sample before the strategy is excluded.
    pub max_retries: u32,
    pub memory_diagnostics: bool,
    /// Warm every strategy concurrently before the first measured phase.
    pub parallel_warmup: bool,
}

impl BenchConfig {
    pub fn from_profile(profile: Profile) -> Self {
        Self {
            profile,
            iters: profile.iters(),
            warmup_iters: profile.warmup_iters(),
            max_retries: 3,
            memory_diagnostics: true,
            parallel_warmup: false,
        }
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self::from_profile(Profile::Quick)
    }
}

/// One measured invocation.
#[derive(Clone, Copy, Debug)]
pub struct Sample {
    pub elapsed: Duration,
    pub allocated_bytes: u64,
}

/// Everything the runner produced: stats in declaration order plus the
/// strategies that were dropped.
#[derive(Clone, Debug, Default)]
pub struct RunOutcome {
    pub stats: Vec<AggregateStat>,
    pub excluded: Vec<ExcludedStrategy>,
}

/// Invoke `strategy` `iters` times, discarding outputs and errors.
pub fn warm_up<I, O>(strategy: &StrategyDescriptor<I, O>, fixture: &I, iters: u64) {
    let mut failures = 0u64;
    for _ in 0..iters {
        if black_box(strategy.invoke(black_box(fixture))).is_err() {
            failures += 1;
        }
    }
    debug!(strategy = strategy.name(), iters, failures, "warm-up complete");
}

/// Time exactly one invocation. The output is dropped after the window closes.
#[inline]
pub fn measure_sample<I, O>(
    strategy: &StrategyDescriptor<I, O>,
    fixture: &I,
    track_alloc: bool,
) -> Result<Sample, MapError> {
    let alloc_before = if track_alloc { alloc::allocated_bytes() } else { 0 };
    let start = Instant::now();
    let result = black_box(strategy.invoke(black_box(fixture)));
    let elapsed = start.elapsed();
    let allocated_bytes = if track_alloc {
        alloc::allocated_bytes().saturating_sub(alloc_before)
    } else {
        0
    };

    let output = result?;
    drop(output);

    Ok(Sample {
        elapsed,
        allocated_bytes,
    })
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() - 1) as f64 * q).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Summarize one strategy's samples. An empty slice yields an all-zero stat
/// with `sample_count == 0`.
pub fn aggregate(
    name: &str,
    declared_index: usize,
    samples: &[Sample],
    track_alloc: bool,
    retries: u64,
) -> AggregateStat {
    let n = samples.len();
    let mut ns: Vec<f64> = samples.iter().map(|s| s.elapsed.as_nanos() as f64).collect();
    ns.sort_by(f64::total_cmp);

    let mean_ns = if n == 0 { 0.0 } else { ns.iter().sum::<f64>() / n as f64 };
    let std_dev_ns = if n < 2 {
        0.0
    } else {
        let var = ns.iter().map(|x| (x - mean_ns).powi(2)).sum::<f64>() / (n - 1) as f64;
        var.sqrt()
    };

    let mean_allocated_bytes = track_alloc.then(|| {
        if n == 0 {
            0.0
        } else {
            samples.iter().map(|s| s.allocated_bytes as f64).sum::<f64>() / n as f64
        }
    });

    AggregateStat {
        name: name.to_string(),
        declared_index,
        mean_ns,
        std_dev_ns,
        median_ns: quantile(&ns, 0.5),
        min_ns: ns.first().copied().unwrap_or(0.0),
        max_ns: ns.last().copied().unwrap_or(0.0),
        mean_allocated_bytes,
        sample_count: n as u64,
        retries,
    }
}

/// Upper bound on samples reserved up front; larger runs grow the buffer.
const MAX_PREALLOC_SAMPLES: usize = 1 << 20;

fn measure_strategy<I, O>(
    strategy: &StrategyDescriptor<I, O>,
    declared_index: usize,
    fixture: &I,
    cfg: &BenchConfig,
    track_alloc: bool,
) -> Result<AggregateStat, ExcludedStrategy> {
    let capacity = usize::try_from(cfg.iters)
        .map_or(MAX_PREALLOC_SAMPLES, |n| n.min(MAX_PREALLOC_SAMPLES));
    let mut samples = Vec::with_capacity(capacity);
    let mut retries = 0u64;

    for _ in 0..cfg.iters {
        let mut attempt = 0u32;
        loop {
            match measure_sample(strategy, fixture, track_alloc) {
                Ok(sample) => {
                    samples.push(sample);
                    break;
                }
                Err(source) if attempt >= cfg.max_retries => {
                    let err = BenchError::Strategy {
                        name: strategy.name().to_string(),
                        source,
                    };
                    warn!(error = %err, "excluding strategy after {} retries", attempt);
                    return Err(ExcludedStrategy {
                        name: strategy.name().to_string(),
                        declared_index,
                        reason: err.to_string(),
                        failures: retries + 1,
                    });
                }
                Err(_) => {
                    attempt += 1;
                    retries += 1;
                }
            }
        }
    }

    Ok(aggregate(
        strategy.name(),
        declared_index,
        &samples,
        track_alloc,
        retries,
    ))
}

/// Warm up and measure every strategy against the same fixture.
///
/// Measured phases run one strategy at a time, in declaration order, on the
/// calling thread. The fixture is only ever lent out by shared reference.
pub fn run<I, O>(fixture: &I, strategies: &[StrategyDescriptor<I, O>], cfg: &BenchConfig) -> RunOutcome
where
    I: Sync,
{
    let track_alloc = cfg.memory_diagnostics && alloc::is_active();
    if cfg.memory_diagnostics && !track_alloc {
        warn!("memory diagnostics requested but the counting allocator is not installed");
    }

    if cfg.parallel_warmup {
        strategies
            .par_iter()
            .for_each(|s| warm_up(s, fixture, cfg.warmup_iters));
    }

    let mut outcome = RunOutcome::default();
    for (idx, strategy) in strategies.iter().enumerate() {
        if !cfg.parallel_warmup {
            warm_up(strategy, fixture, cfg.warmup_iters);
        }

        match measure_strategy(strategy, idx, fixture, cfg, track_alloc) {
            Ok(stat) => {
                info!(
                    strategy = %stat.name,
                    samples = stat.sample_count,
                    mean_ns = stat.mean_ns,
                    "measured"
                );
                outcome.stats.push(stat);
            }
            Err(excluded) => outcome.excluded.push(excluded),
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{sample_dto, Book, BookDto};
    use crate::strategies::registry;
    use crate::StrategyKind;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    fn tiny_config() -> BenchConfig {
        BenchConfig {
            iters: 50,
            warmup_iters: 5,
            ..BenchConfig::default()
        }
    }

    fn failing(name: &str) -> StrategyDescriptor<BookDto, Book> {
        StrategyDescriptor::new(name, |_: &BookDto| Err(MapError::Conversion("boom".to_string())))
    }

    #[test]
    fn test_profile_presets() {
        let quick = BenchConfig::from_profile(Profile::Quick);
        let full = BenchConfig::from_profile(Profile::Full);
        assert!(full.iters > quick.iters);
        assert!(full.warmup_iters > quick.warmup_iters);
        assert_eq!(quick.max_retries, 3);
    }

    #[test]
    fn test_equal_sample_counts() {
        let dto = sample_dto();
        let outcome = run(&dto, &registry(&[]), &tiny_config());
        assert!(outcome.excluded.is_empty());
        assert_eq!(outcome.stats.len(), 5);
        for (idx, stat) in outcome.stats.iter().enumerate() {
            assert_eq!(stat.sample_count, 50);
            assert_eq!(stat.declared_index, idx);
            assert_eq!(stat.retries, 0);
            assert!(stat.min_ns <= stat.median_ns && stat.median_ns <= stat.max_ns);
        }
    }

    #[test]
    fn test_fixture_unchanged_after_run() {
        let dto = sample_dto();
        let before = dto.clone();
        let cfg = BenchConfig {
            parallel_warmup: true,
            ..tiny_config()
        };
        run(&dto, &registry(&[]), &cfg);
        assert_eq!(dto, before);
    }

    #[test]
    fn test_zero_iterations_yield_empty_stats() {
        let dto = sample_dto();
        let cfg = BenchConfig {
            iters: 0,
            ..tiny_config()
        };
        let mut strategies = registry(&[]);
        strategies.push(failing("always_fails"));

        let outcome = run(&dto, &strategies, &cfg);
        assert!(outcome.excluded.is_empty());
        assert_eq!(outcome.stats.len(), 6);
        for stat in &outcome.stats {
            assert_eq!(stat.sample_count, 0);
            assert_eq!(stat.mean_ns, 0.0);
        }
    }

    #[test]
    fn test_failing_strategy_is_excluded() {
        let dto = sample_dto();
        let mut strategies = registry(&[StrategyKind::Manual]);
        strategies.insert(0, failing("always_fails"));
        let outcome = run(&dto, &strategies, &tiny_config());

        assert_eq!(outcome.excluded.len(), 1);
        let excluded = &outcome.excluded[0];
        assert_eq!(excluded.name, "always_fails");
        assert_eq!(excluded.declared_index, 0);
        assert_eq!(excluded.failures, 4);
        assert!(excluded.reason.contains("boom"));

        assert_eq!(outcome.stats.len(), 1);
        assert_eq!(outcome.stats[0].name, "manual");
        assert_eq!(outcome.stats[0].sample_count, 50);
    }

    #[test]
    fn test_huge_iteration_count_caps_reservation() {
        let dto = sample_dto();
        let cfg = BenchConfig {
            iters: u64::MAX,
            warmup_iters: 0,
            ..tiny_config()
        };
        // Fails on the first sample, so only the reservation is exercised.
        let outcome = run(&dto, &[failing("always_fails")], &cfg);
        assert!(outcome.stats.is_empty());
        assert_eq!(outcome.excluded.len(), 1);
        assert_eq!(outcome.excluded[0].failures, 4);
    }

    #[test]
    fn test_transient_failures_are_retried() {
        let dto = sample_dto();
        let calls = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&calls);
        // Every third call fails; one retry is always enough.
        let flaky = StrategyDescriptor::new("flaky", move |d: &BookDto| {
            if counter.fetch_add(1, Ordering::Relaxed) % 3 == 2 {
                Err(MapError::Conversion("transient".to_string()))
            } else {
                crate::strategies::manual::map_book(d)
            }
        });
        let cfg = BenchConfig {
            warmup_iters: 0,
            max_retries: 1,
            ..tiny_config()
        };

        let outcome = run(&dto, &[flaky], &cfg);
        assert!(outcome.excluded.is_empty());
        assert_eq!(outcome.stats[0].sample_count, 50);
        assert!(outcome.stats[0].retries > 0);
    }

    #[test]
    fn test_allocations_recorded_when_enabled() {
        let dto = sample_dto();
        let outcome = run(&dto, &registry(&[StrategyKind::Manual]), &tiny_config());
        let allocated = outcome.stats[0].mean_allocated_bytes.unwrap();
        assert!(allocated > 0.0);
    }

    #[test]
    fn test_allocations_absent_when_disabled() {
        let dto = sample_dto();
        let cfg = BenchConfig {
            memory_diagnostics: false,
            ..tiny_config()
        };
        let outcome = run(&dto, &registry(&[StrategyKind::Manual]), &cfg);
        assert!(outcome.stats[0].mean_allocated_bytes.is_none());
    }

    #[test]
    fn test_aggregate_statistics() {
        let samples: Vec<Sample> = [10u64, 20, 30, 40]
            .iter()
            .map(|&ns| Sample {
                elapsed: Duration::from_nanos(ns),
                allocated_bytes: ns * 2,
            })
            .collect();
        let stat = aggregate("x", 3, &samples, true, 0);
        assert_eq!(stat.mean_ns, 25.0);
        assert_eq!(stat.min_ns, 10.0);
        assert_eq!(stat.max_ns, 40.0);
        assert_eq!(stat.sample_count, 4);
        assert_eq!(stat.mean_allocated_bytes, Some(50.0));
        // Sample std-dev of 10,20,30,40.
        assert!((stat.std_dev_ns - 12.909_944).abs() < 1e-4);
    }
}
