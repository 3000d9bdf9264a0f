use clap::{Parser, ValueEnum};
use mapper_bench::alloc::CountingAlloc;
use mapper_bench::error::Result;
use mapper_bench::harness::{self, BenchConfig, Profile};
use mapper_bench::report::{self, RenderOptions, ReportFormat, DEFAULT_OUTPUT, DEFAULT_TITLE};
use mapper_bench::schema::{BenchReport, RunMeta};
use mapper_bench::{fixture, rank, strategies, OrderPolicy, StrategyKind};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProfileArg {
    Quick,
    Full,
}

impl From<ProfileArg> for Profile {
    fn from(v: ProfileArg) -> Self {
        match v {
            ProfileArg::Quick => Profile::Quick,
            ProfileArg::Full => Profile::Full,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "mapper-bench")]
#[command(about = "Compare DTO-to-domain mapping strategies and render a ranked report")]
struct Args {
    /// Iteration preset; `--iters` and `--warmup-iters` override it.
    #[arg(long, value_enum, default_value_t = ProfileArg::Quick)]
    profile: ProfileArg,

    /// Measured invocations per strategy.
    #[arg(long)]
    iters: Option<u64>,

    /// Unmeasured invocations per strategy before measuring.
    #[arg(long)]
    warmup_iters: Option<u64>,

    /// Extra attempts per failing sample before a strategy is excluded.
    #[arg(long, default_value_t = 3)]
    max_retries: u32,

    /// Fixture seed. Drawn from OS entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Report file; the extension picks the format (.html, .md, .json).
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    out: PathBuf,

    /// Also write the full JSON report here.
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_TITLE)]
    title: String,

    /// Skip allocation tracking.
    #[arg(long, default_value_t = false)]
    no_memory: bool,

    #[arg(long, value_enum, default_value_t = OrderPolicy::FastestToSlowest)]
    order: OrderPolicy,

    /// Warm all strategies concurrently before measuring.
    #[arg(long, default_value_t = false)]
    parallel_warmup: bool,

    /// Do not highlight the fastest row.
    #[arg(long, default_value_t = false)]
    no_highlight: bool,

    /// Benchmark only these strategies (repeatable). Defaults to all.
    #[arg(long, value_enum, value_name = "STRATEGY", num_args = 1.., action = clap::ArgAction::Append)]
    only: Vec<StrategyKind>,
}

fn timestamp_utc() -> String {
    // Seconds since the epoch; enough to order runs.
    use std::time::{SystemTime, UNIX_EPOCH};
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("unix:{secs}")
}

/// Commit the run was built from, as exported by the build environment.
fn git_sha_short() -> Option<String> {
    ["MAPPER_BENCH_GIT_SHA", "GIT_SHA", "GITHUB_SHA"]
        .iter()
        .find_map(|key| std::env::var(key).ok().and_then(|raw| short_sha(&raw)))
}

/// First 12 hex digits of a commit id; anything else is ignored.
fn short_sha(raw: &str) -> Option<String> {
    let sha = raw.trim();
    if sha.len() < 7 || !sha.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(sha.chars().take(12).collect())
}

fn bench_config(args: &Args) -> BenchConfig {
    let mut cfg = BenchConfig::from_profile(args.profile.into());
    if let Some(iters) = args.iters {
        cfg.iters = iters;
    }
    if let Some(warmup) = args.warmup_iters {
        cfg.warmup_iters = warmup;
    }
    cfg.max_retries = args.max_retries;
    cfg.memory_diagnostics = !args.no_memory;
    cfg.parallel_warmup = args.parallel_warmup;
    cfg
}

fn run(args: Args) -> Result<()> {
    let cfg = bench_config(&args);
    // Reject an unusable format before spending time on measurement.
    ReportFormat::from_path(&args.out)?;
    let options = RenderOptions {
        title: args.title.clone(),
        highlight_fastest: !args.no_highlight,
    };

    let seed = fixture::resolve_seed(args.seed)?;
    let dto = fixture::generate(&mut fixture::seeded_rng(seed))?;
    let fixture_sha256 = fixture::fingerprint(&dto)?;
    info!(seed, fixture = %fixture_sha256, "fixture ready");

    let registered = strategies::registry(&args.only);
    info!(
        strategies = registered.len(),
        iters = cfg.iters,
        warmup_iters = cfg.warmup_iters,
        profile = cfg.profile.as_str(),
        "starting measurement"
    );
    let outcome = harness::run(&dto, &registered, &cfg);

    let report = BenchReport {
        run: RunMeta {
            schema_version: 1,
            bench_version: env!("CARGO_PKG_VERSION").to_string(),
            profile: cfg.profile.as_str().to_string(),
            seed,
            timestamp_utc: timestamp_utc(),
            git_sha: git_sha_short(),
            fixture_sha256,
            iters: cfg.iters,
            warmup_iters: cfg.warmup_iters,
            order: args.order,
        },
        ranked: rank::rank(&outcome.stats, args.order),
        excluded: outcome.excluded,
    };

    // Results reach stderr before any file is written.
    eprintln!("{}", report::console_table(&report, &options));

    report::render(&report, &args.out, &options)?;
    info!(path = %args.out.display(), "report written");

    if let Some(path) = &args.json {
        report::render_as(&report, path, ReportFormat::Json, &options)?;
        info!(path = %path.display(), "json report written");
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mapper_bench=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
