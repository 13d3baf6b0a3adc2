//! quadlane - cross-tier equivalence runner
//!
//! Runs the iterative multiply harness on every tier the CPU supports (or on one tier)
//! and exits non-zero if the running totals disagree.
//!
//! Usage: `quadlane [iterations] [--increment X] [--tier NAME] [--seed N]`
//!
//! The iteration count may sit anywhere among the flags; a second positional argument or
//! an unknown flag is rejected. `--seed` replaces the default starting vector and matrix
//! with seeded random ones.
//! Log verbosity follows `RUST_LOG` (default `quadlane=info`).

use std::process::ExitCode;
use std::str::FromStr;

use quadlane::harness::{self, DEFAULT_TOLERANCE};
use quadlane::{DotLanes, HarnessConfig, KernelError, SeedGen, Tier};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

struct Args {
    config: HarnessConfig,
    tier: Option<Tier>,
    seed: Option<u64>,
}

fn flag_value<T: FromStr>(flag: &str, raw: Option<&String>) -> Result<T, String> {
    let raw = raw.ok_or_else(|| format!("{flag} expects a value"))?;
    raw.parse()
        .map_err(|_| format!("invalid value for {flag}: {raw:?}"))
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut config = HarnessConfig::default();
    let mut tier = None;
    let mut seed = None;
    let mut iterations: Option<usize> = None;

    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--increment" => config = config.with_increment(flag_value(arg, rest.next())?),
            "--tier" => {
                let name = rest.next().ok_or("--tier expects a value")?;
                tier = Some(Tier::from_str(name).map_err(|e| e.to_string())?);
            }
            "--seed" => seed = Some(flag_value(arg, rest.next())?),
            flag if flag.starts_with("--") => return Err(format!("unknown flag: {flag}")),
            positional => {
                if iterations.is_some() {
                    return Err(format!("unexpected argument: {positional:?}"));
                }
                let count = positional
                    .parse()
                    .map_err(|_| format!("invalid iteration count: {positional:?}"))?;
                iterations = Some(count);
            }
        }
    }

    if let Some(iterations) = iterations {
        config = config.with_iterations(iterations);
    }

    Ok(Args { config, tier, seed })
}

/// `RUST_LOG` when set and valid, `quadlane=info` otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("quadlane=info"))
}

fn run(args: Args) -> quadlane::Result<()> {
    let mut config = args.config;
    if let Some(seed) = args.seed {
        let mut seeds = SeedGen::new(seed);
        config = config
            .with_vec(seeds.vec4(0.0..4.0))
            .with_mat(seeds.mat4(0.0..4.0));
        info!(seed, vec = %config.vec, "using seeded inputs");
    }

    info!(
        native = %Tier::native(),
        best = %Tier::best(),
        iterations = config.iterations,
        "quadlane harness"
    );

    let reports = match args.tier {
        Some(tier) => vec![harness::run(tier, &config)?],
        None => harness::run_all(&config)?,
    };

    for report in &reports {
        info!(
            tier = %report.tier,
            total = %report.total,
            dual_calls = report.dual_calls,
            single_calls = report.single_calls,
            elapsed_us = report.elapsed.as_micros() as u64,
            "result"
        );
    }

    if Tier::Sse.is_supported() {
        for lanes in [DotLanes::Four, DotLanes::Three] {
            let scalar = harness::run_dot(Tier::Scalar, config.iterations, lanes);
            let sse = harness::run_dot(Tier::Sse, config.iterations, lanes);
            info!(lanes = lanes.count(), scalar, sse, "dot harness");
        }
    }

    harness::verify_equivalence(&reports, DEFAULT_TOLERANCE)?;
    info!(tiers = reports.len(), "all tiers agree");
    Ok(())
}

fn main() -> ExitCode {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .init();

    let argv: Vec<String> = std::env::args().collect();
    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(message) => {
            error!("{message}");
            eprintln!("usage: quadlane [iterations] [--increment X] [--tier NAME] [--seed N]");
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err @ KernelError::Divergence { .. }) => {
            error!("tiers diverged: {err}");
            ExitCode::FAILURE
        }
        Err(err) => {
            error!("{err}");
            ExitCode::from(2)
        }
    }
}
