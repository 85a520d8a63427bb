use clap::Parser;
use env_logger::Env;
use log::{info, warn};

use uniform_filter::bench::{self, VERIFY_TOLERANCE};
use uniform_filter::cli::Args;
use uniform_filter::Result;

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    info!("=== Uniform Filter Benchmark ===");

    // Set thread pool size if specified
    if let Some(n_threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n_threads)
            .build_global()?;
        info!("Using {} threads", n_threads);
    } else {
        info!("Using all available threads");
    }

    let config = args.bench_config();
    if let Some(tile_size) = config.tile_size {
        info!("Tiled execution: {}x{} tiles", tile_size, tile_size);
    }

    let report = bench::run_benchmark(&config)?;

    for run in &report.runs {
        info!(
            "{:>10}: {:.6} s mean, {:.6} s best over {} tries",
            run.strategy, run.mean_seconds, run.min_seconds, run.tries
        );
    }
    if let Some(diff) = report.max_abs_diff {
        if diff > VERIFY_TOLERANCE {
            warn!("Verification failed (max abs diff {:e})", diff);
        }
    }

    info!("=== Done! ===");
    Ok(())
}
