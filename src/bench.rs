use crate::error::{FilterError, Result};
use crate::filter::{uniform_filter_with, HalfSize, Strategy};
use crate::monitor::{LogProgress, Monitor, NoopMonitor};
use crate::raster::RasterShape;
use crate::tiling::filter_tiled;
use log::{debug, info, warn};
use ndarray::Array3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

/// Largest absolute difference tolerated between the two strategies.
pub const VERIFY_TOLERANCE: f32 = 1e-3;

/// Parameters of one benchmark session.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub shape: RasterShape,
    pub half_size: i64,
    pub strategies: Vec<Strategy>,
    pub tries: usize,
    pub seed: u64,
    /// Filter tile by tile when set.
    pub tile_size: Option<usize>,
    /// Compare the separable output against the naive one.
    pub verify: bool,
    /// Log progress of every run at each completed tenth.
    pub progress: bool,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub strategy: Strategy,
    pub tries: usize,
    pub mean_seconds: f64,
    pub min_seconds: f64,
}

#[derive(Debug, Clone)]
pub struct BenchReport {
    pub runs: Vec<RunReport>,
    /// Largest |naive - separable| over all samples, when verification ran.
    pub max_abs_diff: Option<f32>,
}

/// Reproducible random raster with samples in `[0, 255)`.
pub fn synthetic_raster(shape: RasterShape, seed: u64) -> Result<Array3<f32>> {
    shape.validate()?;
    let mut rng = StdRng::seed_from_u64(seed);
    Ok(Array3::from_shape_simple_fn(shape.dim(), || {
        rng.gen_range(0.0f32..255.0)
    }))
}

/// Run every configured strategy `tries` times on a synthetic raster and time it.
pub fn run_benchmark(config: &BenchConfig) -> Result<BenchReport> {
    if config.tries == 0 {
        return Err(FilterError::InvalidTries(config.tries));
    }
    HalfSize::new(config.half_size)?;

    info!(
        "Generating synthetic raster: {} bands x {} rows x {} cols (seed {})",
        config.shape.bands, config.shape.rows, config.shape.cols, config.seed
    );
    let raster = synthetic_raster(config.shape, config.seed)?;

    let mut runs = Vec::with_capacity(config.strategies.len());
    let mut naive_output = None;
    let mut separable_output = None;

    for &strategy in &config.strategies {
        info!("{} execution...", strategy);
        let mut total = 0.0f64;
        let mut min = f64::INFINITY;
        let mut last = None;

        for attempt in 0..config.tries {
            let start = Instant::now();
            let output = run_once(&raster, config, strategy, attempt)?;
            let elapsed = start.elapsed().as_secs_f64();

            debug!("{} try {}: {:.6} seconds", strategy, attempt + 1, elapsed);
            total += elapsed;
            min = min.min(elapsed);
            last = Some(output);
        }

        let report = RunReport {
            strategy,
            tries: config.tries,
            mean_seconds: total / config.tries as f64,
            min_seconds: min,
        };
        info!(
            "{} execution {:.6} seconds (mean of {}, best {:.6})",
            strategy, report.mean_seconds, report.tries, report.min_seconds
        );
        runs.push(report);

        match strategy {
            Strategy::Naive => naive_output = last,
            Strategy::Separable => separable_output = last,
        }
    }

    let max_abs_diff = if config.verify {
        let naive = match naive_output {
            Some(out) => out,
            None => run_once(&raster, config, Strategy::Naive, 0)?,
        };
        let separable = match separable_output {
            Some(out) => out,
            None => run_once(&raster, config, Strategy::Separable, 0)?,
        };
        let diff = max_abs_diff(&naive, &separable);

        if diff > VERIFY_TOLERANCE {
            warn!("Strategies disagree: max |naive - separable| = {:e}", diff);
        } else {
            info!("Strategies agree: max |naive - separable| = {:e}", diff);
        }
        Some(diff)
    } else {
        None
    };

    Ok(BenchReport { runs, max_abs_diff })
}

fn run_once(
    raster: &Array3<f32>,
    config: &BenchConfig,
    strategy: Strategy,
    attempt: usize,
) -> Result<Array3<f32>> {
    let (bands, rows, _) = raster.dim();
    let progress;
    let monitor: &dyn Monitor = if config.progress {
        progress = LogProgress::new(format!("{} try {}", strategy, attempt + 1), bands * rows);
        &progress
    } else {
        &NoopMonitor
    };

    match config.tile_size {
        Some(tile_size) => filter_tiled(raster, config.half_size, strategy, tile_size, monitor),
        None => uniform_filter_with(raster, config.half_size, strategy, monitor),
    }
}

pub fn max_abs_diff(a: &Array3<f32>, b: &Array3<f32>) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f32::max)
}
