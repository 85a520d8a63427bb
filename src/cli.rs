use crate::bench::BenchConfig;
use crate::filter::Strategy;
use crate::raster::RasterShape;
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Direct window summation (reference)
    Naive,
    /// Row/column sliding sums
    Separable,
    /// Run both, naive first
    All,
}

impl StrategyArg {
    pub fn strategies(self) -> Vec<Strategy> {
        match self {
            StrategyArg::Naive => vec![Strategy::Naive],
            StrategyArg::Separable => vec![Strategy::Separable],
            StrategyArg::All => vec![Strategy::Naive, Strategy::Separable],
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "uniform-filter")]
#[command(about = "Time the clamped-window mean filter on a synthetic multi-band raster")]
#[command(version)]
pub struct Args {
    /// Number of bands of the synthetic raster
    #[arg(long, default_value_t = 4)]
    pub bands: usize,

    /// Number of rows of the synthetic raster
    #[arg(long, default_value_t = 1024)]
    pub rows: usize,

    /// Number of columns of the synthetic raster
    #[arg(long, default_value_t = 1024)]
    pub cols: usize,

    /// Window half-size in pixels (window side is 2 * N + 1)
    #[arg(
        short = 'k',
        long,
        value_name = "N",
        default_value_t = 3,
        allow_negative_numbers = true
    )]
    pub half_size: i64,

    /// Filter strategy to run
    #[arg(short, long, value_enum, default_value_t = StrategyArg::All)]
    pub strategy: StrategyArg,

    /// Number of timed runs per strategy
    #[arg(short = 'n', long, default_value_t = 1)]
    pub tries: usize,

    /// Seed of the synthetic raster
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Filter in square tiles of this size instead of the whole raster at once
    #[arg(long, value_name = "PIXELS")]
    pub tile_size: Option<usize>,

    /// Check that the separable output matches the naive one
    #[arg(long)]
    pub verify: bool,

    /// Log progress of each run
    #[arg(long)]
    pub progress: bool,

    /// Number of threads (default: all available)
    #[arg(short, long, value_name = "N")]
    pub threads: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn bench_config(&self) -> BenchConfig {
        BenchConfig {
            shape: RasterShape::new(self.bands, self.rows, self.cols),
            half_size: self.half_size,
            strategies: self.strategy.strategies(),
            tries: self.tries,
            seed: self.seed,
            tile_size: self.tile_size,
            verify: self.verify,
            progress: self.progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["uniform-filter"]).unwrap();
        let config = args.bench_config();
        assert_eq!(config.shape, RasterShape::new(4, 1024, 1024));
        assert_eq!(config.half_size, 3);
        assert_eq!(config.strategies, vec![Strategy::Naive, Strategy::Separable]);
        assert_eq!(config.tries, 1);
        assert!(config.tile_size.is_none());
    }

    #[test]
    fn test_negative_half_size_reaches_validation() {
        let args = Args::try_parse_from(["uniform-filter", "--half-size", "-1"]).unwrap();
        assert_eq!(args.half_size, -1);
    }

    #[test]
    fn test_strategy_and_tiles() {
        let args = Args::try_parse_from([
            "uniform-filter",
            "-s",
            "separable",
            "--tile-size",
            "256",
            "-n",
            "5",
        ])
        .unwrap();
        let config = args.bench_config();
        assert_eq!(config.strategies, vec![Strategy::Separable]);
        assert_eq!(config.tile_size, Some(256));
        assert_eq!(config.tries, 5);
    }
}
