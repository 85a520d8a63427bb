use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid half-size: {0} (must be non-negative)")]
    InvalidHalfSize(i64),

    #[error("Raster has invalid dimensions: {bands} bands x {rows} rows x {cols} cols")]
    InvalidDimensions {
        bands: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Failed to allocate output buffer of {0} samples")]
    AllocationFailed(usize),

    #[error("Filtering was cancelled")]
    Cancelled,

    #[error("Invalid tile size: {0} (must be positive)")]
    InvalidTileSize(usize),

    #[error("Invalid number of tries: {0} (must be positive)")]
    InvalidTries(usize),

    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, FilterError>;
