use crate::error::{FilterError, Result};
use log::debug;
use ndarray::{Array3, ArrayBase, Data, Ix3};

/// Extents of a band-major raster buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterShape {
    pub bands: usize,
    pub rows: usize,
    pub cols: usize,
}

impl RasterShape {
    pub fn new(bands: usize, rows: usize, cols: usize) -> Self {
        Self { bands, rows, cols }
    }

    pub fn of<S: Data>(input: &ArrayBase<S, Ix3>) -> Self {
        let (bands, rows, cols) = input.dim();
        Self { bands, rows, cols }
    }

    /// Reject rasters with an empty axis.
    pub fn validate(&self) -> Result<()> {
        if self.bands == 0 || self.rows == 0 || self.cols == 0 {
            return Err(FilterError::InvalidDimensions {
                bands: self.bands,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    pub fn dim(&self) -> (usize, usize, usize) {
        (self.bands, self.rows, self.cols)
    }

    /// Total number of samples, or `None` if it does not fit in `usize`.
    pub fn sample_count(&self) -> Option<usize> {
        self.bands
            .checked_mul(self.rows)
            .and_then(|n| n.checked_mul(self.cols))
    }
}

/// Allocate a zeroed float32 output buffer, surfacing allocator refusal as an error.
pub fn allocate_output(shape: RasterShape) -> Result<Array3<f32>> {
    let len = shape.sample_count().ok_or(FilterError::AllocationFailed(usize::MAX))?;
    let samples = try_filled_vec(len, 0.0f32)?;

    debug!(
        "Allocated output buffer: {} bands x {} rows x {} cols",
        shape.bands, shape.rows, shape.cols
    );

    Ok(Array3::from_shape_vec(shape.dim(), samples)?)
}

/// Vector of `len` copies of `value`, or `AllocationFailed` if the allocator refuses.
pub(crate) fn try_filled_vec<A: Clone>(len: usize, value: A) -> Result<Vec<A>> {
    let mut samples = Vec::new();
    samples
        .try_reserve_exact(len)
        .map_err(|_| FilterError::AllocationFailed(len))?;
    samples.resize(len, value);
    Ok(samples)
}
