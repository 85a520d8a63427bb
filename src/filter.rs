use crate::error::{FilterError, Result};
use crate::monitor::{Monitor, NoopMonitor};
use crate::raster::{allocate_output, try_filled_vec, RasterShape};
use crate::window::{pixel_count, Window};
use log::{debug, info};
use ndarray::parallel::prelude::*;
use ndarray::{
    s, Array2, Array3, ArrayBase, ArrayView1, ArrayView2, ArrayView3, ArrayViewMut2,
    ArrayViewMut3, Axis, Data, Ix3,
};
use num_traits::AsPrimitive;
use std::fmt;

/// How the clamped-window mean is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Direct summation of every window. O(k²) per pixel; kept as the reference.
    Naive,
    /// Row then column sliding sums. O(1) per pixel regardless of half-size.
    Separable,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Strategy::Naive => "naive",
            Strategy::Separable => "separable",
        })
    }
}

/// Validated window radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfSize(usize);

impl HalfSize {
    pub fn new(half_size: i64) -> Result<Self> {
        usize::try_from(half_size)
            .map(Self)
            .map_err(|_| FilterError::InvalidHalfSize(half_size))
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Side length of an unclamped window.
    pub fn window_side(self) -> usize {
        self.0.saturating_mul(2).saturating_add(1)
    }
}

/// Replace every sample with the mean of its clamped square neighborhood, per band.
///
/// The input may hold any primitive numeric type and any memory layout; the
/// output is a freshly allocated float32 buffer of the same shape in standard
/// (band-major) layout.
pub fn uniform_filter<S, T>(
    input: &ArrayBase<S, Ix3>,
    half_size: i64,
    strategy: Strategy,
) -> Result<Array3<f32>>
where
    S: Data<Elem = T>,
    T: AsPrimitive<f64> + Sync,
{
    uniform_filter_with(input, half_size, strategy, &NoopMonitor)
}

/// Same as [`uniform_filter`], reporting progress to and polling cancellation from `monitor`.
pub fn uniform_filter_with<S, T>(
    input: &ArrayBase<S, Ix3>,
    half_size: i64,
    strategy: Strategy,
    monitor: &dyn Monitor,
) -> Result<Array3<f32>>
where
    S: Data<Elem = T>,
    T: AsPrimitive<f64> + Sync,
{
    let half = HalfSize::new(half_size)?;
    let shape = RasterShape::of(input);
    shape.validate()?;

    info!(
        "Filtering {} bands of {}x{} (half-size {}, window {}x{}, {})",
        shape.bands,
        shape.rows,
        shape.cols,
        half.get(),
        half.window_side(),
        half.window_side(),
        strategy
    );

    let mut output = allocate_output(shape)?;
    filter_into(input.view(), half, strategy, monitor, output.view_mut())?;
    Ok(output)
}

/// Filter `input` into a pre-allocated `output` of identical shape.
///
/// Bands run in parallel; each worker writes only its own output band.
pub(crate) fn filter_into<T>(
    input: ArrayView3<'_, T>,
    half: HalfSize,
    strategy: Strategy,
    monitor: &dyn Monitor,
    mut output: ArrayViewMut3<'_, f32>,
) -> Result<()>
where
    T: AsPrimitive<f64> + Sync,
{
    debug_assert_eq!(input.dim(), output.dim());

    output
        .outer_iter_mut()
        .into_par_iter()
        .zip(input.outer_iter())
        .enumerate()
        .try_for_each(|(band, (out_band, in_band))| {
            debug!("Processing band {} ({})", band, strategy);
            match strategy {
                Strategy::Naive => naive_band(in_band, half.get(), out_band, band, monitor),
                Strategy::Separable => {
                    separable_band(in_band, half.get(), out_band, band, monitor)
                }
            }
        })
}

fn naive_band<T>(
    input: ArrayView2<'_, T>,
    half: usize,
    mut output: ArrayViewMut2<'_, f32>,
    band: usize,
    monitor: &dyn Monitor,
) -> Result<()>
where
    T: AsPrimitive<f64>,
{
    let (rows, cols) = input.dim();

    for (row, mut out_row) in output.outer_iter_mut().enumerate() {
        if monitor.is_cancelled() {
            return Err(FilterError::Cancelled);
        }

        let row_window = Window::clamped(row, rows, half);
        for (col, out) in out_row.iter_mut().enumerate() {
            let col_window = Window::clamped(col, cols, half);

            let mut sum = 0.0f64;
            for y in row_window.range() {
                for x in col_window.range() {
                    sum += input[[y, x]].as_();
                }
            }
            *out = (sum / pixel_count(row_window, col_window) as f64) as f32;
        }

        monitor.rows_done(band, 1);
    }

    Ok(())
}

fn separable_band<T>(
    input: ArrayView2<'_, T>,
    half: usize,
    mut output: ArrayViewMut2<'_, f32>,
    band: usize,
    monitor: &dyn Monitor,
) -> Result<()>
where
    T: AsPrimitive<f64> + Sync,
{
    let (rows, cols) = input.dim();
    let mut row_sums =
        Array2::from_shape_vec((rows, cols), try_filled_vec(rows * cols, 0.0f64)?)?;

    // Horizontal pass: clamped window sums along each row, division deferred
    row_sums
        .outer_iter_mut()
        .into_par_iter()
        .zip(input.outer_iter())
        .try_for_each(|(mut dst, src)| {
            if monitor.is_cancelled() {
                return Err(FilterError::Cancelled);
            }
            sliding_sums(src, half, |col, sum, _| dst[col] = sum);
            Ok(())
        })?;

    // Vertical pass over the row sums, then divide by the 2-D window size
    output
        .axis_iter_mut(Axis(1))
        .into_par_iter()
        .zip(row_sums.axis_iter(Axis(1)))
        .enumerate()
        .try_for_each(|(col, (mut dst, src))| {
            if monitor.is_cancelled() {
                return Err(FilterError::Cancelled);
            }
            let width = Window::clamped(col, cols, half).len();
            sliding_sums(src, half, |row, sum, height| {
                dst[row] = (sum / (height * width) as f64) as f32;
            });
            Ok(())
        })?;

    monitor.rows_done(band, rows);
    Ok(())
}

/// Walk a clamped window of radius `half` along `src`, calling
/// `emit(index, window_sum, window_len)` for every position.
///
/// Advancing one sample drops the one leaving on the left (if any) and adds
/// the one entering on the right (if any), so the window narrows near both
/// ends exactly as [`Window::clamped`] does. Dropping first keeps a zero
/// half-size exact.
fn sliding_sums<T, F>(src: ArrayView1<'_, T>, half: usize, mut emit: F)
where
    T: AsPrimitive<f64>,
    F: FnMut(usize, f64, usize),
{
    let n = src.len();
    if n == 0 {
        return;
    }
    let half = half.min(n - 1);

    let mut sum: f64 = src.slice(s![..=half]).iter().map(|&v| v.as_()).sum();
    let mut width = half + 1;
    emit(0, sum, width);

    for i in 1..n {
        if i > half {
            sum -= src[i - half - 1].as_();
            width -= 1;
        }
        let entering = i + half;
        if entering < n {
            sum += src[entering].as_();
            width += 1;
        }
        debug_assert_eq!(width, Window::clamped(i, n, half).len());
        emit(i, sum, width);
    }
}
