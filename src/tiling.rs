use crate::error::{FilterError, Result};
use crate::filter::{filter_into, HalfSize, Strategy};
use crate::monitor::Monitor;
use crate::raster::{allocate_output, RasterShape};
use log::{debug, info};
use ndarray::{s, Array3, ArrayBase, Data, Ix3};
use num_traits::AsPrimitive;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileBounds {
    // Output bounds (what we write to output)
    pub output_row_min: usize,
    pub output_col_min: usize,
    pub output_row_max: usize,
    pub output_col_max: usize,

    // Read bounds (output bounds plus the filter halo)
    pub read_row_min: usize,
    pub read_col_min: usize,
    pub read_row_max: usize,
    pub read_col_max: usize,

    // Halo actually available on each side (less at the raster edge)
    pub pad_top: usize,
    pub pad_left: usize,
    pub pad_bottom: usize,
    pub pad_right: usize,
}

impl TileBounds {
    pub fn read_rows(&self) -> usize {
        self.read_row_max - self.read_row_min
    }

    pub fn read_cols(&self) -> usize {
        self.read_col_max - self.read_col_min
    }

    pub fn output_rows(&self) -> usize {
        self.output_row_max - self.output_row_min
    }

    pub fn output_cols(&self) -> usize {
        self.output_col_max - self.output_col_min
    }
}

/// Regular grid of square tiles over the spatial extent of a raster.
#[derive(Debug, Clone)]
pub struct TileGrid {
    rows: usize,
    cols: usize,
    tile_size: usize,
    padding: usize,
    pub tiles_x: usize,
    pub tiles_y: usize,
    pub total_tiles: usize,
}

impl TileGrid {
    pub fn new(rows: usize, cols: usize, tile_size: usize, padding: usize) -> Result<Self> {
        if tile_size == 0 {
            return Err(FilterError::InvalidTileSize(tile_size));
        }

        let tiles_x = cols.div_ceil(tile_size);
        let tiles_y = rows.div_ceil(tile_size);
        let total_tiles = tiles_x * tiles_y;

        debug!(
            "TileGrid: {}x{} raster, tile_size={}, padding={} -> {}x{} tiles ({} total)",
            rows, cols, tile_size, padding, tiles_y, tiles_x, total_tiles
        );

        Ok(Self {
            rows,
            cols,
            tile_size,
            padding,
            tiles_x,
            tiles_y,
            total_tiles,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, TileBounds)> + '_ {
        (0..self.total_tiles).map(move |idx| (idx, self.tile_bounds(idx)))
    }

    pub fn tile_bounds(&self, tile_idx: usize) -> TileBounds {
        let tile_y = tile_idx / self.tiles_x;
        let tile_x = tile_idx % self.tiles_x;

        let output_row_min = tile_y * self.tile_size;
        let output_col_min = tile_x * self.tile_size;
        let output_row_max = ((tile_y + 1) * self.tile_size).min(self.rows);
        let output_col_max = ((tile_x + 1) * self.tile_size).min(self.cols);

        let read_row_min = output_row_min.saturating_sub(self.padding);
        let read_col_min = output_col_min.saturating_sub(self.padding);
        let read_row_max = output_row_max.saturating_add(self.padding).min(self.rows);
        let read_col_max = output_col_max.saturating_add(self.padding).min(self.cols);

        TileBounds {
            output_row_min,
            output_col_min,
            output_row_max,
            output_col_max,
            read_row_min,
            read_col_min,
            read_row_max,
            read_col_max,
            pad_top: output_row_min - read_row_min,
            pad_left: output_col_min - read_col_min,
            pad_bottom: read_row_max - output_row_max,
            pad_right: read_col_max - output_col_max,
        }
    }

    /// Whether `tile_idx` is the last tile of its tile row.
    pub fn ends_tile_row(&self, tile_idx: usize) -> bool {
        tile_idx % self.tiles_x == self.tiles_x - 1
    }
}

/// Cancellation passes through; row counts are reported per finished tile row instead.
struct TileMonitor<'a>(&'a dyn Monitor);

impl Monitor for TileMonitor<'_> {
    fn is_cancelled(&self) -> bool {
        self.0.is_cancelled()
    }
}

/// Filter a raster tile by tile, reading each tile with a halo of `half_size` samples.
///
/// Only one padded tile is filtered at a time, which bounds the scratch memory
/// of the separable strategy. The result is identical to [`crate::uniform_filter`]:
/// the halo either covers the whole window or reaches the true raster edge.
pub fn filter_tiled<S, T>(
    input: &ArrayBase<S, Ix3>,
    half_size: i64,
    strategy: Strategy,
    tile_size: usize,
    monitor: &dyn Monitor,
) -> Result<Array3<f32>>
where
    S: Data<Elem = T>,
    T: AsPrimitive<f64> + Sync,
{
    let half = HalfSize::new(half_size)?;
    let shape = RasterShape::of(input);
    shape.validate()?;

    let grid = TileGrid::new(shape.rows, shape.cols, tile_size, half.get())?;
    info!(
        "Filtering {} bands of {}x{} in {} tiles of {}x{} (half-size {}, {})",
        shape.bands,
        shape.rows,
        shape.cols,
        grid.total_tiles,
        tile_size,
        tile_size,
        half.get(),
        strategy
    );

    let mut output = allocate_output(shape)?;
    let tile_monitor = TileMonitor(monitor);

    for (idx, bounds) in grid.iter() {
        let read = input.slice(s![
            ..,
            bounds.read_row_min..bounds.read_row_max,
            bounds.read_col_min..bounds.read_col_max
        ]);

        let mut padded = allocate_output(RasterShape::new(
            shape.bands,
            bounds.read_rows(),
            bounds.read_cols(),
        ))?;
        filter_into(read, half, strategy, &tile_monitor, padded.view_mut())?;

        let central = padded.slice(s![
            ..,
            bounds.pad_top..bounds.read_rows() - bounds.pad_bottom,
            bounds.pad_left..bounds.read_cols() - bounds.pad_right
        ]);
        output
            .slice_mut(s![
                ..,
                bounds.output_row_min..bounds.output_row_max,
                bounds.output_col_min..bounds.output_col_max
            ])
            .assign(&central);

        debug!(
            "Wrote tile {} at ({},{}) size {}x{}",
            idx,
            bounds.output_row_min,
            bounds.output_col_min,
            bounds.output_rows(),
            bounds.output_cols()
        );

        if grid.ends_tile_row(idx) {
            for band in 0..shape.bands {
                monitor.rows_done(band, bounds.output_rows());
            }
        }
    }

    Ok(output)
}
