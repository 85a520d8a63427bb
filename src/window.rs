/// Inclusive bounds of a neighborhood along one axis, clamped to the raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub end: usize,
}

impl Window {
    /// Window of `half_size` samples on each side of `coord`, truncated to `[0, extent)`.
    ///
    /// `coord` must lie inside the axis; the result always contains it.
    pub fn clamped(coord: usize, extent: usize, half_size: usize) -> Self {
        debug_assert!(coord < extent);
        Self {
            start: coord.saturating_sub(half_size),
            end: coord.saturating_add(half_size).min(extent - 1),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn range(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// Number of in-bounds samples covered by a 2-D clamped window.
pub fn pixel_count(rows: Window, cols: Window) -> usize {
    rows.len() * cols.len()
}
