use log::info;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Hook polled by the filter engine while it works through a raster.
///
/// Bands are processed on several threads at once, so implementations must be
/// `Sync`. Both methods default to doing nothing.
pub trait Monitor: Sync {
    /// Called after `rows` more rows of `band` have been filtered.
    fn rows_done(&self, _band: usize, _rows: usize) {}

    /// Returning `true` stops the computation with `FilterError::Cancelled`.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Monitor that never reports and never cancels.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMonitor;

impl Monitor for NoopMonitor {}

/// Cancellation flag that can be raised from another thread.
#[derive(Debug, Default)]
pub struct CancelFlag {
    cancelled: AtomicBool,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

impl Monitor for CancelFlag {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Logs overall progress at every completed tenth of the work.
#[derive(Debug)]
pub struct LogProgress {
    label: String,
    total_rows: usize,
    done_rows: AtomicUsize,
    last_decile: AtomicUsize,
}

impl LogProgress {
    /// `total_rows` counts rows over all bands (`bands * rows`).
    pub fn new(label: impl Into<String>, total_rows: usize) -> Self {
        Self {
            label: label.into(),
            total_rows: total_rows.max(1),
            done_rows: AtomicUsize::new(0),
            last_decile: AtomicUsize::new(0),
        }
    }

    pub fn done_rows(&self) -> usize {
        self.done_rows.load(Ordering::Relaxed)
    }
}

impl Monitor for LogProgress {
    fn rows_done(&self, _band: usize, rows: usize) {
        let done = self.done_rows.fetch_add(rows, Ordering::Relaxed) + rows;
        let decile = (done * 10 / self.total_rows).min(10);
        // Only the thread that advances the decile logs it
        if self.last_decile.fetch_max(decile, Ordering::Relaxed) < decile {
            info!("{}: {}% ({}/{} rows)", self.label, decile * 10, done, self.total_rows);
        }
    }
}
