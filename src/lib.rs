// Library exports for testing and reuse

pub mod bench;
pub mod cli;
pub mod error;
pub mod filter;
pub mod monitor;
pub mod raster;
pub mod tiling;
pub mod window;

// Re-export commonly used types
pub use error::{FilterError, Result};
pub use filter::{uniform_filter, uniform_filter_with, HalfSize, Strategy};
pub use monitor::{CancelFlag, LogProgress, Monitor, NoopMonitor};
pub use raster::RasterShape;
pub use tiling::filter_tiled;
