pub mod complex;
pub mod error;
pub mod grid;
pub mod kernel;
pub mod navigator;
pub mod region;

// Re-export primary types for convenience.
pub use complex::Complex;
pub use error::CoreError;
pub use grid::SampleGrid;
pub use kernel::{EscapeKernel, KernelParams, LogisticMap};
pub use navigator::{AspectLock, DragRect, Navigation, NavigatorConfig, ScreenPoint, ViewportNavigator};
pub use region::{RasterSize, Region};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
