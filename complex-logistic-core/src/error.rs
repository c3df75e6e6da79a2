use thiserror::Error;

/// Errors originating from the core kernels, grids, and navigation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("invalid iteration count: {0} (must be >= 1)")]
    InvalidIterations(u32),

    #[error("invalid raster size: {width}×{height} (both must be > 0)")]
    InvalidRaster { width: u32, height: u32 },

    #[error("degenerate region: {reason}")]
    DegenerateRegion { reason: String },

    #[error("non-finite sample point at index {index}")]
    NonFiniteSample { index: usize },

    #[error("batch length mismatch: {points} points but {out} output slots")]
    BatchLengthMismatch { points: usize, out: usize },
}
