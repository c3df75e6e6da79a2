pub mod bitmap;
pub mod chunk;
pub mod error;
pub mod palette;
pub mod renderer;
pub mod result_buffer;
pub mod scheduler;

pub use bitmap::Bitmap;
pub use chunk::{build_chunk_spans, ChunkSpan, CHUNK_SIZE};
pub use error::RenderError;
pub use palette::Palette;
pub use renderer::{render_region, RenderResult};
pub use result_buffer::ResultBuffer;
pub use scheduler::{ChunkScheduler, ComputeOutcome, RenderCancel, SchedulerConfig};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
