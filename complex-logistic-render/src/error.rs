use thiserror::Error;

/// Errors originating from the rendering pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid chunk size: {0} (must be > 0)")]
    InvalidChunkSize(usize),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("{failed} of {total} chunks failed, first: {first}")]
    WorkerFailure {
        failed: usize,
        total: usize,
        first: String,
    },

    #[error("render cancelled")]
    Cancelled,

    #[error(transparent)]
    Core(#[from] complex_logistic_core::CoreError),
}
