use thiserror::Error;

use complex_logistic_render::RenderError;

/// Errors that stop the explorer from starting.
#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to spawn render worker: {0}")]
    Spawn(#[from] std::io::Error),
}
