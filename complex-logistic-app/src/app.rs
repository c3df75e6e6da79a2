use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use complex_logistic_core::{LogisticMap, RasterSize, Region, ViewportNavigator};
use complex_logistic_render::{Bitmap, ChunkScheduler, Palette, RenderCancel, ResultBuffer};

use crate::config::ExplorerConfig;
use crate::error::AppError;
use crate::input::DragState;
use crate::render_bridge::{render_worker, RenderPhase, RenderRequest, RenderResponse};

/// A finished, colorized render that is safe to show.
pub(crate) struct Frame {
    pub(crate) id: u64,
    pub(crate) region: Region,
    pub(crate) results: ResultBuffer,
    pub(crate) bitmap: Bitmap,
    pub(crate) elapsed: Duration,
}

/// Orchestrates navigation and rendering for one session.
///
/// Owns the only mutable copies of the current region (through the
/// navigator) and of the render generation (`render_id`). Every request is
/// tagged with the id it was issued under; responses carrying an older id
/// are dropped.
pub(crate) struct Explorer {
    pub(crate) raster: RasterSize,
    pub(crate) palette: Palette,
    pub(crate) navigator: ViewportNavigator,

    pub(crate) render_id: u64,
    pub(crate) render_phase: RenderPhase,
    pub(crate) cancel: Arc<RenderCancel>,
    pub(crate) tx_request: mpsc::Sender<RenderRequest>,
    pub(crate) rx_response: mpsc::Receiver<RenderResponse>,

    pub(crate) frame: Option<Frame>,
    pub(crate) last_error: Option<String>,
    pub(crate) drag: Option<DragState>,
}

impl Explorer {
    /// Start the render worker and request the default view.
    pub(crate) fn new(config: ExplorerConfig) -> Result<Self, AppError> {
        let scheduler = ChunkScheduler::new(config.scheduler)?;
        let kernel = LogisticMap::new(config.kernel);
        info!(
            width = config.raster.width,
            height = config.raster.height,
            workers = scheduler.worker_count(),
            chunk_size = scheduler.chunk_size(),
            "Starting explorer"
        );

        let (tx_request, rx_request) = mpsc::channel::<RenderRequest>();
        let (tx_response, rx_response) = mpsc::channel::<RenderResponse>();
        let cancel = Arc::new(RenderCancel::new());
        let worker_cancel = Arc::clone(&cancel);
        std::thread::Builder::new()
            .name("render-worker".into())
            .spawn(move || {
                render_worker(rx_request, tx_response, worker_cancel, kernel, scheduler)
            })?;

        let mut explorer = Self {
            raster: config.raster,
            palette: config.palette,
            navigator: ViewportNavigator::new(config.navigator),
            render_id: 0,
            render_phase: RenderPhase::Idle,
            cancel,
            tx_request,
            rx_response,
            frame: None,
            last_error: None,
            drag: None,
        };
        explorer.request_render();
        Ok(explorer)
    }

    pub(crate) fn current_region(&self) -> Region {
        self.navigator.current()
    }

    /// The most recent successfully rendered frame.
    pub(crate) fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    pub(crate) fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

impl Drop for Explorer {
    fn drop(&mut self) {
        // Stop in-flight chunks; the worker exits once the sender is gone.
        self.cancel.cancel();
    }
}
