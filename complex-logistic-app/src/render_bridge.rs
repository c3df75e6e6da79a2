use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use complex_logistic_core::{LogisticMap, RasterSize, Region};
use complex_logistic_render::{
    render_region, ChunkScheduler, RenderCancel, RenderError, RenderResult,
};

use crate::app::{Explorer, Frame};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RenderPhase {
    Idle,
    Rendering,
    Done,
    Failed,
}

impl RenderPhase {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Rendering => "Rendering\u{2026}",
            Self::Done => "Done",
            Self::Failed => "Failed",
        }
    }
}

pub(crate) struct RenderRequest {
    pub(crate) id: u64,
    /// Cancel generation current when the request was issued.
    pub(crate) generation: u64,
    pub(crate) region: Region,
    pub(crate) raster: RasterSize,
}

pub(crate) struct RenderResponse {
    pub(crate) id: u64,
    pub(crate) outcome: complex_logistic_render::Result<RenderResult>,
}

// ---------------------------------------------------------------------------
// impl Explorer: render dispatch and polling
// ---------------------------------------------------------------------------

impl Explorer {
    /// Supersede any in-flight render and queue the current region.
    pub(crate) fn request_render(&mut self) {
        self.cancel.cancel();
        self.render_id += 1;

        let region = self.navigator.current();
        debug!(id = self.render_id, %region, "Requesting render");

        let req = RenderRequest {
            id: self.render_id,
            generation: self.cancel.generation(),
            region,
            raster: self.raster,
        };
        if self.tx_request.send(req).is_err() {
            self.worker_lost();
            return;
        }
        self.render_phase = RenderPhase::Rendering;
    }

    /// Apply every response that has already arrived, without blocking.
    pub(crate) fn poll_responses(&mut self) {
        loop {
            match self.rx_response.try_recv() {
                Ok(resp) => self.handle_response(resp),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.worker_lost();
                    break;
                }
            }
        }
    }

    /// Block until the latest request has produced a frame or failed.
    ///
    /// Returns `false` on timeout or if the worker has gone away.
    pub(crate) fn wait_for_frame(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.render_phase == RenderPhase::Rendering {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match self.rx_response.recv_timeout(remaining) {
                Ok(resp) => self.handle_response(resp),
                Err(RecvTimeoutError::Timeout) => return false,
                Err(RecvTimeoutError::Disconnected) => {
                    self.worker_lost();
                    return false;
                }
            }
        }
        true
    }

    /// The worker thread has exited; no request will ever be answered.
    fn worker_lost(&mut self) {
        if self.render_phase == RenderPhase::Failed && self.last_error.is_some() {
            return;
        }
        error!(id = self.render_id, "Render worker is gone");
        self.render_phase = RenderPhase::Failed;
        self.last_error = Some("render worker is gone".to_string());
    }

    pub(crate) fn handle_response(&mut self, resp: RenderResponse) {
        if resp.id != self.render_id {
            debug!(id = resp.id, current = self.render_id, "Discarding stale render");
            return;
        }
        match resp.outcome {
            Ok(result) => {
                self.apply_result(resp.id, result);
                self.render_phase = RenderPhase::Done;
            }
            Err(RenderError::Cancelled) => {
                debug!(id = resp.id, "Render cancelled");
            }
            Err(e) => {
                warn!(id = resp.id, error = %e, "Render failed, keeping previous frame");
                self.last_error = Some(e.to_string());
                self.render_phase = RenderPhase::Failed;
            }
        }
    }

    pub(crate) fn apply_result(&mut self, id: u64, result: RenderResult) {
        let bitmap = self.palette.colorize(&result.buffer);
        info!(
            id,
            elapsed_ms = result.elapsed.as_millis(),
            chunks = result.chunks,
            region = %result.region,
            "Frame ready"
        );
        self.last_error = None;
        self.frame = Some(Frame {
            id,
            region: result.region,
            results: result.buffer,
            bitmap,
            elapsed: result.elapsed,
        });
    }
}

// ---------------------------------------------------------------------------
// Render worker
// ---------------------------------------------------------------------------

fn drain_latest(initial: RenderRequest, rx: &mpsc::Receiver<RenderRequest>) -> RenderRequest {
    let mut req = initial;
    while let Ok(newer) = rx.try_recv() {
        req = newer;
    }
    req
}

/// Render requests one at a time, always skipping to the newest queued one.
///
/// Cancelled renders are not reported: a newer request is already queued
/// behind them.
pub(crate) fn render_worker(
    rx: mpsc::Receiver<RenderRequest>,
    tx: mpsc::Sender<RenderResponse>,
    cancel: Arc<RenderCancel>,
    kernel: LogisticMap,
    scheduler: ChunkScheduler,
) {
    debug!("Render worker started");
    while let Ok(initial) = rx.recv() {
        let req = drain_latest(initial, &rx);
        let outcome = render_region(
            &kernel,
            &scheduler,
            &req.region,
            req.raster,
            &cancel,
            req.generation,
        );
        if matches!(outcome, Err(RenderError::Cancelled)) {
            debug!(id = req.id, "Render superseded");
            continue;
        }
        if tx.send(RenderResponse { id: req.id, outcome }).is_err() {
            break;
        }
    }
    debug!("Render worker exiting");
}
