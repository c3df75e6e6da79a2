use tracing::{debug, info};

use complex_logistic_core::{DragRect, Region, ScreenPoint};

use crate::app::Explorer;

/// Receives pointer-drag gestures from the host.
///
/// Points are raster pixels with the y axis pointing up; hosts with a
/// y-down window flip before calling.
pub(crate) trait DragHandler {
    fn on_drag_start(&mut self, point: ScreenPoint);
    fn on_drag_update(&mut self, point: ScreenPoint);
    fn on_drag_end(&mut self, point: ScreenPoint);
}

/// An in-progress drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DragState {
    pub(crate) start: ScreenPoint,
    /// Region the drag would zoom to right now, if it is wide enough.
    pub(crate) preview: Option<Region>,
}

impl DragHandler for Explorer {
    fn on_drag_start(&mut self, point: ScreenPoint) {
        self.drag = Some(DragState {
            start: point,
            preview: None,
        });
    }

    fn on_drag_update(&mut self, point: ScreenPoint) {
        let raster = self.raster;
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        drag.preview = self
            .navigator
            .preview_drag(DragRect::new(drag.start, point), raster)
            .ok();
    }

    fn on_drag_end(&mut self, point: ScreenPoint) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        match self
            .navigator
            .commit_drag(DragRect::new(drag.start, point), self.raster)
        {
            Ok(nav) => {
                info!(region = %nav.region, "Zoom to selection");
                if nav.needs_render {
                    self.request_render();
                }
            }
            Err(e) => debug!("Drag ignored: {e}"),
        }
    }
}

impl Explorer {
    /// Rubber-band region of the drag in progress.
    pub(crate) fn drag_preview(&self) -> Option<Region> {
        self.drag.and_then(|d| d.preview)
    }
}
