use tracing::info;

use crate::app::Explorer;

impl Explorer {
    /// Return to the default region and clear the zoom history.
    pub(crate) fn reset_view(&mut self) {
        let nav = self.navigator.reset();
        info!(region = %nav.region, "Reset view");
        if nav.needs_render {
            self.request_render();
        }
    }

    /// Undo the most recent zoom. Does nothing at the top of the history.
    pub(crate) fn zoom_back(&mut self) {
        let nav = self.navigator.back();
        if nav.needs_render {
            info!(region = %nav.region, "Zoom back");
            self.request_render();
        }
    }
}
