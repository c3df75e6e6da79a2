use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CoreError;
use crate::region::{RasterSize, Region};

/// How the height of a zoomed region is derived from its width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectLock {
    /// New height = new width × the given `height / width` ratio.
    Fixed(f64),
    /// Follow the raster's own `height / width`.
    Raster,
}

impl AspectLock {
    fn height_over_width(self, raster: RasterSize) -> f64 {
        match self {
            Self::Fixed(ratio) => ratio,
            Self::Raster => raster.height_over_width(),
        }
    }
}

impl Default for AspectLock {
    fn default() -> Self {
        Self::Fixed(2.0 / 3.0)
    }
}

/// Navigation settings, handed to [`ViewportNavigator::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavigatorConfig {
    #[serde(default)]
    pub default_region: Region,
    #[serde(default)]
    pub aspect_lock: AspectLock,
    /// Drags narrower than this many pixels are rejected.
    #[serde(default = "default_min_drag_pixels")]
    pub min_drag_pixels: f64,
}

fn default_min_drag_pixels() -> f64 {
    2.0
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            default_region: Region::default_logistic(),
            aspect_lock: AspectLock::default(),
            min_drag_pixels: default_min_drag_pixels(),
        }
    }
}

/// A raster position in pixels with `y` growing upward.
///
/// Callers flip window coordinates before handing them over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The two corners of a drag gesture, in drag order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragRect {
    pub first: ScreenPoint,
    pub second: ScreenPoint,
}

impl DragRect {
    pub fn new(first: ScreenPoint, second: ScreenPoint) -> Self {
        Self { first, second }
    }

    pub fn width(&self) -> f64 {
        (self.second.x - self.first.x).abs()
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(
            0.5 * (self.first.x + self.second.x),
            0.5 * (self.first.y + self.second.y),
        )
    }
}

/// The outcome of a navigation command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Navigation {
    /// The region that is current after the command.
    pub region: Region,
    /// `true` when the caller should render `region`.
    pub needs_render: bool,
}

/// Owns the visible region and the undo stack of earlier regions.
#[derive(Debug, Clone)]
pub struct ViewportNavigator {
    config: NavigatorConfig,
    current: Region,
    history: Vec<Region>,
}

impl ViewportNavigator {
    pub fn new(config: NavigatorConfig) -> Self {
        Self {
            current: config.default_region,
            config,
            history: Vec::new(),
        }
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    pub fn current(&self) -> Region {
        self.current
    }

    /// Earlier regions, oldest first.
    pub fn history(&self) -> &[Region] {
        &self.history
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    /// Return to the default region and forget the history.
    pub fn reset(&mut self) -> Navigation {
        self.current = self.config.default_region;
        self.history.clear();
        debug!(region = %self.current, "Navigator reset");
        Navigation {
            region: self.current,
            needs_render: true,
        }
    }

    /// The region [`commit_drag`](Self::commit_drag) would produce, without
    /// changing any state. Used for the rubber band shown while dragging.
    pub fn preview_drag(&self, drag: DragRect, raster: RasterSize) -> crate::Result<Region> {
        let drag_width = drag.width();
        if !(drag_width >= self.config.min_drag_pixels) {
            return Err(CoreError::DegenerateRegion {
                reason: format!(
                    "drag is {drag_width} px wide, at least {} px required",
                    self.config.min_drag_pixels
                ),
            });
        }

        let center_px = drag.center();
        let center = self
            .current
            .screen_to_plane(center_px.x, center_px.y, raster);
        let width = self.current.width() * (drag_width / raster.width as f64);
        let height = width * self.config.aspect_lock.height_over_width(raster);
        Region::from_center(center, width, height)
    }

    /// Zoom into the dragged rectangle.
    ///
    /// The current region is pushed onto the history only once the new one
    /// has been validated; on error nothing changes.
    pub fn commit_drag(&mut self, drag: DragRect, raster: RasterSize) -> crate::Result<Navigation> {
        let next = self.preview_drag(drag, raster)?;
        self.history.push(self.current);
        self.current = next;
        debug!(
            region = %next,
            depth = self.history.len(),
            "Committed drag zoom"
        );
        Ok(Navigation {
            region: next,
            needs_render: true,
        })
    }

    /// Pop the most recent region. A no-op on an empty history.
    pub fn back(&mut self) -> Navigation {
        match self.history.pop() {
            Some(previous) => {
                self.current = previous;
                debug!(region = %previous, depth = self.history.len(), "Zoomed back");
                Navigation {
                    region: previous,
                    needs_render: true,
                }
            }
            None => Navigation {
                region: self.current,
                needs_render: false,
            },
        }
    }
}

impl Default for ViewportNavigator {
    fn default() -> Self {
        Self::new(NavigatorConfig::default())
    }
}
