use std::time::Duration;

use tracing::debug;

use complex_logistic_core::{EscapeKernel, RasterSize, Region, SampleGrid};

use crate::error::RenderError;
use crate::result_buffer::ResultBuffer;
use crate::scheduler::{ChunkScheduler, RenderCancel};

/// The result of rendering one region.
///
/// Contains raw escape flags (no coloring); apply a [`Palette`](crate::Palette)
/// to get displayable pixels.
#[derive(Debug, Clone)]
pub struct RenderResult {
    pub region: Region,
    pub buffer: ResultBuffer,
    pub elapsed: Duration,
    pub chunks: usize,
}

/// Sample `region` at `raster` resolution and classify every point.
///
/// The grid is built fresh for each call and dropped afterwards.
/// `generation` is the `cancel` generation the request was issued under; see
/// [`ChunkScheduler::compute_all`].
pub fn render_region<K: EscapeKernel + Sync>(
    kernel: &K,
    scheduler: &ChunkScheduler,
    region: &Region,
    raster: RasterSize,
    cancel: &RenderCancel,
    generation: u64,
) -> crate::Result<RenderResult> {
    debug!(
        %region,
        width = raster.width,
        height = raster.height,
        generation,
        "Rendering region"
    );
    if cancel.generation() != generation {
        return Err(RenderError::Cancelled);
    }
    let grid = SampleGrid::build(region, raster);
    let outcome = scheduler.compute_all(kernel, &grid, cancel, generation)?;
    Ok(RenderResult {
        region: *region,
        buffer: outcome.buffer,
        elapsed: outcome.elapsed,
        chunks: outcome.chunks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::SchedulerConfig;
    use complex_logistic_core::LogisticMap;

    #[test]
    fn basic_render_produces_escape_data() {
        let scheduler = ChunkScheduler::new(SchedulerConfig::default()).unwrap();
        let raster = RasterSize::new(64, 40).unwrap();
        let result = render_region(
            &LogisticMap::default(),
            &scheduler,
            &Region::default_logistic(),
            raster,
            &RenderCancel::new(),
            0,
        )
        .unwrap();

        assert_eq!(result.buffer.data.len(), 64 * 40);
        assert_eq!(result.region, Region::default_logistic());
        assert!(result.chunks > 0);
    }

    #[test]
    fn superseded_request_is_not_rendered() {
        let scheduler = ChunkScheduler::new(SchedulerConfig::default()).unwrap();
        let cancel = RenderCancel::new();
        let issued = cancel.generation();
        cancel.cancel();
        let err = render_region(
            &LogisticMap::default(),
            &scheduler,
            &Region::default_logistic(),
            RasterSize::new(64, 40).unwrap(),
            &cancel,
            issued,
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::Cancelled));
    }
}
