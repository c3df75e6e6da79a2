use std::sync::Arc;

use complex_logistic_core::{
    Complex, DragRect, EscapeKernel, KernelParams, LogisticMap, RasterSize, Region, SampleGrid,
    ScreenPoint, ViewportNavigator,
};
use complex_logistic_render::{
    render_region, ChunkScheduler, Palette, RenderCancel, RenderError, SchedulerConfig,
};

fn scheduler(chunk_size: usize) -> ChunkScheduler {
    ChunkScheduler::new(SchedulerConfig {
        chunk_size,
        worker_threads: 0,
    })
    .unwrap()
}

#[test]
fn end_to_end_default_view() {
    let raster = RasterSize::new(120, 80).unwrap();
    let result = render_region(
        &LogisticMap::default(),
        &scheduler(200),
        &Region::default_logistic(),
        raster,
        &RenderCancel::new(),
        0,
    )
    .unwrap();

    assert_eq!(result.buffer.width, 120);
    assert_eq!(result.buffer.height, 80);
    assert_eq!(result.chunks, 48);

    let escaped = result.buffer.escaped_count();
    assert!(escaped > 0 && escaped < 120 * 80);

    let bitmap = Palette::default().colorize(&result.buffer);
    assert_eq!(bitmap.pixels.len(), 120 * 80 * 4);
    let palette = Palette::default();
    let has_bounded = bitmap
        .pixels
        .chunks_exact(4)
        .any(|px| px == palette.bounded.as_slice());
    let has_escaped = bitmap
        .pixels
        .chunks_exact(4)
        .any(|px| px == palette.escaped.as_slice());
    assert!(has_bounded && has_escaped);
}

#[test]
fn top_left_flag_belongs_to_top_left_sample() {
    let map = LogisticMap::default();
    let raster = RasterSize::new(30, 20).unwrap();
    let region = Region::default_logistic();
    let result =
        render_region(&map, &scheduler(7), &region, raster, &RenderCancel::new(), 0).unwrap();

    let grid = SampleGrid::build(&region, raster);
    let corner = grid.get(0, 0).unwrap();
    assert_eq!(corner, Complex::new(-2.0, 2.0));
    assert_eq!(
        result.buffer.escaped(0, 0),
        map.escapes_batch(&[corner]).unwrap()[0]
    );
}

#[test]
fn render_determinism_across_chunk_sizes() {
    let map = LogisticMap::new(KernelParams::new(200, 200).unwrap());
    let raster = RasterSize::new(64, 48).unwrap();
    let region = Region::default_logistic();

    let render = |chunk_size| {
        render_region(&map, &scheduler(chunk_size), &region, raster, &RenderCancel::new(), 0)
            .unwrap()
    };
    let r1 = render(1);
    let r2 = render(333);
    let r3 = render(64 * 48);

    assert_eq!(r1.buffer, r2.buffer);
    assert_eq!(r2.buffer, r3.buffer);
}

#[test]
fn zoom_renders_new_region() {
    let raster = RasterSize::new(60, 40).unwrap();
    let mut nav = ViewportNavigator::default();
    let drag = DragRect::new(ScreenPoint::new(30.0, 10.0), ScreenPoint::new(45.0, 30.0));
    let zoomed = nav.commit_drag(drag, raster).unwrap();
    assert!(zoomed.needs_render);

    let result = render_region(
        &LogisticMap::default(),
        &scheduler(100),
        &zoomed.region,
        raster,
        &RenderCancel::new(),
        0,
    )
    .unwrap();
    assert_eq!(result.region, zoomed.region);
    assert_eq!(result.buffer.data.len(), 60 * 40);
}

#[test]
fn cancellation_from_another_thread() {
    let map = LogisticMap::new(KernelParams::new(50_000, 50_000).unwrap());
    let raster = RasterSize::new(400, 300).unwrap();
    let cancel = Arc::new(RenderCancel::new());
    let issued = cancel.generation();

    let cancel_clone = Arc::clone(&cancel);
    let canceller = std::thread::spawn(move || {
        std::thread::sleep(std::time::Duration::from_millis(5));
        cancel_clone.cancel();
    });

    let result = render_region(
        &map,
        &scheduler(50),
        &Region::default_logistic(),
        raster,
        &cancel,
        issued,
    );
    canceller.join().unwrap();

    // The render either beat the cancel or reports it; it never hands back a
    // partial buffer as success after the generation moved.
    match result {
        Ok(r) => assert_eq!(r.buffer.data.len(), 400 * 300),
        Err(RenderError::Cancelled) => {
            let (done, total) = cancel.progress();
            // A cancel that lands before the first chunk leaves total at 0.
            assert!(done < total || total == 0, "cancelled render should skip some chunks");
        }
        Err(other) => panic!("unexpected error: {other}"),
    }
}

#[test]
fn request_superseded_before_it_starts_is_cancelled() {
    let cancel = RenderCancel::new();
    let first = cancel.generation();
    cancel.cancel();
    let second = cancel.generation();
    let raster = RasterSize::new(20, 10).unwrap();

    let stale = render_region(
        &LogisticMap::default(),
        &scheduler(50),
        &Region::default_logistic(),
        raster,
        &cancel,
        first,
    );
    assert!(matches!(stale, Err(RenderError::Cancelled)));

    let fresh = render_region(
        &LogisticMap::default(),
        &scheduler(50),
        &Region::default_logistic(),
        raster,
        &cancel,
        second,
    )
    .unwrap();
    assert_eq!(fresh.buffer.data.len(), 200);
}
