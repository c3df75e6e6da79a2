mod app;
mod app_dir;
mod config;
mod error;
mod input;
mod navigation;
mod preview;
mod render_bridge;

use std::time::Duration;

use tracing::{info, warn};

use complex_logistic_core::ScreenPoint;

use app::Explorer;
use config::ExplorerConfig;
use error::AppError;
use input::DragHandler;

/// Upper bound on how long one frame may take before we give up on it.
const FRAME_TIMEOUT: Duration = Duration::from_secs(300);
/// Width of the text preview in characters.
const PREVIEW_COLUMNS: u32 = 96;

/// A menu action or drag gesture given on the command line.
///
/// `zoom:X0,Y0,X1,Y1` drags between two raster points (y up),
/// `back` and `reset` map to the menu commands.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Command {
    Zoom(ScreenPoint, ScreenPoint),
    Back,
    Reset,
}

fn parse_command(arg: &str) -> Option<Command> {
    match arg {
        "back" => Some(Command::Back),
        "reset" => Some(Command::Reset),
        _ => {
            let coords: Vec<f64> = arg
                .strip_prefix("zoom:")?
                .split(',')
                .map(|s| s.trim().parse().ok())
                .collect::<Option<Vec<f64>>>()?;
            match coords[..] {
                [x0, y0, x1, y1] => Some(Command::Zoom(
                    ScreenPoint::new(x0, y0),
                    ScreenPoint::new(x1, y1),
                )),
                _ => None,
            }
        }
    }
}

fn apply(explorer: &mut Explorer, command: Command) {
    match command {
        Command::Zoom(from, to) => {
            explorer.on_drag_start(from);
            explorer.on_drag_update(to);
            if let Some(region) = explorer.drag_preview() {
                info!(%region, "Selection");
            }
            explorer.on_drag_end(to);
        }
        Command::Back => explorer.zoom_back(),
        Command::Reset => explorer.reset_view(),
    }
}

fn show_frame(explorer: &mut Explorer) {
    if !explorer.wait_for_frame(FRAME_TIMEOUT) {
        warn!("No new frame for request {}", explorer.render_id);
    }
    explorer.poll_responses();
    info!("Render status: {}", explorer.render_phase.label());
    if let Some(e) = explorer.last_error() {
        warn!("Last render failed: {e}");
    }
    let Some(frame) = explorer.frame() else {
        return;
    };
    info!(
        id = frame.id,
        width = frame.bitmap.width,
        height = frame.bitmap.height,
        bytes = frame.bitmap.pixels.len(),
        escaped = frame.results.escaped_count(),
        elapsed_ms = frame.elapsed.as_millis(),
        center = %frame.region.center(),
        "Showing frame"
    );
    println!("{}", frame.region);
    print!("{}", preview::text_preview(&frame.results, PREVIEW_COLUMNS));
}

fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting complex-logistic");

    let config = ExplorerConfig::load();
    let mut explorer = Explorer::new(config)?;
    show_frame(&mut explorer);

    for arg in std::env::args().skip(1) {
        let Some(command) = parse_command(&arg) else {
            warn!("Ignoring unrecognised argument {arg:?}");
            continue;
        };
        apply(&mut explorer, command);
        info!(region = %explorer.current_region(), "View");
        show_frame(&mut explorer);
    }
    Ok(())
}
