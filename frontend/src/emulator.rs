use std::path::Path;
use std::rc::Rc;
use std::time::Instant;

use harness_core::core::machine::EmulationCore;
use harness_core::error::{HarnessError, HostError};
use harness_core::host::{ManualScheduler, Session};
use harness_core::video::present::MemoryPresenter;
use harness_core::video::{HEIGHT, WIDTH};
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Scancode;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::input::KeyMap;
use crate::screenshot;
use crate::video::Video;

/// Nominal display period used to timestamp headless frames.
const HEADLESS_FRAME_MS: f64 = 1000.0 / 60.0;

/// Run the core in an SDL window until Escape, window close or a fatal error.
///
/// The display queue is pumped once per loop iteration; with vsync on, the
/// present inside each tick blocks until the next refresh, so the loop runs
/// at the display rate.
pub fn run(
    core: Box<dyn EmulationCore>,
    key_map: &KeyMap,
    config: &Config,
) -> Result<(), AppError> {
    let sdl_context = sdl2::init().map_err(HostError::MissingSurface)?;
    let sdl_video = sdl_context.video().map_err(HostError::MissingSurface)?;
    let mut event_pump = sdl_context
        .event_pump()
        .map_err(HostError::MissingScheduler)?;

    let video = Video::new(
        &sdl_video,
        "NES Harness",
        WIDTH as u32,
        HEIGHT as u32,
        config.scale,
        config.vsync,
    )?;

    let session = Session::new(core, video);
    let display = Rc::new(ManualScheduler::new());
    session.start(Rc::clone(&display))?;
    let input = session.input();
    let clock = Instant::now();

    'main: loop {
        // Deliver all pending key events before the next tick.
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => break 'main,

                Event::KeyDown {
                    scancode: Some(Scancode::Escape),
                    ..
                } => break 'main,

                Event::KeyDown {
                    scancode: Some(Scancode::F12),
                    repeat: false,
                    ..
                } => {
                    let path =
                        screenshot::screenshot_path(&config.screenshot_dir, session.frame_count());
                    match session.with_surface(|surface| screenshot::write_png(&path, surface)) {
                        Ok(()) => info!(path = %path.display(), "screenshot saved"),
                        Err(e) => warn!(path = %path.display(), "screenshot failed: {e}"),
                    }
                }

                Event::KeyDown {
                    scancode: Some(sc),
                    repeat: false,
                    ..
                } => {
                    if let Some(id) = key_map.get(sc) {
                        input.press(id);
                    }
                }

                Event::KeyUp {
                    scancode: Some(sc), ..
                } => {
                    if let Some(id) = key_map.get(sc) {
                        input.release(id);
                    }
                }

                // Key-ups delivered while unfocused never reach us.
                Event::Window {
                    win_event: WindowEvent::FocusLost,
                    ..
                } => input.release_all(),

                _ => {}
            }
        }

        let now_ms = clock.elapsed().as_secs_f64() * 1000.0;
        if !display.run_next(now_ms) {
            // Nothing rescheduled: the driver halted.
            break;
        }
        if let Some(err) = session.take_error() {
            return Err(err.into());
        }
    }

    info!(frames = session.frame_count(), "session ended");
    Ok(())
}

/// Run `frames` ticks off-screen and return the session for inspection.
pub fn run_headless(
    core: Box<dyn EmulationCore>,
    scale: u32,
    frames: u64,
) -> Result<Session<dyn EmulationCore, MemoryPresenter>, HarnessError> {
    let session = Session::new(core, MemoryPresenter::new(scale)?);
    let display = Rc::new(ManualScheduler::new());
    session.start(Rc::clone(&display))?;

    for n in 0..frames {
        display.run_next(n as f64 * HEADLESS_FRAME_MS);
        if let Some(err) = session.take_error() {
            return Err(err);
        }
    }
    info!(frames = session.frame_count(), "headless run finished");
    Ok(session)
}

/// Headless run that also writes the last frame to `screenshot`.
pub fn run_headless_to_png(
    core: Box<dyn EmulationCore>,
    scale: u32,
    frames: u64,
    screenshot: Option<&Path>,
) -> Result<(), AppError> {
    let session = run_headless(core, scale, frames)?;
    if let Some(path) = screenshot {
        session
            .with_surface(|surface| screenshot::write_png(path, surface))
            .map_err(|source| AppError::Screenshot {
                path: path.to_path_buf(),
                source,
            })?;
        info!(path = %path.display(), "screenshot saved");
    }
    Ok(())
}
