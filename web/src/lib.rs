//! Browser host: runs a harness session on a `<canvas>`, driven by
//! `requestAnimationFrame` and window keyboard events.
//!
//! ```js
//! import init, { Harness, coreNames } from "./pkg/harness_web.js";
//! await init();
//! const rom = new Uint8Array(await (await fetch("game.nes")).arrayBuffer());
//! const harness = new Harness("screen", "test-pattern", rom);
//! harness.start();
//! ```

use std::rc::Rc;

use harness_core::core::machine::EmulationCore;
use harness_core::error::HostError;
use harness_core::host::Session;
use harness_core::video::present::DEFAULT_SCALE;
use wasm_bindgen::prelude::*;

mod canvas;
mod keyboard;
mod scheduler;

pub use canvas::CanvasPresenter;
pub use keyboard::KeyboardListeners;
pub use scheduler::WebScheduler;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
}

/// Names of the cores compiled into this module.
#[wasm_bindgen(js_name = coreNames)]
pub fn core_names() -> Vec<String> {
    harness_cores::registry::all()
        .iter()
        .map(|entry| entry.name.to_string())
        .collect()
}

#[wasm_bindgen]
pub struct Harness {
    session: Session<dyn EmulationCore, CanvasPresenter>,
    scheduler: Rc<WebScheduler>,
    keyboard: Option<KeyboardListeners>,
    last_error: Option<String>,
}

#[wasm_bindgen]
impl Harness {
    /// Bind core `core`, built from `rom`, to the canvas with id `canvas_id`.
    ///
    /// Fails if the canvas or `requestAnimationFrame` is unavailable, or if
    /// the core rejects the ROM.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, core: &str, rom: &[u8]) -> Result<Harness, JsError> {
        let scheduler = Rc::new(WebScheduler::new()?);
        let presenter = CanvasPresenter::from_element_id(canvas_id, DEFAULT_SCALE)?;
        let core = harness_cores::registry::create(core, rom)?;
        Ok(Self {
            session: Session::new(core, presenter),
            scheduler,
            keyboard: None,
            last_error: None,
        })
    }

    /// Attach keyboard listeners and request the first frame.
    pub fn start(&mut self) -> Result<(), JsError> {
        let window = web_sys::window()
            .ok_or_else(|| HostError::MissingScheduler("no global window".into()))?;
        self.session.start(Rc::clone(&self.scheduler))?;
        self.keyboard = Some(KeyboardListeners::attach(window, self.session.input())?);
        Ok(())
    }

    /// Detach the keyboard and let the pending frame lapse. `free()` does
    /// the same.
    pub fn stop(&mut self) {
        self.session.stop();
        self.keyboard = None;
    }

    #[wasm_bindgen(js_name = frameCount)]
    pub fn frame_count(&self) -> f64 {
        self.session.frame_count() as f64
    }

    #[wasm_bindgen(js_name = isHalted)]
    pub fn is_halted(&self) -> bool {
        self.session.is_halted()
    }

    /// Message of the failure that halted the session, if any.
    #[wasm_bindgen(js_name = lastError)]
    pub fn last_error(&mut self) -> Option<String> {
        if let Some(err) = self.session.take_error() {
            self.last_error = Some(err.to_string());
        }
        self.last_error.clone()
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        // The scheduled frame keeps the session alive; stop it from ticking.
        self.session.stop();
    }
}
