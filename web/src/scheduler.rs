use harness_core::error::HostError;
use harness_core::host::{FrameScheduler, TickCallback};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::Window;

/// `requestAnimationFrame` as a [`FrameScheduler`].
pub struct WebScheduler {
    window: Window,
}

impl WebScheduler {
    pub fn new() -> Result<Self, HostError> {
        let window = web_sys::window()
            .ok_or_else(|| HostError::MissingScheduler("no global window".into()))?;
        Ok(Self { window })
    }
}

impl FrameScheduler for WebScheduler {
    fn request_frame(&self, callback: TickCallback) -> Result<(), HostError> {
        // The JS function frees itself after its single call.
        let function = Closure::once_into_js(move |timestamp: f64| callback(timestamp));
        self.window
            .request_animation_frame(function.unchecked_ref())
            .map(|_handle| ())
            .map_err(|e| HostError::MissingScheduler(format!("requestAnimationFrame: {e:?}")))
    }
}
