use harness_core::error::HostError;
use harness_core::host::InputHandle;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{KeyboardEvent, Window};

type KeyListener = Closure<dyn FnMut(KeyboardEvent)>;

/// `keydown`/`keyup` listeners on the window, removed again on drop.
///
/// Recognized keys have their browser default suppressed. Every other key
/// is left alone.
pub struct KeyboardListeners {
    window: Window,
    down: KeyListener,
    up: KeyListener,
}

impl KeyboardListeners {
    pub fn attach(window: Window, input: InputHandle) -> Result<Self, HostError> {
        let down_input = input.clone();
        let down: KeyListener = Closure::new(move |event: KeyboardEvent| {
            if down_input.on_key_down(&event.code()).is_suppressed() {
                event.prevent_default();
            }
        });
        let up: KeyListener = Closure::new(move |event: KeyboardEvent| {
            if input.on_key_up(&event.code()).is_suppressed() {
                event.prevent_default();
            }
        });

        // Built before registering so a failure part-way unregisters on drop.
        let listeners = Self { window, down, up };
        for (kind, listener) in [("keydown", &listeners.down), ("keyup", &listeners.up)] {
            listeners
                .window
                .add_event_listener_with_callback(kind, listener.as_ref().unchecked_ref())
                .map_err(|e| HostError::MissingSurface(format!("{kind} listener: {e:?}")))?;
        }
        Ok(listeners)
    }
}

impl Drop for KeyboardListeners {
    fn drop(&mut self) {
        for (kind, listener) in [("keydown", &self.down), ("keyup", &self.up)] {
            let _ = self
                .window
                .remove_event_listener_with_callback(kind, listener.as_ref().unchecked_ref());
        }
    }
}
