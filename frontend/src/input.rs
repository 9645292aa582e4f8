use std::collections::HashMap;

use harness_core::input::InputId;
use sdl2::keyboard::Scancode;

/// Maps SDL scancodes to harness input identifiers.
pub struct KeyMap {
    map: HashMap<Scancode, InputId>,
}

impl KeyMap {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Bind a scancode to an input identifier.
    pub fn bind(&mut self, scancode: Scancode, id: InputId) {
        self.map.insert(scancode, id);
    }

    /// Look up the input identifier for a scancode.
    pub fn get(&self, scancode: Scancode) -> Option<InputId> {
        self.map.get(&scancode).copied()
    }
}

/// Physical key for each identifier. Scancodes are layout-independent, like
/// the DOM `KeyboardEvent.code` values the browser host receives.
fn scancode_for(id: InputId) -> Scancode {
    match id {
        InputId::W => Scancode::W,
        InputId::S => Scancode::S,
        InputId::A => Scancode::A,
        InputId::D => Scancode::D,
        InputId::Semicolon => Scancode::Semicolon,
        InputId::Quote => Scancode::Apostrophe,
        InputId::Enter => Scancode::Return,
        InputId::ShiftRight => Scancode::RShift,
    }
}

/// The fixed eight-key layout.
pub fn default_key_map() -> KeyMap {
    let mut km = KeyMap::new();
    for id in InputId::ALL {
        km.bind(scancode_for(id), id);
    }
    km
}
