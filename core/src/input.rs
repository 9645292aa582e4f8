//! Keyboard aggregation: overlapping key-down/key-up events in, one
//! consistent [`ControllerSnapshot`] out per frame.

use crate::controller::ControllerSnapshot;

/// The eight keys the harness listens to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InputId {
    W,
    S,
    A,
    D,
    Semicolon,
    Quote,
    Enter,
    ShiftRight,
}

impl InputId {
    pub const ALL: [InputId; 8] = [
        InputId::W,
        InputId::S,
        InputId::A,
        InputId::D,
        InputId::Semicolon,
        InputId::Quote,
        InputId::Enter,
        InputId::ShiftRight,
    ];

    /// Recognize a host key code.
    ///
    /// Accepts DOM `KeyboardEvent.code` names (`"KeyW"`, `"ShiftRight"`, ...)
    /// and bare letters for the four direction keys.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "KeyW" | "W" => Some(InputId::W),
            "KeyS" | "S" => Some(InputId::S),
            "KeyA" | "A" => Some(InputId::A),
            "KeyD" | "D" => Some(InputId::D),
            "Semicolon" => Some(InputId::Semicolon),
            "Quote" => Some(InputId::Quote),
            "Enter" => Some(InputId::Enter),
            "ShiftRight" => Some(InputId::ShiftRight),
            _ => None,
        }
    }

    /// Canonical DOM code for this key.
    pub const fn code(self) -> &'static str {
        match self {
            InputId::W => "KeyW",
            InputId::S => "KeyS",
            InputId::A => "KeyA",
            InputId::D => "KeyD",
            InputId::Semicolon => "Semicolon",
            InputId::Quote => "Quote",
            InputId::Enter => "Enter",
            InputId::ShiftRight => "ShiftRight",
        }
    }

    #[inline]
    const fn mask(self) -> u8 {
        1 << self as u8
    }
}

/// Set of recognized keys currently held down.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HeldKeySet {
    bits: u8,
}

impl HeldKeySet {
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    pub fn contains(&self, id: InputId) -> bool {
        self.bits & id.mask() != 0
    }

    /// Returns `true` if the key was not already held.
    pub fn insert(&mut self, id: InputId) -> bool {
        let added = !self.contains(id);
        self.bits |= id.mask();
        added
    }

    /// Returns `true` if the key was held.
    pub fn remove(&mut self, id: InputId) -> bool {
        let removed = self.contains(id);
        self.bits &= !id.mask();
        removed
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = InputId> + '_ {
        InputId::ALL.into_iter().filter(|&id| self.contains(id))
    }
}

/// What the host should do with the platform's default handling of a key event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyDisposition {
    /// The harness consumed the key; suppress the default action.
    Suppress,
    /// Not one of ours; let the page/window handle it normally.
    PassThrough,
}

impl KeyDisposition {
    pub fn is_suppressed(self) -> bool {
        self == KeyDisposition::Suppress
    }
}

/// Session-wide held-key state.
///
/// Key handlers are the only writers; the frame driver only ever sees the
/// snapshot built from it.
#[derive(Debug, Default)]
pub struct InputAggregator {
    held: HeldKeySet,
}

impl InputAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host key-down notification.
    pub fn on_key_down(&mut self, code: &str) -> KeyDisposition {
        match InputId::from_code(code) {
            Some(id) => {
                self.press(id);
                KeyDisposition::Suppress
            }
            None => KeyDisposition::PassThrough,
        }
    }

    /// Host key-up notification.
    pub fn on_key_up(&mut self, code: &str) -> KeyDisposition {
        match InputId::from_code(code) {
            Some(id) => {
                self.release(id);
                KeyDisposition::Suppress
            }
            None => KeyDisposition::PassThrough,
        }
    }

    /// Mark `id` held. Repeats are no-ops; returns whether the set changed.
    pub fn press(&mut self, id: InputId) -> bool {
        let changed = self.held.insert(id);
        if changed {
            tracing::trace!(key = id.code(), "key down");
        }
        changed
    }

    /// Mark `id` released. Releasing an unheld key is a no-op.
    pub fn release(&mut self, id: InputId) -> bool {
        let changed = self.held.remove(id);
        if changed {
            tracing::trace!(key = id.code(), "key up");
        }
        changed
    }

    /// Drop every held key, e.g. when the host window loses focus and
    /// would otherwise never deliver the matching key-up events.
    pub fn release_all(&mut self) {
        if !self.held.is_empty() {
            tracing::debug!(held = self.held.len(), "releasing all held keys");
        }
        self.held.clear();
    }

    pub fn held(&self) -> HeldKeySet {
        self.held
    }

    /// Snapshot of the controller as of now.
    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot::from_held(&self.held)
    }
}
