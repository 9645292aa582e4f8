//! Per-frame controller snapshot.
//!
//! Slots are positional: the harness only promises which key feeds which
//! slot, not what the emulated program does with it.

use crate::input::{HeldKeySet, InputId};

/// The eight logical button slots, in slot order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    ButtonX,
    ButtonY,
    Start,
    Select,
}

impl Button {
    pub const ALL: [Button; 8] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::ButtonX,
        Button::ButtonY,
        Button::Start,
        Button::Select,
    ];

    /// Position of this button in the snapshot (0..8).
    #[inline]
    pub const fn slot(self) -> usize {
        self as usize
    }

    /// The input identifier wired to this slot.
    pub const fn input(self) -> InputId {
        match self {
            Button::Up => InputId::W,
            Button::Down => InputId::S,
            Button::Left => InputId::A,
            Button::Right => InputId::D,
            Button::ButtonX => InputId::Semicolon,
            Button::ButtonY => InputId::Quote,
            Button::Start => InputId::Enter,
            Button::Select => InputId::ShiftRight,
        }
    }
}

/// Immutable state of all eight buttons for one frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ControllerSnapshot {
    buttons: [bool; 8],
}

impl ControllerSnapshot {
    /// Nothing pressed.
    pub const RELEASED: ControllerSnapshot = ControllerSnapshot {
        buttons: [false; 8],
    };

    /// Build a snapshot from explicit slot values, in [`Button::ALL`] order.
    pub const fn from_slots(buttons: [bool; 8]) -> Self {
        Self { buttons }
    }

    /// Derive the snapshot for the keys currently held.
    pub fn from_held(held: &HeldKeySet) -> Self {
        let mut buttons = [false; 8];
        for button in Button::ALL {
            buttons[button.slot()] = held.contains(button.input());
        }
        Self { buttons }
    }

    pub fn pressed(&self, button: Button) -> bool {
        self.buttons[button.slot()]
    }

    pub fn slots(&self) -> [bool; 8] {
        self.buttons
    }

    /// Slot `k` in bit `k`.
    pub fn bits(&self) -> u8 {
        self.buttons
            .iter()
            .enumerate()
            .fold(0, |acc, (k, &down)| acc | ((down as u8) << k))
    }

    pub fn any_pressed(&self) -> bool {
        self.buttons.iter().any(|&down| down)
    }
}
