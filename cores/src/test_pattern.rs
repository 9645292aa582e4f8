//! Deterministic stand-in core.
//!
//! Accepts any well-formed iNES image and renders a test card instead of
//! running it: colour bars tinted by the ROM fingerprint, a raster line that
//! walks down one scanline per frame, a cursor moved by the direction
//! buttons and one indicator lamp per controller slot. Useful for checking
//! a host's timing, scaling and input wiring without a real console core.

use harness_core::controller::{Button, ControllerSnapshot};
use harness_core::core::machine::EmulationCore;
use harness_core::error::CoreError;
use harness_core::video::{HEIGHT, PIXELS, WIDTH, pack_rgb};

use crate::registry::CoreEntry;
use crate::rom::RomImage;

const BAR_COLOURS: [(u8, u8, u8); 8] = [
    (0xC0, 0xC0, 0xC0),
    (0xC0, 0xC0, 0x00),
    (0x00, 0xC0, 0xC0),
    (0x00, 0xC0, 0x00),
    (0xC0, 0x00, 0xC0),
    (0xC0, 0x00, 0x00),
    (0x00, 0x00, 0xC0),
    (0x10, 0x10, 0x10),
];

const RASTER_COLOUR: u32 = pack_rgb(0xFF, 0xFF, 0xFF);
const CURSOR_COLOUR: u32 = pack_rgb(0xFF, 0x80, 0x00);
const LAMP_ON: u32 = pack_rgb(0x80, 0xD7, 0xFF);
const LAMP_OFF: u32 = pack_rgb(0x20, 0x20, 0x20);

const CURSOR_SIZE: usize = 8;
const LAMP_SIZE: usize = 12;
const LAMP_GAP: usize = 4;
const LAMP_TOP: usize = HEIGHT - LAMP_SIZE - 8;

pub struct TestPatternCore {
    frame: Vec<u32>,
    frame_number: u64,
    tint: u8,
    controller: ControllerSnapshot,
    cursor: (usize, usize),
}

impl TestPatternCore {
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    /// Top-left corner of the cursor square.
    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    /// Top-left corner of the lamp for `button`.
    pub fn lamp_origin(button: Button) -> (usize, usize) {
        (8 + button.slot() * (LAMP_SIZE + LAMP_GAP), LAMP_TOP)
    }

    fn move_cursor(&mut self) {
        let (mut x, mut y) = self.cursor;
        let pad = self.controller;
        if pad.pressed(Button::Left) {
            x = x.saturating_sub(1);
        }
        if pad.pressed(Button::Right) {
            x = (x + 1).min(WIDTH - CURSOR_SIZE);
        }
        if pad.pressed(Button::Up) {
            y = y.saturating_sub(1);
        }
        if pad.pressed(Button::Down) {
            y = (y + 1).min(HEIGHT - CURSOR_SIZE);
        }
        self.cursor = (x, y);
    }

    fn fill_rect(&mut self, x0: usize, y0: usize, w: usize, h: usize, colour: u32) {
        for y in y0..(y0 + h).min(HEIGHT) {
            let row = y * WIDTH;
            let end = (x0 + w).min(WIDTH);
            self.frame[row + x0..row + end].fill(colour);
        }
    }

    fn render(&mut self) {
        let bar_width = WIDTH / BAR_COLOURS.len();
        for (x, pixel) in self.frame[..WIDTH].iter_mut().enumerate() {
            let (r, g, b) = BAR_COLOURS[x / bar_width];
            *pixel = pack_rgb(r, g ^ self.tint, b);
        }
        for y in 1..HEIGHT {
            self.frame.copy_within(0..WIDTH, y * WIDTH);
        }

        let raster = (self.frame_number % HEIGHT as u64) as usize;
        self.fill_rect(0, raster, WIDTH, 1, RASTER_COLOUR);

        let (cx, cy) = self.cursor;
        self.fill_rect(cx, cy, CURSOR_SIZE, CURSOR_SIZE, CURSOR_COLOUR);

        for button in Button::ALL {
            let (x, y) = Self::lamp_origin(button);
            let colour = if self.controller.pressed(button) {
                LAMP_ON
            } else {
                LAMP_OFF
            };
            self.fill_rect(x, y, LAMP_SIZE, LAMP_SIZE, colour);
        }
    }
}

impl EmulationCore for TestPatternCore {
    fn from_rom(rom: &[u8]) -> Result<Self, CoreError> {
        let image = RomImage::parse(rom).map_err(|e| CoreError::InvalidRom(e.to_string()))?;
        tracing::debug!(
            fingerprint = %format!("{:016X}", image.fingerprint),
            mapper = image.header.mapper,
            prg_banks = image.header.prg_banks,
            chr_banks = image.header.chr_banks,
            "test-pattern core accepted ROM"
        );
        Ok(Self {
            frame: vec![0; PIXELS],
            frame_number: 0,
            tint: (image.fingerprint & 0x3F) as u8,
            controller: ControllerSnapshot::RELEASED,
            cursor: ((WIDTH - CURSOR_SIZE) / 2, (HEIGHT - CURSOR_SIZE) / 2),
        })
    }

    fn advance_one_frame(&mut self) -> Result<(), CoreError> {
        self.frame_number += 1;
        self.move_cursor();
        self.render();
        Ok(())
    }

    fn current_frame_buffer(&self) -> &[u32] {
        &self.frame
    }

    fn submit_controller_snapshot(&mut self, snapshot: ControllerSnapshot) {
        self.controller = snapshot;
    }
}

// ---------------------------------------------------------------------------
// Core registry
// ---------------------------------------------------------------------------

fn create_core(rom: &[u8]) -> Result<Box<dyn EmulationCore>, CoreError> {
    Ok(Box::new(TestPatternCore::from_rom(rom)?))
}

inventory::submit! {
    CoreEntry::new(
        "test-pattern",
        "test card with input lamps; accepts any iNES image",
        create_core,
    )
}
