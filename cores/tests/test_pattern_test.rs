use std::rc::Rc;

use harness_core::controller::{Button, ControllerSnapshot};
use harness_core::core::machine::EmulationCore;
use harness_core::error::CoreError;
use harness_core::host::{ManualScheduler, Session};
use harness_core::video::present::MemoryPresenter;
use harness_core::video::{PIXELS, WIDTH, decode_pixel};
use harness_cores::registry;
use harness_cores::test_pattern::TestPatternCore;

const LAMP_ON: [u8; 4] = [0x80, 0xD7, 0xFF, 0xFF];
const LAMP_OFF: [u8; 4] = [0x20, 0x20, 0x20, 0xFF];

/// Header for one 16 KiB PRG bank and one 8 KiB CHR bank, zero-filled.
fn nrom() -> Vec<u8> {
    let mut rom = b"NES\x1A\x01\x01".to_vec();
    rom.resize(16 + 16 * 1024 + 8 * 1024, 0);
    rom
}

fn lamp(core: &TestPatternCore, button: Button) -> [u8; 4] {
    let (x, y) = TestPatternCore::lamp_origin(button);
    decode_pixel(core.current_frame_buffer()[y * WIDTH + x + 2])
}

// =================================================================
// Construction
// =================================================================

#[test]
fn test_rejects_non_ines_images() {
    assert!(matches!(
        TestPatternCore::from_rom(b"definitely not a rom"),
        Err(CoreError::InvalidRom(_))
    ));
    assert!(matches!(
        TestPatternCore::from_rom(&[]),
        Err(CoreError::InvalidRom(_))
    ));
}

#[test]
fn test_registry_builds_test_pattern() {
    let mut core = registry::create("test-pattern", &nrom()).unwrap();
    core.advance_one_frame().unwrap();
    assert_eq!(core.current_frame_buffer().len(), PIXELS);
}

#[test]
fn test_registry_propagates_rom_errors() {
    assert!(matches!(
        registry::create("test-pattern", b"NES"),
        Err(CoreError::InvalidRom(_))
    ));
}

// =================================================================
// Rendering
// =================================================================

#[test]
fn test_frame_is_full_size_every_frame() {
    let mut core = TestPatternCore::from_rom(&nrom()).unwrap();
    for _ in 0..3 {
        core.advance_one_frame().unwrap();
        assert_eq!(core.current_frame_buffer().len(), PIXELS);
    }
    assert_eq!(core.frame_number(), 3);
}

#[test]
fn test_raster_line_walks_one_scanline_per_frame() {
    let mut core = TestPatternCore::from_rom(&nrom()).unwrap();
    core.advance_one_frame().unwrap();
    core.advance_one_frame().unwrap();
    let frame = core.current_frame_buffer();
    assert!(frame[2 * WIDTH..3 * WIDTH].iter().all(|&p| p == 0x00FF_FFFF));
    assert!(frame[WIDTH..2 * WIDTH].iter().any(|&p| p != 0x00FF_FFFF));
}

#[test]
fn test_output_is_deterministic_for_a_rom() {
    let mut a = TestPatternCore::from_rom(&nrom()).unwrap();
    let mut b = TestPatternCore::from_rom(&nrom()).unwrap();
    for _ in 0..5 {
        a.advance_one_frame().unwrap();
        b.advance_one_frame().unwrap();
    }
    assert_eq!(a.current_frame_buffer(), b.current_frame_buffer());
}

// =================================================================
// Input
// =================================================================

#[test]
fn test_lamps_follow_submitted_snapshot_on_next_frame() {
    let mut core = TestPatternCore::from_rom(&nrom()).unwrap();
    core.advance_one_frame().unwrap();
    for button in Button::ALL {
        assert_eq!(lamp(&core, button), LAMP_OFF, "{button:?}");
    }

    let mut slots = [false; 8];
    slots[Button::Start.slot()] = true;
    core.submit_controller_snapshot(ControllerSnapshot::from_slots(slots));
    // Already-rendered frame is unchanged.
    assert_eq!(lamp(&core, Button::Start), LAMP_OFF);

    core.advance_one_frame().unwrap();
    assert_eq!(lamp(&core, Button::Start), LAMP_ON);
    assert_eq!(lamp(&core, Button::Select), LAMP_OFF);
}

#[test]
fn test_direction_buttons_move_cursor() {
    let mut core = TestPatternCore::from_rom(&nrom()).unwrap();
    core.advance_one_frame().unwrap();
    let (x0, y0) = core.cursor();

    let mut slots = [false; 8];
    slots[Button::Right.slot()] = true;
    slots[Button::Up.slot()] = true;
    core.submit_controller_snapshot(ControllerSnapshot::from_slots(slots));
    core.advance_one_frame().unwrap();
    core.advance_one_frame().unwrap();

    assert_eq!(core.cursor(), (x0 + 2, y0 - 2));
}

#[test]
fn test_keyboard_drives_lamps_through_session() {
    let core = TestPatternCore::from_rom(&nrom()).unwrap();
    let session = Session::new(Box::new(core), MemoryPresenter::new(2).unwrap());
    let scheduler = Rc::new(ManualScheduler::new());
    session.start(Rc::clone(&scheduler)).unwrap();
    let input = session.input();

    scheduler.run_next(0.0);
    input.on_key_down("Enter");
    scheduler.run_next(16.0); // pushes Start
    session.with_core(|core| assert_eq!(lamp(core, Button::Start), LAMP_OFF));

    scheduler.run_next(33.0); // renders with Start held
    session.with_core(|core| assert_eq!(lamp(core, Button::Start), LAMP_ON));

    let (x, y) = TestPatternCore::lamp_origin(Button::Start);
    session.with_surface(|surface| assert_eq!(surface.pixel(x + 2, y), Some(LAMP_ON)));
}
