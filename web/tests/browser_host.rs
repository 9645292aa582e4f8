//! Run with `wasm-pack test --headless --chrome web`.

use std::cell::Cell;
use std::rc::Rc;

use harness_core::error::HostError;
use harness_core::host::{FrameScheduler, InputHandle};
use harness_core::input::InputId;
use harness_core::video::present::Presenter;
use harness_core::video::{DisplaySurface, PIXELS, decode_frame, pack_rgb};
use harness_cores::rom::build_ines;
use harness_web::{CanvasPresenter, Harness, KeyboardListeners, WebScheduler};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, KeyboardEventInit};

wasm_bindgen_test_configure!(run_in_browser);

fn key_event(kind: &str, code: &str) -> KeyboardEvent {
    let init = KeyboardEventInit::new();
    init.set_code(code);
    init.set_cancelable(true);
    KeyboardEvent::new_with_keyboard_event_init_dict(kind, &init).unwrap()
}

fn add_canvas(id: &str) -> HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas = document
        .create_element("canvas")
        .unwrap()
        .dyn_into::<HtmlCanvasElement>()
        .unwrap();
    canvas.set_id(id);
    document.body().unwrap().append_child(&canvas).unwrap();
    canvas
}

fn pixel_at(canvas: &HtmlCanvasElement, x: f64, y: f64) -> Vec<u8> {
    let context = canvas
        .get_context("2d")
        .unwrap()
        .unwrap()
        .dyn_into::<CanvasRenderingContext2d>()
        .unwrap();
    context.get_image_data(x, y, 1.0, 1.0).unwrap().data().0
}

/// Resolves on the next animation frame.
async fn next_frame() {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let scheduler = WebScheduler::new().unwrap();
        scheduler
            .request_frame(Box::new(move |_ts: f64| {
                let _ = resolve.call0(&JsValue::NULL);
            }))
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

// =================================================================
// Keyboard
// =================================================================

#[wasm_bindgen_test]
fn recognized_keys_suppress_default_and_update_input() {
    let window = web_sys::window().unwrap();
    let input = InputHandle::default();
    let _listeners = KeyboardListeners::attach(window.clone(), input.clone()).unwrap();

    let down = key_event("keydown", "KeyW");
    window.dispatch_event(&down).unwrap();
    assert!(down.default_prevented());
    assert!(input.with(|i| i.held().contains(InputId::W)));

    let up = key_event("keyup", "KeyW");
    window.dispatch_event(&up).unwrap();
    assert!(up.default_prevented());
    assert!(input.with(|i| i.held().is_empty()));
}

#[wasm_bindgen_test]
fn unrecognized_keys_keep_their_default() {
    let window = web_sys::window().unwrap();
    let input = InputHandle::default();
    let _listeners = KeyboardListeners::attach(window.clone(), input.clone()).unwrap();

    let tab = key_event("keydown", "Tab");
    window.dispatch_event(&tab).unwrap();
    assert!(!tab.default_prevented());
    assert!(input.with(|i| i.held().is_empty()));
}

#[wasm_bindgen_test]
fn dropped_listeners_are_detached() {
    let window = web_sys::window().unwrap();
    let input = InputHandle::default();
    drop(KeyboardListeners::attach(window.clone(), input.clone()).unwrap());

    let down = key_event("keydown", "KeyW");
    window.dispatch_event(&down).unwrap();
    assert!(!down.default_prevented());
    assert!(input.with(|i| i.held().is_empty()));
}

// =================================================================
// Canvas
// =================================================================

#[wasm_bindgen_test]
fn canvas_shows_frame_at_double_size() {
    let canvas = add_canvas("canvas-double");
    let mut presenter = CanvasPresenter::from_element_id("canvas-double", 2).unwrap();
    assert_eq!((canvas.width(), canvas.height()), (512, 480));

    let mut frame = vec![pack_rgb(0, 0, 0); PIXELS];
    frame[0] = pack_rgb(0x12, 0x34, 0x56);
    frame[1] = pack_rgb(0xAB, 0xCD, 0xEF);
    let mut surface = DisplaySurface::new();
    decode_frame(&frame, &mut surface).unwrap();
    presenter.present(&surface).unwrap();

    assert_eq!(pixel_at(&canvas, 0.0, 0.0), [0x12, 0x34, 0x56, 0xFF]);
    assert_eq!(pixel_at(&canvas, 1.0, 1.0), [0x12, 0x34, 0x56, 0xFF]);
    assert_eq!(pixel_at(&canvas, 2.0, 1.0), [0xAB, 0xCD, 0xEF, 0xFF]);
    assert_eq!(pixel_at(&canvas, 511.0, 479.0), [0, 0, 0, 0xFF]);
}

#[wasm_bindgen_test]
fn missing_canvas_is_a_startup_error() {
    assert!(matches!(
        CanvasPresenter::from_element_id("no-such-canvas", 2),
        Err(HostError::MissingSurface(_))
    ));
    add_canvas("canvas-zero-scale");
    assert!(matches!(
        CanvasPresenter::from_element_id("canvas-zero-scale", 0),
        Err(HostError::InvalidScale(0))
    ));
}

// =================================================================
// Scheduling
// =================================================================

#[wasm_bindgen_test]
async fn scheduler_runs_callback_on_animation_frame() {
    let fired = Rc::new(Cell::new(None));
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let fired = Rc::clone(&fired);
        WebScheduler::new()
            .unwrap()
            .request_frame(Box::new(move |ts: f64| {
                fired.set(Some(ts));
                let _ = resolve.call0(&JsValue::NULL);
            }))
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
    assert!(fired.get().is_some_and(|ts| ts >= 0.0));
}

#[wasm_bindgen_test]
async fn harness_ticks_until_stopped() {
    add_canvas("canvas-harness");
    let Ok(mut harness) = Harness::new("canvas-harness", "test-pattern", &build_ines(1, 1, 0))
    else {
        panic!("test-pattern harness should build");
    };
    assert!(harness.start().is_ok());

    next_frame().await;
    next_frame().await;
    let ticked = harness.frame_count();
    assert!(ticked >= 1.0);
    assert!(!harness.is_halted());
    assert_eq!(harness.last_error(), None);

    harness.stop();
    next_frame().await;
    next_frame().await;
    assert_eq!(harness.frame_count(), ticked);
}
