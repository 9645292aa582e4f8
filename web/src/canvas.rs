use harness_core::error::HostError;
use harness_core::video::DisplaySurface;
use harness_core::video::present::{Presenter, validate_scale};
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

fn js_err(context: &str, value: JsValue) -> HostError {
    HostError::Present(format!("{context}: {value:?}"))
}

/// Draws frames into a 2D canvas.
///
/// The frame is written at native size into the top-left corner, then the
/// canvas is drawn onto itself enlarged. Image smoothing is off, so the
/// enlargement is nearest-neighbour.
pub struct CanvasPresenter {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    scale: u32,
}

impl CanvasPresenter {
    /// Look up `<canvas id=...>` and size it for `scale`.
    pub fn from_element_id(id: &str, scale: u32) -> Result<Self, HostError> {
        let scale = validate_scale(scale)?;
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| HostError::MissingSurface("no document".into()))?;
        let canvas = document
            .get_element_by_id(id)
            .ok_or_else(|| HostError::MissingSurface(format!("no element #{id}")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| HostError::MissingSurface(format!("#{id} is not a canvas")))?;

        canvas.set_width(harness_core::video::WIDTH as u32 * scale);
        canvas.set_height(harness_core::video::HEIGHT as u32 * scale);

        let context = canvas
            .get_context("2d")
            .map_err(|e| HostError::MissingSurface(format!("getContext: {e:?}")))?
            .ok_or_else(|| HostError::MissingSurface(format!("#{id} has no 2d context")))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| HostError::MissingSurface("unexpected context type".into()))?;
        // Resizing the canvas resets context state, so this comes last.
        context.set_image_smoothing_enabled(false);

        tracing::debug!(id, scale, "canvas ready");
        Ok(Self {
            canvas,
            context,
            scale,
        })
    }
}

impl Presenter for CanvasPresenter {
    fn present(&mut self, surface: &DisplaySurface) -> Result<(), HostError> {
        let (w, h) = (surface.width() as u32, surface.height() as u32);
        let image = ImageData::new_with_u8_clamped_array_and_sh(Clamped(surface.as_bytes()), w, h)
            .map_err(|e| js_err("ImageData", e))?;
        self.context
            .put_image_data(&image, 0.0, 0.0)
            .map_err(|e| js_err("putImageData", e))?;

        let (w, h) = (f64::from(w), f64::from(h));
        let s = f64::from(self.scale);
        self.context
            .draw_image_with_html_canvas_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                &self.canvas,
                0.0,
                0.0,
                w,
                h,
                0.0,
                0.0,
                w * s,
                h * s,
            )
            .map_err(|e| js_err("drawImage", e))
    }
}
