use harness_core::error::HostError;
use harness_core::video::DisplaySurface;
use harness_core::video::present::{Presenter, validate_scale};
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, TextureCreator};
use sdl2::video::{Window, WindowContext};

pub struct Video {
    canvas: Canvas<Window>,
    texture_creator: TextureCreator<WindowContext>,
    width: u32,
    height: u32,
}

impl Video {
    /// Create an SDL window `scale` times the native resolution, with
    /// nearest-neighbour scaling and (optionally) vsync'd presents.
    pub fn new(
        sdl_video: &sdl2::VideoSubsystem,
        title: &str,
        native_width: u32,
        native_height: u32,
        scale: u32,
        vsync: bool,
    ) -> Result<Self, HostError> {
        let scale = validate_scale(scale)?;

        // "0" = nearest pixel sampling; must be set before textures exist.
        if !sdl2::hint::set("SDL_RENDER_SCALE_QUALITY", "0") {
            tracing::warn!("SDL refused nearest-neighbour scaling hint");
        }

        let window = sdl_video
            .window(title, native_width * scale, native_height * scale)
            .position_centered()
            .build()
            .map_err(|e| HostError::MissingSurface(e.to_string()))?;

        let mut builder = window.into_canvas().accelerated();
        if vsync {
            builder = builder.present_vsync();
        }
        let canvas = builder
            .build()
            .map_err(|e| HostError::MissingSurface(e.to_string()))?;

        let texture_creator = canvas.texture_creator();

        Ok(Self {
            canvas,
            texture_creator,
            width: native_width,
            height: native_height,
        })
    }
}

impl Presenter for Video {
    /// Upload the RGBA surface at native size, then let the renderer stretch
    /// it over the whole window.
    fn present(&mut self, surface: &DisplaySurface) -> Result<(), HostError> {
        // ABGR8888 is R, G, B, A in memory on little-endian hosts.
        let mut texture = self
            .texture_creator
            .create_texture_streaming(PixelFormatEnum::ABGR8888, self.width, self.height)
            .map_err(|e| HostError::Present(e.to_string()))?;

        texture
            .update(None, surface.as_bytes(), (self.width * 4) as usize)
            .map_err(|e| HostError::Present(e.to_string()))?;

        self.canvas.clear();
        self.canvas
            .copy(&texture, None, None)
            .map_err(HostError::Present)?;
        self.canvas.present();
        Ok(())
    }
}
