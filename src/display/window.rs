//! SDL2 presentation layer
//!
//! Uploads a finished `PixelSurface` to a streaming ARGB8888 texture each
//! frame and turns SDL events into plain input values. Nothing in the
//! rendering core depends on this module.

use super::PixelSurface;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;

/// Window, canvas and event pump
pub struct Display {
    canvas: Canvas<Window>,
    event_pump: EventPump,
}

/// Streaming texture sized to one `PixelSurface`
pub struct RenderTarget<'a> {
    texture: Texture<'a>,
    width: u32,
    height: u32,
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Quit,
    KeyDown(Keycode),
    KeyUp(Keycode),
}

impl Display {
    /// Open a centered window of the given size
    ///
    /// The returned texture creator outlives every `RenderTarget` made from it.
    pub fn open(
        title: &str,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<(Self, TextureCreator<WindowContext>), String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let mut canvas_builder = window.into_canvas().accelerated();
        if vsync {
            canvas_builder = canvas_builder.present_vsync();
        }
        let canvas = canvas_builder.build().map_err(|e| e.to_string())?;

        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump()?;

        tracing::info!(width, height, vsync, "display opened");
        Ok((Self { canvas, event_pump }, texture_creator))
    }

    /// Upload `surface` and flip. Pitch follows the surface stride.
    pub fn present(
        &mut self,
        target: &mut RenderTarget,
        surface: &PixelSurface,
    ) -> Result<(), String> {
        if surface.width() != target.width || surface.height() != target.height {
            return Err(format!(
                "surface is {}x{}, render target is {}x{}",
                surface.width(),
                surface.height(),
                target.width,
                target.height
            ));
        }
        target
            .texture
            .update(None, surface.as_bytes(), (surface.stride() * 4) as usize)
            .map_err(|e| e.to_string())?;

        self.canvas.copy(&target.texture, None, None)?;
        self.canvas.present();
        Ok(())
    }

    /// Drain pending SDL events, keeping quit and keyboard ones
    pub fn poll_events(&mut self) -> Vec<InputEvent> {
        self.event_pump
            .poll_iter()
            .filter_map(|event| match event {
                Event::Quit { .. } => Some(InputEvent::Quit),
                Event::KeyDown {
                    keycode: Some(k), ..
                } => Some(InputEvent::KeyDown(k)),
                Event::KeyUp {
                    keycode: Some(k), ..
                } => Some(InputEvent::KeyUp(k)),
                _ => None,
            })
            .collect()
    }
}

impl<'a> RenderTarget<'a> {
    /// Create a streaming ARGB8888 texture the size of `surface`
    pub fn for_surface(
        texture_creator: &'a TextureCreator<WindowContext>,
        surface: &PixelSurface,
    ) -> Result<Self, String> {
        let (width, height) = (surface.width(), surface.height());
        let texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(|e| e.to_string())?;
        Ok(Self {
            texture,
            width,
            height,
        })
    }
}
