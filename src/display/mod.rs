pub mod color;
mod compositor;
mod raster;
mod surface;
#[cfg(feature = "display")]
mod window;

pub use compositor::{blend_pixel, ColorKey, PixelSource};
pub use surface::{DoubleBuffer, PixelSurface};
#[cfg(feature = "display")]
pub use window::{Display, InputEvent, RenderTarget};

pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;
