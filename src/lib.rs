//! softframe: a CPU-only software rendering core
//!
//! Everything draws into a [`PixelSurface`], an owned ARGB8888 buffer with
//! an explicit row stride. Drawing never fails: anything outside the
//! surface is clipped silently. Only construction and configuration
//! return [`FrameResult`].
//!
//! ```
//! use softframe::{PixelSurface, TileMapDesc, Viewport, render_tilemap};
//!
//! let mut frame = PixelSurface::new(64, 48).unwrap();
//! let map = TileMapDesc::generate(10, 10, 8, 1).build().unwrap();
//! let view = Viewport::for_surface(&frame);
//! render_tilemap(&mut frame, &map, &view, None);
//! frame.draw_line(0, 0, 63, 47, 0xFFFF_FFFF);
//! ```

pub mod display;
pub mod error;
pub mod fixed;
pub mod math3d;
pub mod sprite;
pub mod tilemap;
pub mod util;

pub use display::{blend_pixel, ColorKey, DoubleBuffer, PixelSource, PixelSurface};
pub use error::{FrameError, FrameResult};
pub use math3d::{Mat4, Mesh, Vec3, Vec4};
pub use tilemap::{render_tilemap, scroll_viewport, Tile, TileMap, TileMapDesc, Viewport};
