mod desc;
mod render;

pub use desc::{TileDesc, TileMapDesc};
pub use render::{render_tilemap, scroll_viewport};

use crate::display::PixelSurface;
use crate::error::{FrameError, FrameResult};

/// A read-only image used as a rendering atom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    surface: PixelSurface,
}

impl Tile {
    pub fn from_surface(surface: PixelSurface) -> Self {
        Self { surface }
    }

    /// Single-colour tile
    pub fn solid(width: u32, height: u32, color: u32) -> FrameResult<Self> {
        Ok(Self::from_surface(PixelSurface::with_fill(width, height, color)?))
    }

    /// Checkerboard of `cell`-sized squares, starting with `a` at the origin
    pub fn checker(width: u32, height: u32, a: u32, b: u32, cell: u32) -> FrameResult<Self> {
        let cell = cell.max(1);
        let mut surface = PixelSurface::new(width, height)?;
        for y in 0..height {
            for (x, p) in surface.row_mut(y).iter_mut().enumerate() {
                let even = ((x as u32 / cell) + (y / cell)) % 2 == 0;
                *p = if even { a } else { b };
            }
        }
        Ok(Self::from_surface(surface))
    }

    #[inline]
    pub fn surface(&self) -> &PixelSurface {
        &self.surface
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.surface.height()
    }
}

/// Grid of tile indices over an ordered tile set
///
/// Indices that do not name a tile in the set are treated as empty cells.
#[derive(Debug, Clone)]
pub struct TileMap {
    rows: u32,
    cols: u32,
    tile_width: u32,
    tile_height: u32,
    map_data: Vec<u16>,
    tile_set: Vec<Tile>,
}

impl TileMap {
    /// Build a map, rejecting inconsistent grids up front
    pub fn new(
        rows: u32,
        cols: u32,
        tile_width: u32,
        tile_height: u32,
        map_data: Vec<u16>,
        tile_set: Vec<Tile>,
    ) -> FrameResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(FrameError::invalid_tilemap(format!(
                "grid must be non-empty, got {}x{}",
                cols, rows
            )));
        }
        if tile_width == 0 || tile_height == 0 {
            return Err(FrameError::invalid_tilemap(format!(
                "tile size must be non-zero, got {}x{}",
                tile_width, tile_height
            )));
        }
        let cells = rows as usize * cols as usize;
        if map_data.len() != cells {
            return Err(FrameError::invalid_tilemap(format!(
                "{}x{} grid needs {} indices, got {}",
                cols,
                rows,
                cells,
                map_data.len()
            )));
        }
        let fits = |n: u32, size: u32| (n as u64 * size as u64) <= i32::MAX as u64;
        if !fits(cols, tile_width) || !fits(rows, tile_height) {
            return Err(FrameError::invalid_tilemap("map pixel extent overflows i32"));
        }

        tracing::debug!(rows, cols, tiles = tile_set.len(), "tilemap built");
        Ok(Self {
            rows,
            cols,
            tile_width,
            tile_height,
            map_data,
            tile_set,
        })
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    #[inline]
    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    #[inline]
    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    pub fn map_data(&self) -> &[u16] {
        &self.map_data
    }

    pub fn tile_set(&self) -> &[Tile] {
        &self.tile_set
    }

    /// Width of the whole map in pixels
    #[inline]
    pub fn pixel_width(&self) -> i32 {
        (self.cols * self.tile_width) as i32
    }

    /// Height of the whole map in pixels
    #[inline]
    pub fn pixel_height(&self) -> i32 {
        (self.rows * self.tile_height) as i32
    }

    /// Raw index stored at a cell, `None` outside the grid
    pub fn index_at(&self, col: i32, row: i32) -> Option<u16> {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return None;
        }
        Some(self.map_data[row as usize * self.cols as usize + col as usize])
    }

    /// Tile drawn at a cell; `None` outside the grid or for an empty index
    pub fn tile_at(&self, col: i32, row: i32) -> Option<&Tile> {
        self.index_at(col, row)
            .and_then(|i| self.tile_set.get(i as usize))
    }

    /// Replace the index at a cell
    pub fn set_index(&mut self, col: u32, row: u32, index: u16) -> FrameResult<()> {
        if col >= self.cols || row >= self.rows {
            return Err(FrameError::invalid_tilemap(format!(
                "cell ({}, {}) outside {}x{} grid",
                col, row, self.cols, self.rows
            )));
        }
        self.map_data[row as usize * self.cols as usize + col as usize] = index;
        Ok(())
    }
}

/// Visible window into map-pixel space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub x_offset: i32,
    pub y_offset: i32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            x_offset: 0,
            y_offset: 0,
            width,
            height,
        }
    }

    /// Viewport covering the whole of `surface`
    pub fn for_surface(surface: &PixelSurface) -> Self {
        Self::new(surface.width(), surface.height())
    }

    /// Move by (dx, dy), clamped to the map (see [`scroll_viewport`])
    pub fn scroll(&mut self, dx: i32, dy: i32, map_pixel_width: i32, map_pixel_height: i32) {
        scroll_viewport(self, dx, dy, map_pixel_width, map_pixel_height);
    }
}
