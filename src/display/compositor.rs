//! Alpha blending and clipped block copies between pixel buffers

use super::color::{split, MAGENTA};
use super::PixelSurface;
use crate::error::{FrameError, FrameResult};
use serde::{Deserialize, Serialize};

// ============================================================================
// Blending
// ============================================================================

/// Blend `src` over `dst`, straight alpha
///
/// Colour channels: `src * a + dst * (1 - a)` with `a = srcA / 255`,
/// truncated. Output alpha is `srcA + dstA * (1 - a)`, an additive coverage
/// approximation rather than Porter-Duff "over".
#[inline]
pub fn blend_pixel(src: u32, dst: u32) -> u32 {
    let (sa, sr, sg, sb) = split(src);
    let (da, dr, dg, db) = split(dst);
    let a = sa as f32 / 255.0;
    let inv = 1.0 - a;
    let mix = |s: u8, d: u8| (s as f32 * a + d as f32 * inv) as u8;
    let out_a = (sa as f32 + da as f32 * inv) as u8;
    super::color::argb(out_a, mix(sr, dr), mix(sg, dg), mix(sb, db))
}

// ============================================================================
// Color Key
// ============================================================================

/// Transparent sentinel for keyed blits
///
/// A source pixel is skipped when `pixel & mask == color & mask`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorKey {
    pub color: u32,
    #[serde(default = "full_mask")]
    pub mask: u32,
}

fn full_mask() -> u32 {
    0xFFFF_FFFF
}

impl ColorKey {
    /// Opaque black, matched exactly (tile art convention)
    pub const OPAQUE_BLACK: ColorKey = ColorKey {
        color: 0xFF00_0000,
        mask: 0xFFFF_FFFF,
    };

    /// Magenta, matched on RGB only (sprite art convention)
    pub const MAGENTA: ColorKey = ColorKey {
        color: MAGENTA,
        mask: 0x00FF_FFFF,
    };

    /// Match one exact ARGB value
    pub const fn exact(color: u32) -> Self {
        Self {
            color,
            mask: 0xFFFF_FFFF,
        }
    }

    /// Match RGB, ignoring alpha
    pub const fn rgb(color: u32) -> Self {
        Self {
            color,
            mask: 0x00FF_FFFF,
        }
    }

    #[inline]
    pub const fn matches(&self, pixel: u32) -> bool {
        pixel & self.mask == self.color & self.mask
    }
}

// ============================================================================
// PixelSource
// ============================================================================

/// Read-only view of a strided pixel buffer used as a blit source
#[derive(Debug, Clone, Copy)]
pub struct PixelSource<'a> {
    pixels: &'a [u32],
    width: u32,
    height: u32,
    stride: u32,
}

impl<'a> PixelSource<'a> {
    /// Wrap a raw buffer, checking it actually holds `height` rows of `stride`
    pub fn new(pixels: &'a [u32], width: u32, height: u32, stride: u32) -> FrameResult<Self> {
        if stride < width {
            return Err(FrameError::invalid_state(format!(
                "source stride {} is smaller than width {}",
                stride, width
            )));
        }
        let needed = if width == 0 || height == 0 {
            0
        } else {
            (height as usize - 1) * stride as usize + width as usize
        };
        if pixels.len() < needed {
            return Err(FrameError::invalid_state(format!(
                "{}x{} source with stride {} needs {} pixels, got {}",
                width,
                height,
                stride,
                needed,
                pixels.len()
            )));
        }
        Ok(Self {
            pixels,
            width,
            height,
            stride,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Sub-rectangle of this source; must lie fully inside it
    pub fn region(&self, x: u32, y: u32, w: u32, h: u32) -> FrameResult<PixelSource<'a>> {
        let fits = x.checked_add(w).is_some_and(|r| r <= self.width)
            && y.checked_add(h).is_some_and(|b| b <= self.height);
        if !fits {
            return Err(FrameError::invalid_state(format!(
                "region {}x{}+{}+{} outside {}x{} source",
                w, h, x, y, self.width, self.height
            )));
        }
        if w == 0 || h == 0 {
            return Ok(PixelSource {
                pixels: &[],
                width: w,
                height: h,
                stride: self.stride,
            });
        }
        let start = y as usize * self.stride as usize + x as usize;
        Ok(PixelSource {
            pixels: &self.pixels[start..],
            width: w,
            height: h,
            stride: self.stride,
        })
    }

    #[inline]
    fn row(&self, y: usize, x: usize, len: usize) -> &'a [u32] {
        let start = y * self.stride as usize + x;
        &self.pixels[start..start + len]
    }
}

impl PixelSurface {
    /// Borrow this surface as a blit source
    pub fn source(&self) -> PixelSource<'_> {
        PixelSource {
            pixels: self.as_slice(),
            width: self.width(),
            height: self.height(),
            stride: self.stride(),
        }
    }
}

// ============================================================================
// Clipping
// ============================================================================

/// Overlap of a `src_w x src_h` block placed at (x, y) with the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Clip {
    src_x: usize,
    src_y: usize,
    dst_x: usize,
    dst_y: usize,
    w: usize,
    h: usize,
}

/// Negative positions trim leading source rows/columns; overflow past the
/// destination trims trailing ones. `None` when nothing overlaps.
fn clip_blit(dst_w: u32, dst_h: u32, src_w: u32, src_h: u32, x: i32, y: i32) -> Option<Clip> {
    let (x, y) = (x as i64, y as i64);
    let src_x = (-x).max(0);
    let src_y = (-y).max(0);
    let end_x = (src_w as i64).min(dst_w as i64 - x);
    let end_y = (src_h as i64).min(dst_h as i64 - y);
    if src_x >= end_x || src_y >= end_y {
        return None;
    }
    Some(Clip {
        src_x: src_x as usize,
        src_y: src_y as usize,
        dst_x: (x + src_x) as usize,
        dst_y: (y + src_y) as usize,
        w: (end_x - src_x) as usize,
        h: (end_y - src_y) as usize,
    })
}

impl PixelSurface {
    // ========================================================================
    // Blits
    // ========================================================================

    /// Copy `src` onto this surface with its top-left at (x, y)
    ///
    /// Clipped on all four edges; a block that misses the surface entirely
    /// is a no-op. Rows are moved with `copy_from_slice`.
    pub fn blit(&mut self, src: PixelSource<'_>, x: i32, y: i32) {
        let Some(c) = clip_blit(self.width(), self.height(), src.width, src.height, x, y) else {
            tracing::trace!(x, y, w = src.width, h = src.height, "blit fully clipped");
            return;
        };
        for row in 0..c.h {
            let s = src.row(c.src_y + row, c.src_x, c.w);
            self.row_mut((c.dst_y + row) as u32)[c.dst_x..c.dst_x + c.w].copy_from_slice(s);
        }
    }

    /// Blit, skipping source pixels that match `key`
    pub fn blit_keyed(&mut self, src: PixelSource<'_>, x: i32, y: i32, key: ColorKey) {
        let Some(c) = clip_blit(self.width(), self.height(), src.width, src.height, x, y) else {
            return;
        };
        for row in 0..c.h {
            let s = src.row(c.src_y + row, c.src_x, c.w);
            let d = &mut self.row_mut((c.dst_y + row) as u32)[c.dst_x..c.dst_x + c.w];
            for (dp, &sp) in d.iter_mut().zip(s) {
                if !key.matches(sp) {
                    *dp = sp;
                }
            }
        }
    }

    /// Blit, optionally keyed
    pub fn blit_with(&mut self, src: PixelSource<'_>, x: i32, y: i32, key: Option<ColorKey>) {
        match key {
            Some(key) => self.blit_keyed(src, x, y, key),
            None => self.blit(src, x, y),
        }
    }

    /// Convenience: copy a whole surface
    pub fn blit_surface(&mut self, src: &PixelSurface, x: i32, y: i32) {
        self.blit(src.source(), x, y);
    }

    /// Copy the `w` x `h` rectangle of `src` at (`src_x`, `src_y`) to (x, y)
    ///
    /// The source rectangle must lie inside `src`; the destination clips.
    pub fn blit_region(
        &mut self,
        src: &PixelSurface,
        src_x: u32,
        src_y: u32,
        w: u32,
        h: u32,
        x: i32,
        y: i32,
    ) -> FrameResult<()> {
        self.blit(src.source().region(src_x, src_y, w, h)?, x, y);
        Ok(())
    }

    /// Composite `src` using its per-pixel alpha (see [`blend_pixel`])
    pub fn blend_surface(&mut self, src: PixelSource<'_>, x: i32, y: i32) {
        let Some(c) = clip_blit(self.width(), self.height(), src.width, src.height, x, y) else {
            return;
        };
        for row in 0..c.h {
            let s = src.row(c.src_y + row, c.src_x, c.w);
            let d = &mut self.row_mut((c.dst_y + row) as u32)[c.dst_x..c.dst_x + c.w];
            for (dp, &sp) in d.iter_mut().zip(s) {
                *dp = blend_pixel(sp, *dp);
            }
        }
    }

    /// Blend a uniform colour over a rectangle (translucent overlays)
    pub fn blend_region(&mut self, x: i32, y: i32, w: u32, h: u32, color: u32) {
        let Some(c) = clip_blit(self.width(), self.height(), w, h, x, y) else {
            return;
        };
        for row in 0..c.h {
            let d = &mut self.row_mut((c.dst_y + row) as u32)[c.dst_x..c.dst_x + c.w];
            for dp in d {
                *dp = blend_pixel(color, *dp);
            }
        }
    }

    /// Nearest-neighbour zoom of `src`, centered and shifted by the pan offset
    ///
    /// Destination pixels outside the scaled image are left untouched.
    /// A non-positive or non-finite zoom draws nothing.
    pub fn blit_scaled(&mut self, src: &PixelSurface, zoom: f32, pan_x: i32, pan_y: i32) {
        if !(zoom.is_finite() && zoom > 0.0) {
            return;
        }
        let scaled_w = (src.width() as f32 * zoom) as i64;
        let scaled_h = (src.height() as f32 * zoom) as i64;
        let image_x = (self.width() as i64 - scaled_w) / 2 + pan_x as i64;
        let image_y = (self.height() as i64 - scaled_h) / 2 + pan_y as i64;

        let y0 = image_y.max(0);
        let y1 = (image_y + scaled_h).min(self.height() as i64);
        let x0 = image_x.max(0);
        let x1 = (image_x + scaled_w).min(self.width() as i64);

        for y in y0..y1 {
            let sy = ((y - image_y) as f32 / zoom) as u32;
            if sy >= src.height() {
                continue;
            }
            let src_row = src.row(sy);
            let dst_row = self.row_mut(y as u32);
            for x in x0..x1 {
                let sx = ((x - image_x) as f32 / zoom) as usize;
                if let Some(&p) = src_row.get(sx) {
                    dst_row[x as usize] = p;
                }
            }
        }
    }
}
