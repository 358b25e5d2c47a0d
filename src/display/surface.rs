use super::color::TRANSPARENT;
use crate::error::{FrameError, FrameResult};

// ============================================================================
// PixelSurface
// ============================================================================

/// ARGB8888 pixel surface for software rendering
///
/// One contiguous `u32` buffer of `stride * height` pixels. Rows may be
/// padded (`stride >= width`); padding pixels are never drawn to.
/// Every accessor taking signed coordinates clips silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelSurface {
    pixels: Vec<u32>,
    width: u32,
    height: u32,
    stride: u32,
}

impl PixelSurface {
    /// Create a surface filled with transparent black
    pub fn new(width: u32, height: u32) -> FrameResult<Self> {
        Self::with_fill(width, height, TRANSPARENT)
    }

    /// Create a surface filled with `fill`
    pub fn with_fill(width: u32, height: u32, fill: u32) -> FrameResult<Self> {
        Self::with_stride(width, height, width, fill)
    }

    /// Create a surface whose rows are `stride` pixels apart
    pub fn with_stride(width: u32, height: u32, stride: u32, fill: u32) -> FrameResult<Self> {
        let len = checked_len(width, height, stride)?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|e| FrameError::allocation(width, height, e.to_string()))?;
        pixels.resize(len, fill);

        tracing::debug!(width, height, stride, "allocated pixel surface");
        Ok(Self {
            pixels,
            width,
            height,
            stride,
        })
    }

    /// Adopt an existing pixel buffer (e.g. from an asset loader)
    ///
    /// `pixels.len()` must equal `stride * height`.
    pub fn from_pixels(width: u32, height: u32, stride: u32, pixels: Vec<u32>) -> FrameResult<Self> {
        let len = checked_len(width, height, stride)?;
        if pixels.len() != len {
            return Err(FrameError::invalid_state(format!(
                "{}x{} surface with stride {} needs {} pixels, got {}",
                width,
                height,
                stride,
                len,
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

    /// Pixels per row, including padding
    #[inline]
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.stride as usize + x as usize
    }

    /// Set a single pixel (bounds checked, out-of-range is a no-op)
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if self.in_bounds(x, y) {
            let idx = self.index(x as u32, y as u32);
            self.pixels[idx] = color;
        }
    }

    /// Read a pixel; transparent black for out-of-range coordinates
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> u32 {
        if self.in_bounds(x, y) {
            self.pixels[self.index(x as u32, y as u32)]
        } else {
            TRANSPARENT
        }
    }

    /// Overwrite every pixel, padding included
    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    /// Visible pixels of row `y` (padding excluded)
    #[inline]
    pub fn row(&self, y: u32) -> &[u32] {
        let start = self.index(0, y);
        &self.pixels[start..start + self.width as usize]
    }

    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u32] {
        let start = self.index(0, y);
        let end = start + self.width as usize;
        &mut self.pixels[start..end]
    }

    /// Whole buffer including row padding
    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.pixels
    }

    /// Mutable whole buffer, for the display boundary only
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    /// Native-endian bytes for texture upload (pitch = `stride * 4`)
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

fn checked_len(width: u32, height: u32, stride: u32) -> FrameResult<usize> {
    if width == 0 || height == 0 {
        return Err(FrameError::allocation(
            width,
            height,
            "dimensions must be non-zero",
        ));
    }
    if stride < width {
        return Err(FrameError::allocation(
            width,
            height,
            format!("stride {} is smaller than width", stride),
        ));
    }
    (stride as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| FrameError::allocation(width, height, "pixel count overflows"))
}

// ============================================================================
// Double Buffering
// ============================================================================

/// Front/back surface pair: draw into the back, present the front
#[derive(Debug, Clone)]
pub struct DoubleBuffer {
    front: PixelSurface,
    back: PixelSurface,
}

impl DoubleBuffer {
    pub fn new(width: u32, height: u32) -> FrameResult<Self> {
        Ok(Self {
            front: PixelSurface::new(width, height)?,
            back: PixelSurface::new(width, height)?,
        })
    }

    /// Surface currently being presented
    #[inline]
    pub fn front(&self) -> &PixelSurface {
        &self.front
    }

    /// Surface being drawn for the next frame
    #[inline]
    pub fn back_mut(&mut self) -> &mut PixelSurface {
        &mut self.back
    }

    /// Exchange front and back; no pixels are copied
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.front, &mut self.back);
    }
}
