//! Packed ARGB8888 pixel helpers
//!
//! A pixel is `A<<24 | R<<16 | G<<8 | B`, straight (non-premultiplied) alpha.

/// Fully transparent black, the default fill of every new surface.
pub const TRANSPARENT: u32 = 0x0000_0000;
pub const BLACK: u32 = 0xFF00_0000;
pub const WHITE: u32 = 0xFFFF_FFFF;
pub const MAGENTA: u32 = 0xFFFF_00FF;

/// Pack four channels into an ARGB pixel
#[inline]
pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Pack an opaque pixel
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    argb(255, r, g, b)
}

#[inline]
pub const fn alpha(c: u32) -> u8 {
    (c >> 24) as u8
}

#[inline]
pub const fn red(c: u32) -> u8 {
    (c >> 16) as u8
}

#[inline]
pub const fn green(c: u32) -> u8 {
    (c >> 8) as u8
}

#[inline]
pub const fn blue(c: u32) -> u8 {
    c as u8
}

/// Unpack into (a, r, g, b)
#[inline]
pub const fn split(c: u32) -> (u8, u8, u8, u8) {
    (alpha(c), red(c), green(c), blue(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_order() {
        let c = argb(0x11, 0x22, 0x33, 0x44);
        assert_eq!(c, 0x1122_3344);
        assert_eq!(split(c), (0x11, 0x22, 0x33, 0x44));
    }

    #[test]
    fn test_rgb_is_opaque() {
        assert_eq!(rgb(255, 0, 255), MAGENTA);
        assert_eq!(alpha(rgb(1, 2, 3)), 255);
    }
}
