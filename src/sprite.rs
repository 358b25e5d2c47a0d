//! Sprites: sheet frames, timed animation, moving boxes
//!
//! All game state lives in [`SpriteWorld`], which the caller owns and
//! passes to update and render each frame.

use crate::display::{ColorKey, PixelSource, PixelSurface};
use crate::error::{FrameError, FrameResult};

/// Horizontal strip of equally sized animation frames
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    image: PixelSurface,
    frame_width: u32,
    frame_count: u32,
}

impl SpriteSheet {
    /// Split `image` into frames `frame_width` pixels wide
    ///
    /// Trailing columns that do not fill a whole frame are ignored.
    pub fn new(image: PixelSurface, frame_width: u32) -> FrameResult<Self> {
        if frame_width == 0 || frame_width > image.width() {
            return Err(FrameError::invalid_state(format!(
                "frame width {} does not fit a {}px sheet",
                frame_width,
                image.width()
            )));
        }
        let frame_count = image.width() / frame_width;
        Ok(Self {
            image,
            frame_width,
            frame_count,
        })
    }

    #[inline]
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    #[inline]
    pub fn frame_width(&self) -> u32 {
        self.frame_width
    }

    #[inline]
    pub fn frame_height(&self) -> u32 {
        self.image.height()
    }

    /// View of one frame; the index wraps around the strip
    pub fn frame(&self, index: u32) -> FrameResult<PixelSource<'_>> {
        let index = index % self.frame_count;
        self.image.source().region(
            index * self.frame_width,
            0,
            self.frame_width,
            self.image.height(),
        )
    }

    /// Blit one frame at (x, y), clipped, optionally keyed
    pub fn draw(
        &self,
        target: &mut PixelSurface,
        index: u32,
        x: i32,
        y: i32,
        key: Option<ColorKey>,
    ) -> FrameResult<()> {
        target.blit_with(self.frame(index)?, x, y, key);
        Ok(())
    }
}

/// Frame counter driven by a millisecond clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    pub frame_index: u32,
    pub frame_count: u32,
    pub frame_delay_ms: u64,
    pub last_frame_ms: u64,
}

impl Animation {
    pub fn new(frame_count: u32, frame_delay_ms: u64) -> Self {
        Self {
            frame_index: 0,
            frame_count: frame_count.max(1),
            frame_delay_ms,
            last_frame_ms: 0,
        }
    }

    /// Step to the next frame once the delay has elapsed
    ///
    /// Returns true when the frame changed. A clock that runs backwards
    /// never advances.
    pub fn update(&mut self, now_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_frame_ms) < self.frame_delay_ms {
            return false;
        }
        self.frame_index = (self.frame_index + 1) % self.frame_count;
        self.last_frame_ms = now_ms;
        true
    }

    pub fn reset(&mut self, now_ms: u64) {
        self.frame_index = 0;
        self.last_frame_ms = now_ms;
    }
}

/// Axis-aligned moving box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub width: u32,
    pub height: u32,
    pub color: u32,
    pub active: bool,
}

impl Sprite {
    pub fn new(x: f32, y: f32, width: u32, height: u32, color: u32) -> Self {
        Self {
            x,
            y,
            dx: 0.0,
            dy: 0.0,
            width,
            height,
            color,
            active: true,
        }
    }

    pub fn with_velocity(mut self, dx: f32, dy: f32) -> Self {
        self.dx = dx;
        self.dy = dy;
        self
    }

    /// Advance by velocity * dt (seconds)
    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.x += self.dx * dt;
        self.y += self.dy * dt;
    }

    /// Fill the sprite's box; inactive sprites draw nothing
    pub fn render(&self, surface: &mut PixelSurface) {
        if !self.active {
            return;
        }
        surface.fill_rect(self.x as i32, self.y as i32, self.width, self.height, self.color);
    }

    /// AABB overlap; touching edges do not collide
    pub fn collides_with(&self, other: &Sprite) -> bool {
        self.active
            && other.active
            && self.x < other.x + other.width as f32
            && self.x + self.width as f32 > other.x
            && self.y < other.y + other.height as f32
            && self.y + self.height as f32 > other.y
    }

    /// Reflect velocity off the edges of a `width` x `height` area and
    /// clamp the box inside it
    pub fn bounce_within(&mut self, width: u32, height: u32) {
        let max_x = (width as f32 - self.width as f32).max(0.0);
        let max_y = (height as f32 - self.height as f32).max(0.0);
        if self.x <= 0.0 || self.x >= max_x {
            self.dx = -self.dx;
        }
        if self.y <= 0.0 || self.y >= max_y {
            self.dy = -self.dy;
        }
        self.x = self.x.clamp(0.0, max_x);
        self.y = self.y.clamp(0.0, max_y);
    }

    /// True when the box lies entirely outside a `width` x `height` area
    pub fn is_outside(&self, width: u32, height: u32) -> bool {
        self.x + self.width as f32 <= 0.0
            || self.y + self.height as f32 <= 0.0
            || self.x >= width as f32
            || self.y >= height as f32
    }
}

/// Owned collection of sprites updated and drawn together
#[derive(Debug, Clone, Default)]
pub struct SpriteWorld {
    sprites: Vec<Sprite>,
}

impl SpriteWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sprite, returning its current index
    pub fn spawn(&mut self, sprite: Sprite) -> usize {
        self.sprites.push(sprite);
        self.sprites.len() - 1
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn sprites_mut(&mut self) -> &mut [Sprite] {
        &mut self.sprites
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn update(&mut self, dt: f32) {
        for sprite in &mut self.sprites {
            sprite.update(dt);
        }
    }

    /// Draw in spawn order, so later sprites land on top
    pub fn render(&self, surface: &mut PixelSurface) {
        for sprite in &self.sprites {
            sprite.render(surface);
        }
    }

    /// Drop inactive sprites and those fully outside the area
    ///
    /// Returns how many were removed. Indices of the survivors shift down.
    pub fn cull_outside(&mut self, width: u32, height: u32) -> usize {
        let before = self.sprites.len();
        self.sprites
            .retain(|s| s.active && !s.is_outside(width, height));
        let removed = before - self.sprites.len();
        if removed > 0 {
            tracing::trace!(removed, remaining = self.sprites.len(), "culled sprites");
        }
        removed
    }

    /// All colliding index pairs `(i, j)` with `i < j`
    pub fn collisions(&self) -> Vec<(usize, usize)> {
        let mut hits = Vec::new();
        for (i, a) in self.sprites.iter().enumerate() {
            for (j, b) in self.sprites.iter().enumerate().skip(i + 1) {
                if a.collides_with(b) {
                    hits.push((i, j));
                }
            }
        }
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip() -> PixelSurface {
        // three 2x2 frames: 1s, 2s, 3s
        let mut s = PixelSurface::new(6, 2).unwrap();
        for y in 0..2 {
            for (x, p) in s.row_mut(y).iter_mut().enumerate() {
                *p = x as u32 / 2 + 1;
            }
        }
        s
    }

    #[test]
    fn test_sheet_frames() {
        let sheet = SpriteSheet::new(strip(), 2).unwrap();
        assert_eq!(sheet.frame_count(), 3);
        assert_eq!(sheet.frame_height(), 2);

        let mut target = PixelSurface::new(4, 4).unwrap();
        sheet.draw(&mut target, 1, 1, 1, None).unwrap();
        assert_eq!(target.row(1), &[0, 2, 2, 0]);
        // index wraps
        sheet.draw(&mut target, 5, 0, 0, None).unwrap();
        assert_eq!(target.get_pixel(0, 0), 3);
    }

    #[test]
    fn test_sheet_keyed_and_clipped() {
        let sheet = SpriteSheet::new(strip(), 2).unwrap();
        let mut target = PixelSurface::with_fill(3, 3, 9).unwrap();
        sheet
            .draw(&mut target, 0, -1, 2, Some(ColorKey::exact(1)))
            .unwrap();
        assert!(target.as_slice().iter().all(|&p| p == 9));
        sheet.draw(&mut target, 2, 2, 2, None).unwrap();
        assert_eq!(target.get_pixel(2, 2), 3);
    }

    #[test]
    fn test_sheet_rejects_bad_frame_width() {
        assert!(SpriteSheet::new(strip(), 0).is_err());
        assert!(SpriteSheet::new(strip(), 7).is_err());
        // trailing column ignored
        assert_eq!(SpriteSheet::new(strip(), 4).unwrap().frame_count(), 1);
    }

    #[test]
    fn test_animation_timing() {
        let mut anim = Animation::new(3, 100);
        assert!(!anim.update(99));
        assert!(anim.update(100));
        assert_eq!(anim.frame_index, 1);
        assert!(!anim.update(150));
        assert!(anim.update(200));
        assert!(anim.update(300));
        assert_eq!(anim.frame_index, 0);
        // clock going backwards does not advance
        assert!(!anim.update(50));
        anim.reset(1000);
        assert_eq!(anim.frame_index, 0);
        assert!(!anim.update(1050));
    }

    #[test]
    fn test_sprite_motion_and_render() {
        let mut s = Sprite::new(1.0, 1.0, 2, 2, 5).with_velocity(10.0, 0.0);
        s.update(0.1);
        assert_eq!(s.x, 2.0);

        let mut target = PixelSurface::new(5, 5).unwrap();
        s.render(&mut target);
        assert_eq!(target.row(1), &[0, 0, 5, 5, 0]);

        s.active = false;
        s.update(1.0);
        assert_eq!(s.x, 2.0);
        let mut blank = PixelSurface::new(5, 5).unwrap();
        s.render(&mut blank);
        assert!(blank.as_slice().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_collision_aabb() {
        let a = Sprite::new(0.0, 0.0, 4, 4, 1);
        let b = Sprite::new(3.0, 3.0, 4, 4, 1);
        let touching = Sprite::new(4.0, 0.0, 4, 4, 1);
        assert!(a.collides_with(&b));
        assert!(b.collides_with(&a));
        assert!(!a.collides_with(&touching));
        let mut dead = b;
        dead.active = false;
        assert!(!a.collides_with(&dead));
    }

    #[test]
    fn test_bounce_within() {
        let mut s = Sprite::new(9.0, 5.0, 2, 2, 1).with_velocity(3.0, 1.0);
        s.bounce_within(10, 10);
        assert_eq!((s.x, s.dx), (8.0, -3.0));
        assert_eq!(s.dy, 1.0);
    }

    #[test]
    fn test_world_update_cull_collide() {
        let mut world = SpriteWorld::new();
        world.spawn(Sprite::new(0.0, 0.0, 4, 4, 1));
        world.spawn(Sprite::new(2.0, 2.0, 4, 4, 2));
        world.spawn(Sprite::new(20.0, 0.0, 4, 4, 3).with_velocity(0.0, -100.0));
        world.spawn(Sprite::new(50.0, 50.0, 1, 1, 4));

        assert_eq!(world.collisions(), vec![(0, 1)]);

        world.update(1.0);
        assert_eq!(world.cull_outside(32, 32), 2);
        assert_eq!(world.len(), 2);

        world.sprites_mut()[1].active = false;
        assert!(world.collisions().is_empty());
        assert_eq!(world.cull_outside(32, 32), 1);

        let mut target = PixelSurface::new(8, 8).unwrap();
        world.render(&mut target);
        assert_eq!(target.get_pixel(3, 3), 1);
        assert_eq!(target.get_pixel(5, 5), 0);
    }

    #[test]
    fn test_world_render_order() {
        let mut world = SpriteWorld::new();
        world.spawn(Sprite::new(0.0, 0.0, 2, 2, 1));
        world.spawn(Sprite::new(1.0, 1.0, 2, 2, 2));
        let mut target = PixelSurface::new(3, 3).unwrap();
        world.render(&mut target);
        assert_eq!(target.get_pixel(1, 1), 2);
        assert_eq!(target.get_pixel(0, 0), 1);
    }
}
