use clap::Parser;
use sdl2::keyboard::Keycode;
use softframe::display::{color, Display, InputEvent, RenderTarget, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use softframe::math3d::{draw_wireframe, Mat4, Mesh, Vec3};
use softframe::sprite::{Animation, Sprite, SpriteSheet, SpriteWorld};
use softframe::tilemap::TileMapDesc;
use softframe::util::{FpsCounter, Rng};
use softframe::{render_tilemap, ColorKey, PixelSurface, Viewport};
use tracing_subscriber::EnvFilter;

/// Scroll speed in pixels per second
const SCROLL_SPEED: f32 = 240.0;

#[derive(Parser, Debug)]
#[command(name = "softframe", about = "Software rendering demo")]
struct Args {
    /// Window width in pixels
    #[arg(long, short = 'W', default_value_t = DEFAULT_WIDTH)]
    width: u32,

    /// Window height in pixels
    #[arg(long, short = 'H', default_value_t = DEFAULT_HEIGHT)]
    height: u32,

    /// Disable VSync for uncapped framerate
    #[arg(long)]
    no_vsync: bool,

    /// Tilemap description (JSON); a generated map is used when omitted
    #[arg(long)]
    map: Option<std::path::PathBuf>,
}

/// Arrow keys currently held
#[derive(Default)]
struct Held {
    left: bool,
    right: bool,
    up: bool,
    down: bool,
}

impl Held {
    fn set(&mut self, key: Keycode, down: bool) {
        match key {
            Keycode::Left | Keycode::A => self.left = down,
            Keycode::Right | Keycode::D => self.right = down,
            Keycode::Up | Keycode::W => self.up = down,
            Keycode::Down | Keycode::S => self.down = down,
            _ => {},
        }
    }

    fn axis(&self) -> (f32, f32) {
        let x = self.right as i32 - self.left as i32;
        let y = self.down as i32 - self.up as i32;
        (x as f32, y as f32)
    }
}

/// Coloured frames for the corner animation, magenta as background
fn build_sheet() -> Result<SpriteSheet, String> {
    const FRAMES: u32 = 6;
    const SIZE: u32 = 24;
    let mut strip = PixelSurface::with_fill(SIZE * FRAMES, SIZE, color::MAGENTA)
        .map_err(|e| e.to_string())?;
    for i in 0..FRAMES {
        let c = color::rgb((i * 50 % 256) as u8, (i * 30 + 100) as u8, (i * 70 + 200) as u8);
        let cx = (i * SIZE + SIZE / 2) as i32;
        strip.fill_circle(cx, SIZE as i32 / 2, 4 + i as i32, c);
    }
    SpriteSheet::new(strip, SIZE).map_err(|e| e.to_string())
}

fn spawn_bouncers(world: &mut SpriteWorld, rng: &mut Rng, width: u32, height: u32) {
    for _ in 0..12 {
        let x = rng.range_i32(0, (width as i32 - 16).max(0)) as f32;
        let y = rng.range_i32(0, (height as i32 - 16).max(0)) as f32;
        let dx = rng.range_i32(-120, 120) as f32;
        let dy = rng.range_i32(-120, 120) as f32;
        let c = 0xFF00_0000 | (rng.next_u32() & 0x00FF_FFFF);
        world.spawn(Sprite::new(x, y, 12, 12, c).with_velocity(dx, dy));
    }
}

fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let (width, height) = (args.width, args.height);

    let desc = match &args.map {
        Some(path) => TileMapDesc::load(path).map_err(|e| e.to_string())?,
        None => TileMapDesc::generate(60, 80, 32, 42),
    };
    let map = desc.build().map_err(|e| e.to_string())?;
    let key = desc.transparent_key;

    let (mut display, texture_creator) =
        Display::open("softframe", width, height, !args.no_vsync)?;
    let mut frame = PixelSurface::new(width, height).map_err(|e| e.to_string())?;
    let mut target = RenderTarget::for_surface(&texture_creator, &frame)?;

    let mut viewport = Viewport::for_surface(&frame);
    let mut held = Held::default();
    let mut scroll_carry = (0.0f32, 0.0f32);

    let cube = Mesh::cube(1.0);
    let proj = Mat4::perspective(60f32.to_radians(), width as f32 / height as f32, 0.1, 100.0);
    let view = Mat4::look_at(
        Vec3::new(0.0, 1.5, 4.0),
        Vec3::zero(),
        Vec3::new(0.0, 1.0, 0.0),
    );
    let mut angle = 0.0f32;

    let sheet = build_sheet()?;
    let mut anim = Animation::new(sheet.frame_count(), 100);
    let mut rng = Rng::new(7);
    let mut world = SpriteWorld::new();
    spawn_bouncers(&mut world, &mut rng, width, height);

    let mut fps_counter = FpsCounter::new(60);
    let mut show_fps = false;
    let mut elapsed_ms = 0u64;

    tracing::info!(
        width,
        height,
        vsync = !args.no_vsync,
        map = %desc.name,
        "starting"
    );
    println!("Controls:");
    println!("  Arrows/WASD - Scroll the map");
    println!("  Space       - Respawn bouncing sprites");
    println!("  F           - Toggle FPS logging");
    println!("  Escape      - Quit");

    let mut frames = 0u32;
    'main: loop {
        let (dt, avg_fps) = fps_counter.tick();
        elapsed_ms += (dt * 1000.0) as u64;

        for event in display.poll_events() {
            match event {
                InputEvent::Quit | InputEvent::KeyDown(Keycode::Escape) => break 'main,
                InputEvent::KeyDown(Keycode::F) => show_fps = !show_fps,
                InputEvent::KeyDown(Keycode::Space) => {
                    spawn_bouncers(&mut world, &mut rng, width, height);
                },
                InputEvent::KeyDown(k) => held.set(k, true),
                InputEvent::KeyUp(k) => held.set(k, false),
            }
        }

        // Sub-pixel scroll accumulates across frames
        let (ax, ay) = held.axis();
        scroll_carry.0 += ax * SCROLL_SPEED * dt;
        scroll_carry.1 += ay * SCROLL_SPEED * dt;
        let (dx, dy) = (scroll_carry.0.trunc(), scroll_carry.1.trunc());
        scroll_carry.0 -= dx;
        scroll_carry.1 -= dy;
        viewport.scroll(dx as i32, dy as i32, map.pixel_width(), map.pixel_height());

        // Update
        world.update(dt);
        for sprite in world.sprites_mut() {
            sprite.bounce_within(width, height);
        }
        for (a, b) in world.collisions() {
            let sprites = world.sprites_mut();
            sprites[a].color = color::WHITE;
            sprites[b].color = color::WHITE;
        }
        anim.update(elapsed_ms);
        angle += dt;

        // Render
        frame.clear(color::rgb(32, 32, 64));
        render_tilemap(&mut frame, &map, &viewport, key);
        world.render(&mut frame);
        frame.blend_region(0, 0, width, 40, color::argb(128, 0, 0, 0));

        let model = Mat4::rotation_y(angle) * Mat4::rotation_x(angle * 0.5);
        draw_wireframe(&mut frame, &cube, &(proj * view * model), color::WHITE);

        sheet
            .draw(&mut frame, anim.frame_index, 8, 8, Some(ColorKey::MAGENTA))
            .map_err(|e| e.to_string())?;

        display.present(&mut target, &frame)?;

        frames = frames.wrapping_add(1);
        if show_fps && frames % 60 == 0 {
            tracing::info!(
                fps = avg_fps as u32,
                x = viewport.x_offset,
                y = viewport.y_offset,
                "frame stats"
            );
        }
    }

    tracing::info!(frames, "shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_bouncers_in_window_smaller_than_sprite() {
        let mut world = SpriteWorld::new();
        let mut rng = Rng::new(3);
        spawn_bouncers(&mut world, &mut rng, 8, 4);
        assert_eq!(world.len(), 12);
        for sprite in world.sprites() {
            assert_eq!((sprite.x, sprite.y), (0.0, 0.0));
        }

        spawn_bouncers(&mut world, &mut rng, 640, 480);
        for sprite in &world.sprites()[12..] {
            assert!((0.0..=624.0).contains(&sprite.x));
            assert!((0.0..=464.0).contains(&sprite.y));
        }
    }
}
