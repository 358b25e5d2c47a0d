//! Scan-line and pixel primitives
//!
//! Every primitive clips against the surface and never fails; geometry that
//! falls partly or wholly off-canvas simply draws fewer pixels.

use super::PixelSurface;

impl PixelSurface {
    // ========================================================================
    // Spans
    // ========================================================================

    /// Draw a horizontal span from x1 to x2 inclusive (either order)
    pub fn hline(&mut self, x1: i32, x2: i32, y: i32, color: u32) {
        if y < 0 || y >= self.height() as i32 {
            return;
        }
        let (lo, hi) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let lo = lo.max(0);
        let hi = hi.min(self.width() as i32 - 1);
        if lo > hi {
            return;
        }
        self.row_mut(y as u32)[lo as usize..=hi as usize].fill(color);
    }

    /// Draw a vertical span from y1 to y2 inclusive (either order)
    pub fn vline(&mut self, x: i32, y1: i32, y2: i32, color: u32) {
        if x < 0 || x >= self.width() as i32 {
            return;
        }
        let (lo, hi) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        let lo = lo.max(0);
        let hi = hi.min(self.height() as i32 - 1);
        for y in lo..=hi {
            self.row_mut(y as u32)[x as usize] = color;
        }
    }

    // ========================================================================
    // Lines
    // ========================================================================

    /// Draw a line using Bresenham's algorithm, endpoints inclusive
    ///
    /// Endpoints are put in a canonical order first, so `(a, b)` and `(b, a)`
    /// light exactly the same pixels. The walk starts at the first step whose
    /// major coordinate is on the surface and stops once the line has left
    /// it, so cost is bounded by the surface size, not the line length. The
    /// visible pixels match the unclipped line exactly.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let ((x0, y0), (x1, y1)) = if (x0, y0) <= (x1, y1) {
            ((x0, y0), (x1, y1))
        } else {
            ((x1, y1), (x0, y0))
        };

        let w = self.width() as i64;
        let h = self.height() as i64;
        let (x0, y0, x1, y1) = (x0 as i64, y0 as i64, x1 as i64, y1 as i64);
        if (x0 < 0 && x1 < 0) || (x0 >= w && x1 >= w) || (y0 < 0 && y1 < 0) || (y0 >= h && y1 >= h)
        {
            return;
        }

        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };

        // Offsets (i, j) from the start along x and y. The major axis always
        // advances, so clip its range to the surface and derive the minor
        // offset for the first visible step in closed form.
        let x_major = dx >= dy;
        let visible = if x_major {
            visible_steps(x0, sx, dx, w)
        } else {
            visible_steps(y0, sy, dy, h)
        };
        let Some((first, last)) = visible else {
            return;
        };
        let (mut i, mut j) = if x_major {
            (first, minor_offset(first, dx, dy))
        } else {
            (minor_offset(first, dy, dx), first)
        };

        // err after (i, j) steps is dx*(j+1) - dy*(i+1); bounded, but the
        // products are not
        let mut err = (dx as i128 * (j as i128 + 1) - dy as i128 * (i as i128 + 1)) as i64;
        let mut entered = false;

        loop {
            let (x, y) = (x0 + sx * i, y0 + sy * j);
            if x >= 0 && x < w && y >= 0 && y < h {
                self.row_mut(y as u32)[x as usize] = color;
                entered = true;
            } else if entered {
                break;
            }
            if (if x_major { i } else { j }) >= last {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                i += 1;
            }
            if e2 < dx {
                err += dx;
                j += 1;
            }
        }
    }

    // ========================================================================
    // Circles
    // ========================================================================

    /// Draw a circle outline with the midpoint algorithm
    ///
    /// One octant is computed and reflected eight ways. A negative radius
    /// draws nothing; radius 0 plots the center. Circles whose outline
    /// cannot touch the surface return immediately, and the octant walk
    /// stops once no reflection can land on the surface again.
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: u32) {
        if radius < 0 {
            return;
        }
        let w = self.width() as i64;
        let h = self.height() as i64;
        let (cx, cy, r) = (cx as i64, cy as i64, radius as i64);

        if cx + r < 0 || cx - r >= w || cy + r < 0 || cy - r >= h {
            return;
        }
        // Surface strictly inside the circle: every outline pixel lies
        // within one pixel of the true radius
        let far_x = cx.max(w - 1 - cx) as i128;
        let far_y = cy.max(h - 1 - cy) as i128;
        let inner = (r - 2).max(0) as i128;
        if far_x * far_x + far_y * far_y < inner * inner {
            return;
        }

        // Offsets from the center that reach a column / row of the surface
        let (ax, bx) = offset_range(cx, w);
        let (ay, by) = offset_range(cy, h);

        let mut x = 0i64;
        let mut y = r;
        let mut p = 1 - r;

        self.plot_octants(cx, cy, x, y, color);
        while x < y {
            x += 1;
            if p < 0 {
                p += 2 * x + 1;
            } else {
                y -= 1;
                p += 2 * (x - y) + 1;
            }
            self.plot_octants(cx, cy, x, y, color);

            // x only grows and y only shrinks. (cx ± x, cy ± y) needs x in
            // the column offsets and y in the row offsets; (cx ± y, cy ± x)
            // the other way round. x never passes y + 1.
            let straight_done = x > bx || y < ay || y + 1 < ax;
            let swapped_done = x > by || y < ax || y + 1 < ay;
            if straight_done && swapped_done {
                break;
            }
        }
    }

    fn plot_octants(&mut self, cx: i64, cy: i64, x: i64, y: i64, color: u32) {
        self.plot(cx + x, cy + y, color);
        self.plot(cx - x, cy + y, color);
        self.plot(cx + x, cy - y, color);
        self.plot(cx - x, cy - y, color);
        self.plot(cx + y, cy + x, color);
        self.plot(cx - y, cy + x, color);
        self.plot(cx + y, cy - x, color);
        self.plot(cx - y, cy - x, color);
    }

    #[inline]
    fn plot(&mut self, x: i64, y: i64, color: u32) {
        if x >= 0 && y >= 0 && x < self.width() as i64 && y < self.height() as i64 {
            self.row_mut(y as u32)[x as usize] = color;
        }
    }

    /// Fill a circle one scan line at a time
    ///
    /// Row `cy + y` spans `cx ± floor(sqrt(r² - y²))`. Only rows on the
    /// surface are visited.
    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: u32) {
        if radius < 0 {
            return;
        }
        let h = self.height() as i64;
        let (cx, cy, r) = (cx as i64, cy as i64, radius as i64);
        let top = (-r).max(-cy);
        let bottom = r.min(h - 1 - cy);
        for y in top..=bottom {
            let row = cy + y;
            let x_span = ((r * r - y * y) as f64).sqrt().floor() as i64;
            let lo = (cx - x_span).max(i32::MIN as i64) as i32;
            let hi = (cx + x_span).min(i32::MAX as i64) as i32;
            self.hline(lo, hi, row as i32, color);
        }
    }

    // ========================================================================
    // Rectangles
    // ========================================================================

    /// Fill an axis-aligned rectangle, clipped to the surface
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: u32) {
        if w == 0 || h == 0 {
            return;
        }
        let x0 = (x as i64).max(0);
        let y0 = (y as i64).max(0);
        let x1 = (x as i64 + w as i64).min(self.width() as i64);
        let y1 = (y as i64 + h as i64).min(self.height() as i64);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        for row in y0..y1 {
            self.row_mut(row as u32)[x0 as usize..x1 as usize].fill(color);
        }
    }

    /// Draw a 1px rectangle outline
    pub fn draw_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: u32) {
        if w == 0 || h == 0 {
            return;
        }
        let right = (x as i64 + w as i64 - 1).min(i32::MAX as i64) as i32;
        let bottom = (y as i64 + h as i64 - 1).min(i32::MAX as i64) as i32;
        self.hline(x, right, y, color);
        self.hline(x, right, bottom, color);
        self.vline(x, y, bottom, color);
        self.vline(right, y, bottom, color);
    }
}

/// First and last step index along one axis whose coordinate lies in
/// `[0, size)`, for a walk from `start` taking `len` unit steps of `dir`
fn visible_steps(start: i64, dir: i64, len: i64, size: i64) -> Option<(i64, i64)> {
    // coordinate after k steps is start + dir * k, k in [0, len]
    let (lo, hi) = if dir > 0 {
        (-start, size - 1 - start)
    } else {
        (start - (size - 1), start)
    };
    let first = lo.max(0);
    let last = hi.min(len);
    (first <= last).then_some((first, last))
}

/// Minor-axis offset of the Bresenham walk at major step `k`
///
/// Smallest `m` with `2*major*m + major >= 2*minor*k`. `major > 0` whenever
/// this is called with `k > 0`.
fn minor_offset(k: i64, major: i64, minor: i64) -> i64 {
    if k == 0 || major == 0 {
        return 0;
    }
    let num = 2 * minor as i128 * k as i128 - major as i128;
    let den = 2 * major as i128;
    let m = -((-num).div_euclid(den));
    m.max(0) as i64
}

/// Range of |p - c| over the pixel coordinates p in `[0, size)`
fn offset_range(c: i64, size: i64) -> (i64, i64) {
    if c < 0 {
        (-c, size - 1 - c)
    } else if c >= size {
        (c - (size - 1), c)
    } else {
        (0, c.max(size - 1 - c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::color::{rgb, WHITE};
    use crate::util::Rng;
    use std::collections::HashSet;

    fn lit(s: &PixelSurface) -> HashSet<(i32, i32)> {
        let mut set = HashSet::new();
        for y in 0..s.height() as i32 {
            for x in 0..s.width() as i32 {
                if s.get_pixel(x, y) != 0 {
                    set.insert((x, y));
                }
            }
        }
        set
    }

    #[test]
    fn test_hline_clips_and_orders() {
        let mut s = PixelSurface::new(5, 2).unwrap();
        s.hline(7, -3, 1, WHITE);
        assert_eq!(s.row(1), &[WHITE; 5]);
        assert_eq!(s.row(0), &[0; 5]);
        s.hline(0, 4, 2, WHITE);
        s.hline(0, 4, -1, WHITE);
        assert_eq!(s.row(0), &[0; 5]);
    }

    #[test]
    fn test_line_includes_both_endpoints() {
        let mut s = PixelSurface::new(10, 10).unwrap();
        s.draw_line(1, 2, 8, 5, WHITE);
        assert_eq!(s.get_pixel(1, 2), WHITE);
        assert_eq!(s.get_pixel(8, 5), WHITE);
        // one pixel per column on an x-major line
        assert_eq!(lit(&s).len(), 8);
    }

    #[test]
    fn test_line_horizontal_vertical_diagonal() {
        let mut s = PixelSurface::new(8, 8).unwrap();
        s.draw_line(0, 0, 7, 7, WHITE);
        for i in 0..8 {
            assert_eq!(s.get_pixel(i, i), WHITE);
        }
        assert_eq!(lit(&s).len(), 8);

        let mut s = PixelSurface::new(8, 8).unwrap();
        s.draw_line(3, 6, 3, 1, WHITE);
        assert_eq!(lit(&s), (1..=6).map(|y| (3, y)).collect());

        let mut s = PixelSurface::new(8, 8).unwrap();
        s.draw_line(6, 2, 0, 2, WHITE);
        assert_eq!(lit(&s), (0..=6).map(|x| (x, 2)).collect());
    }

    #[test]
    fn test_line_direction_symmetry() {
        let mut rng = Rng::new(0xB1E5);
        let mut pairs: Vec<(i32, i32, i32, i32)> = vec![
            (0, 10, 31, 10),
            (12, 0, 12, 31),
            (0, 0, 31, 31),
            (31, 0, 0, 31),
            (0, 0, 2, 1),
            (-5, 3, 40, 20),
        ];
        for _ in 0..60 {
            pairs.push((
                rng.range_i32(-8, 40),
                rng.range_i32(-8, 40),
                rng.range_i32(-8, 40),
                rng.range_i32(-8, 40),
            ));
        }

        for (x0, y0, x1, y1) in pairs {
            let mut fwd = PixelSurface::new(32, 32).unwrap();
            let mut rev = PixelSurface::new(32, 32).unwrap();
            fwd.draw_line(x0, y0, x1, y1, WHITE);
            rev.draw_line(x1, y1, x0, y0, WHITE);
            assert_eq!(lit(&fwd), lit(&rev), "line ({x0},{y0})-({x1},{y1})");
        }
    }

    #[test]
    fn test_line_far_offscreen_is_noop() {
        let mut s = PixelSurface::new(8, 8).unwrap();
        s.draw_line(-1_000_000, -5, 1_000_000, -5, WHITE);
        s.draw_line(i32::MIN, i32::MIN, i32::MIN + 1, i32::MAX, WHITE);
        assert!(lit(&s).is_empty());
    }

    /// Unclipped Bresenham walk, filtered to the surface afterwards
    fn reference_line(x0: i64, y0: i64, x1: i64, y1: i64, w: i64, h: i64) -> HashSet<(i32, i32)> {
        let ((x0, y0), (x1, y1)) = if (x0, y0) <= (x1, y1) {
            ((x0, y0), (x1, y1))
        } else {
            ((x1, y1), (x0, y0))
        };
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y, mut err) = (x0, y0, dx - dy);
        let mut out = HashSet::new();
        loop {
            if x >= 0 && x < w && y >= 0 && y < h {
                out.insert((x as i32, y as i32));
            }
            if x == x1 && y == y1 {
                return out;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }
    }

    #[test]
    fn test_clipped_line_matches_full_walk() {
        let mut rng = Rng::new(0x11AE);
        for _ in 0..2000 {
            let span = [12, 50, 400][rng.range_i32(0, 2) as usize];
            let (w, h) = (rng.range_i32(1, 24), rng.range_i32(1, 24));
            let c: Vec<i32> = (0..4).map(|_| rng.range_i32(-span, span + 24)).collect();
            let mut s = PixelSurface::new(w as u32, h as u32).unwrap();
            s.draw_line(c[0], c[1], c[2], c[3], WHITE);
            let expected = reference_line(
                c[0] as i64,
                c[1] as i64,
                c[2] as i64,
                c[3] as i64,
                w as i64,
                h as i64,
            );
            assert_eq!(lit(&s), expected, "line {c:?} on {w}x{h}");
        }
    }

    #[test]
    fn test_huge_lines_touch_only_visible_span() {
        let mut s = PixelSurface::new(64, 64).unwrap();
        s.draw_line(10, 10, i32::MAX, 11, WHITE);
        assert_eq!(lit(&s), (10..64).map(|x| (x, 10)).collect());

        let mut rev = PixelSurface::new(64, 64).unwrap();
        rev.draw_line(i32::MAX, 11, 10, 10, WHITE);
        assert_eq!(lit(&rev), lit(&s));

        let mut s = PixelSurface::new(64, 64).unwrap();
        s.draw_line(32, 0, 33, i32::MAX, WHITE);
        assert_eq!(lit(&s), (0..64).map(|y| (32, y)).collect());

        let mut s = PixelSurface::new(64, 64).unwrap();
        s.draw_line(i32::MIN, i32::MIN, i32::MAX, i32::MAX, WHITE);
        assert_eq!(lit(&s), (0..64).map(|k| (k, k)).collect());
    }

    #[test]
    fn test_huge_circles() {
        // whole surface inside the outline
        let mut s = PixelSurface::new(64, 64).unwrap();
        s.draw_circle(-100, -100, i32::MAX, WHITE);
        assert!(lit(&s).is_empty());

        // outline far away on every side
        s.draw_circle(i32::MIN, i32::MIN, i32::MAX, WHITE);
        s.draw_circle(1_000_000_000, 1_000_000_000, 1000, WHITE);
        assert!(lit(&s).is_empty());

        // leftmost point of the outline grazes column 0
        s.draw_circle(i32::MAX, 32, i32::MAX, WHITE);
        assert_eq!(lit(&s), (0..64).map(|y| (0, y)).collect());

        let mut s = PixelSurface::new(64, 64).unwrap();
        s.fill_circle(0, 0, i32::MAX, WHITE);
        assert_eq!(lit(&s).len(), 64 * 64);

        let mut s = PixelSurface::new(64, 64).unwrap();
        s.fill_circle(32, i32::MIN, i32::MAX, WHITE);
        assert!(lit(&s).is_empty());
    }

    #[test]
    fn test_circle_points_lie_on_radius() {
        for r in [0, 1, 2, 5, 11, 20] {
            let mut s = PixelSurface::new(64, 64).unwrap();
            s.draw_circle(32, 32, r, WHITE);
            let pts = lit(&s);
            assert!(!pts.is_empty());
            for &(x, y) in &pts {
                let d = (((x - 32) * (x - 32) + (y - 32) * (y - 32)) as f32).sqrt();
                assert!((d.round() - r as f32).abs() <= 1.0, "r={r} point ({x},{y})");
            }
        }
    }

    #[test]
    fn test_circle_eightfold_symmetry() {
        let mut s = PixelSurface::new(64, 64).unwrap();
        s.draw_circle(30, 31, 17, WHITE);
        let pts: HashSet<(i32, i32)> = lit(&s).iter().map(|&(x, y)| (x - 30, y - 31)).collect();
        for &(x, y) in &pts {
            for p in [
                (x, -y),
                (-x, y),
                (-x, -y),
                (y, x),
                (-y, x),
                (y, -x),
                (-y, -x),
            ] {
                assert!(pts.contains(&p), "missing reflection {p:?} of ({x},{y})");
            }
        }
    }

    #[test]
    fn test_circle_partially_offscreen() {
        let mut s = PixelSurface::new(10, 10).unwrap();
        s.draw_circle(0, 0, 6, WHITE);
        let quadrant: HashSet<_> = [
            (0, 6),
            (1, 6),
            (2, 6),
            (3, 5),
            (4, 4),
            (5, 3),
            (6, 0),
            (6, 1),
            (6, 2),
        ]
        .into_iter()
        .collect();
        assert_eq!(lit(&s), quadrant);

        let mut s = PixelSurface::new(10, 10).unwrap();
        s.draw_circle(-3, 4, 5, WHITE);
        let right_arc: HashSet<_> = [
            (0, 0),
            (1, 1),
            (2, 2),
            (2, 3),
            (2, 4),
            (2, 5),
            (2, 6),
            (1, 7),
            (0, 8),
        ]
        .into_iter()
        .collect();
        assert_eq!(lit(&s), right_arc);

        let mut s = PixelSurface::new(10, 10).unwrap();
        s.draw_circle(0, 0, -3, WHITE);
        assert!(lit(&s).is_empty());
    }

    #[test]
    fn test_fill_circle_clipped_at_corner() {
        let mut s = PixelSurface::new(10, 10).unwrap();
        s.fill_circle(9, 9, 4, WHITE);
        // rows 5..=9 with half-chords 0, 2, 3, 3, 4, right side cut at x = 9
        let mut expected = HashSet::new();
        for (row, half) in [(5, 0), (6, 2), (7, 3), (8, 3), (9, 4)] {
            for x in 9 - half..=9 {
                expected.insert((x, row));
            }
        }
        assert_eq!(lit(&s), expected);
    }

    #[test]
    fn test_fill_circle_rows() {
        let mut s = PixelSurface::new(11, 11).unwrap();
        s.fill_circle(5, 5, 3, WHITE);
        // floor(sqrt(9 - y^2)) for y = 0..=3: 3, 2, 2, 0
        let spans = [(5, 3), (4, 2), (6, 2), (3, 2), (7, 2), (2, 0), (8, 0)];
        for (row, half) in spans {
            let count = s.row(row).iter().filter(|&&p| p == WHITE).count();
            assert_eq!(count, 2 * half + 1, "row {row}");
        }
        assert!(s.row(1).iter().all(|&p| p == 0));
        assert!(s.row(9).iter().all(|&p| p == 0));
    }

    #[test]
    fn test_fill_circle_clipped_at_top() {
        let mut s = PixelSurface::new(9, 9).unwrap();
        s.fill_circle(4, -2, 4, WHITE);
        // rows -6..=2 covered, only 0..=2 visible
        assert!(s.row(0).iter().any(|&p| p == WHITE));
        assert_eq!(s.row(2).iter().filter(|&&p| p == WHITE).count(), 1);
        assert!(s.row(3).iter().all(|&p| p == 0));
    }

    #[test]
    fn test_fill_rect_clipped() {
        let mut s = PixelSurface::new(6, 4).unwrap();
        s.fill_rect(-2, 2, 4, 10, rgb(9, 9, 9));
        assert_eq!(lit(&s), [(0, 2), (1, 2), (0, 3), (1, 3)].into_iter().collect());
        s.fill_rect(100, 100, 5, 5, WHITE);
        s.fill_rect(0, 0, 0, 5, WHITE);
        assert_eq!(lit(&s).len(), 4);
    }

    #[test]
    fn test_draw_rect_outline() {
        let mut s = PixelSurface::new(5, 5).unwrap();
        s.draw_rect(0, 0, 5, 5, WHITE);
        assert_eq!(lit(&s).len(), 16);
        assert_eq!(s.get_pixel(2, 2), 0);
    }

    #[test]
    fn test_primitives_fuzz_stay_in_bounds() {
        let mut rng = Rng::new(99);
        let mut s = PixelSurface::with_stride(20, 15, 24, 0).unwrap();
        for _ in 0..500 {
            let a = rng.range_i32(-100, 100);
            let b = rng.range_i32(-100, 100);
            let c = rng.range_i32(-100, 100);
            let d = rng.range_i32(-100, 100);
            s.draw_line(a, b, c, d, WHITE);
            s.draw_circle(a, b, c.abs() % 40, WHITE);
            s.fill_circle(c, d, a.abs() % 40, WHITE);
            s.fill_rect(a, b, c.unsigned_abs() % 50, d.unsigned_abs() % 50, WHITE);
        }
        // row padding is never written
        for y in 0..15 {
            let pad = &s.as_slice()[y * 24 + 20..y * 24 + 24];
            assert!(pad.iter().all(|&p| p == 0));
        }
    }
}
