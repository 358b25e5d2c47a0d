//! 3D math for the software pipeline
//!
//! Value-type vectors, a row-major 4x4 matrix acting on column vectors, and
//! the clip -> NDC -> screen mapping that feeds the rasterizer. Compose
//! transforms as `proj * view * model`.

use crate::display::PixelSurface;
use std::ops::{Add, Mul, Neg, Sub};

// ============================================================================
// Vec3
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction; the zero vector stays zero
    #[inline]
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self::new(self.x / len, self.y / len, self.z / len)
        } else {
            Self::zero()
        }
    }

    #[inline]
    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Approximate equality check for floating point comparison
    #[inline]
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self.x - other.x).abs() < epsilon
            && (self.y - other.y).abs() < epsilon
            && (self.z - other.z).abs() < epsilon
    }
}

impl Add for Vec3 {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    #[inline]
    fn mul(self, scalar: f32) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl Mul<Vec3> for f32 {
    type Output = Vec3;
    #[inline]
    fn mul(self, v: Vec3) -> Vec3 {
        v * self
    }
}

/// Linear interpolation between two points
///
/// Note: `t` is not clamped to [0, 1], allowing extrapolation.
#[inline]
pub fn lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

// ============================================================================
// Vec4
// ============================================================================

/// Homogeneous 4-component vector
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Position (w = 1)
    #[inline]
    pub const fn from_point(p: Vec3) -> Self {
        Self::new(p.x, p.y, p.z, 1.0)
    }

    /// Direction (w = 0)
    #[inline]
    pub const fn from_direction(d: Vec3) -> Self {
        Self::new(d.x, d.y, d.z, 0.0)
    }

    #[inline]
    pub const fn xyz(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector; the zero vector stays zero
    #[inline]
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            *self * (1.0 / len)
        } else {
            Self::default()
        }
    }

    /// Clip space to NDC. With `w == 0` the xyz part is returned unchanged.
    #[inline]
    pub fn perspective_divide(&self) -> Vec3 {
        if self.w != 0.0 {
            Vec3::new(self.x / self.w, self.y / self.w, self.z / self.w)
        } else {
            self.xyz()
        }
    }
}

impl Add for Vec4 {
    type Output = Self;
    #[inline]
    fn add(self, o: Self) -> Self {
        Self::new(self.x + o.x, self.y + o.y, self.z + o.z, self.w + o.w)
    }
}

impl Sub for Vec4 {
    type Output = Self;
    #[inline]
    fn sub(self, o: Self) -> Self {
        Self::new(self.x - o.x, self.y - o.y, self.z - o.z, self.w - o.w)
    }
}

impl Mul<f32> for Vec4 {
    type Output = Self;
    #[inline]
    fn mul(self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s, self.w * s)
    }
}

// ============================================================================
// Mat4
// ============================================================================

/// 4x4 matrix, row-major storage, multiplies column vectors (`M * v`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub m: [f32; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    #[inline]
    pub const fn from_rows(m: [f32; 16]) -> Self {
        Self { m }
    }

    #[rustfmt::skip]
    pub const fn identity() -> Self {
        Self::from_rows([
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    #[rustfmt::skip]
    pub const fn translation(tx: f32, ty: f32, tz: f32) -> Self {
        Self::from_rows([
            1.0, 0.0, 0.0, tx,
            0.0, 1.0, 0.0, ty,
            0.0, 0.0, 1.0, tz,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    #[rustfmt::skip]
    pub const fn scale(sx: f32, sy: f32, sz: f32) -> Self {
        Self::from_rows([
            sx,  0.0, 0.0, 0.0,
            0.0, sy,  0.0, 0.0,
            0.0, 0.0, sz,  0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    #[rustfmt::skip]
    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            1.0, 0.0, 0.0, 0.0,
            0.0, c,   -s,  0.0,
            0.0, s,   c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    #[rustfmt::skip]
    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            c,   0.0, s,   0.0,
            0.0, 1.0, 0.0, 0.0,
            -s,  0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    #[rustfmt::skip]
    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            c,   -s,  0.0, 0.0,
            s,   c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// OpenGL-style right-handed perspective projection
    ///
    /// `fovy` in radians. Maps z = -near to NDC -1 and z = -far to +1.
    #[rustfmt::skip]
    pub fn perspective(fovy: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fovy * 0.5).tan();
        let nf = 1.0 / (near - far);
        Self::from_rows([
            f / aspect, 0.0, 0.0,               0.0,
            0.0,        f,   0.0,               0.0,
            0.0,        0.0, (far + near) * nf, 2.0 * far * near * nf,
            0.0,        0.0, -1.0,              0.0,
        ])
    }

    /// View matrix looking from `eye` at `target`
    ///
    /// The camera basis is Gram-Schmidt orthogonalized from `up`.
    #[rustfmt::skip]
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let z = (eye - target).normalize();
        let x = up.cross(&z).normalize();
        let y = z.cross(&x);
        Self::from_rows([
            x.x, x.y, x.z, -x.dot(&eye),
            y.x, y.y, y.z, -y.dot(&eye),
            z.x, z.y, z.z, -z.dot(&eye),
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.m[row * 4 + col]
    }

    pub fn transpose(&self) -> Self {
        let mut out = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                out[col * 4 + row] = self.m[row * 4 + col];
            }
        }
        Self::from_rows(out)
    }

    /// Transform a position and perspective-divide the result
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        (*self * Vec4::from_point(p)).perspective_divide()
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    /// Row-by-column product; `a * b` applies `b` first
    fn mul(self, b: Mat4) -> Mat4 {
        let mut out = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                out[row * 4 + col] = (0..4).map(|k| self.m[row * 4 + k] * b.m[k * 4 + col]).sum();
            }
        }
        Mat4::from_rows(out)
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    #[inline]
    fn mul(self, v: Vec4) -> Vec4 {
        let row = |r: usize| {
            self.m[r * 4] * v.x + self.m[r * 4 + 1] * v.y + self.m[r * 4 + 2] * v.z + self.m[r * 4 + 3] * v.w
        };
        Vec4::new(row(0), row(1), row(2), row(3))
    }
}

// ============================================================================
// Viewport mapping
// ============================================================================

/// NDC [-1, 1]² to pixel coordinates, Y pointing down. z passes through.
#[inline]
pub fn viewport_transform(ndc: Vec3, width: u32, height: u32) -> Vec3 {
    Vec3::new(
        (ndc.x + 1.0) * 0.5 * width as f32,
        (1.0 - ndc.y) * 0.5 * height as f32,
        ndc.z,
    )
}

/// Pixel coordinates back to NDC
#[inline]
pub fn inverse_viewport_transform(screen: Vec3, width: u32, height: u32) -> Vec3 {
    Vec3::new(
        screen.x / (0.5 * width as f32) - 1.0,
        1.0 - screen.y / (0.5 * height as f32),
        screen.z,
    )
}

/// Full pipeline for one point: clip, divide, map to pixels
///
/// `None` when the point is at or behind the camera plane (`w <= 0`).
pub fn project_to_screen(mvp: &Mat4, p: Vec3, width: u32, height: u32) -> Option<Vec3> {
    let clip = *mvp * Vec4::from_point(p);
    if clip.w <= 0.0 {
        return None;
    }
    Some(viewport_transform(clip.perspective_divide(), width, height))
}

// ============================================================================
// Mesh
// ============================================================================

/// Vertices plus the edges drawn in wireframe
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub edges: Vec<[usize; 2]>,
}

impl Mesh {
    /// Axis-aligned cube of edge length `size`, centered at the origin
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let vertices = vec![
            Vec3::new(-h, -h, -h), // 0: back-bottom-left
            Vec3::new(h, -h, -h),  // 1: back-bottom-right
            Vec3::new(h, h, -h),   // 2: back-top-right
            Vec3::new(-h, h, -h),  // 3: back-top-left
            Vec3::new(-h, -h, h),  // 4: front-bottom-left
            Vec3::new(h, -h, h),   // 5: front-bottom-right
            Vec3::new(h, h, h),    // 6: front-top-right
            Vec3::new(-h, h, h),   // 7: front-top-left
        ];
        let edges = vec![
            [0, 1], [1, 2], [2, 3], [3, 0], // back
            [4, 5], [5, 6], [6, 7], [7, 4], // front
            [0, 4], [1, 5], [2, 6], [3, 7], // sides
        ];
        Self { vertices, edges }
    }
}

/// Project `mesh` through `mvp` and draw its edges
///
/// Edges touching a vertex behind the camera are dropped; everything else
/// is left to the line clipper.
pub fn draw_wireframe(surface: &mut PixelSurface, mesh: &Mesh, mvp: &Mat4, color: u32) {
    let (w, h) = (surface.width(), surface.height());
    let projected: Vec<Option<(i32, i32)>> = mesh
        .vertices
        .iter()
        .map(|&v| project_to_screen(mvp, v, w, h).map(|s| (s.x.round() as i32, s.y.round() as i32)))
        .collect();

    for &[a, b] in &mesh.edges {
        if let (Some(Some((x0, y0))), Some(Some((x1, y1)))) = (projected.get(a), projected.get(b)) {
            surface.draw_line(*x0, *y0, *x1, *y1, color);
        }
    }
}
