use std::ops::Mul;

use serde_derive::{Deserialize, Serialize};

use crate::{Error, Mat3, Result, Vec3};

/// 4x4 matrix stored column-major, the layout `uniformMatrix4fv` expects
/// with `transpose = false`. Element (row r, column c) is at `c * 4 + r`.
///
/// Combinators such as `translate` post-multiply, so in
/// `m.translate(..).scale(..)` the scale is applied to a vertex first.
///
/// see https://webglfundamentals.org/webgl/resources/m4.js
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct Mat4(pub [f32; 16]);

impl Mat4 {
    #[rustfmt::skip]
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ]);

    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.0[col * 4 + row]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    #[rustfmt::skip]
    pub fn translation(tx: f32, ty: f32, tz: f32) -> Self {
        Self([
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            tx,  ty,  tz,  1.0,
        ])
    }

    #[rustfmt::skip]
    pub fn x_rotation(theta: f32) -> Self {
        let (s, c) = theta.sin_cos();
        Self([
            1.0, 0.0, 0.0, 0.0,
            0.0, c,   s,   0.0,
            0.0, -s,  c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    #[rustfmt::skip]
    pub fn y_rotation(theta: f32) -> Self {
        let (s, c) = theta.sin_cos();
        Self([
            c,   0.0, -s,  0.0,
            0.0, 1.0, 0.0, 0.0,
            s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    #[rustfmt::skip]
    pub fn z_rotation(theta: f32) -> Self {
        let (s, c) = theta.sin_cos();
        Self([
            c,   s,   0.0, 0.0,
            -s,  c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Rotation of `theta` radians about `axis`, counter-clockwise when
    /// looking down the axis towards the origin. The axis is normalized
    /// first; a zero axis gives the identity.
    #[rustfmt::skip]
    pub fn axis_rotation(axis: Vec3, theta: f32) -> Self {
        let Vec3 { x, y, z } = axis.normalize();
        if x == 0.0 && y == 0.0 && z == 0.0 {
            return Self::IDENTITY;
        }

        let (s, c) = theta.sin_cos();
        let oc = 1.0 - c;
        Self([
            x * x * oc + c,     x * y * oc + z * s, x * z * oc - y * s, 0.0,
            x * y * oc - z * s, y * y * oc + c,     y * z * oc + x * s, 0.0,
            x * z * oc + y * s, y * z * oc - x * s, z * z * oc + c,     0.0,
            0.0,                0.0,                0.0,                1.0,
        ])
    }

    #[rustfmt::skip]
    pub fn scaling(sx: f32, sy: f32, sz: f32) -> Self {
        Self([
            sx,  0.0, 0.0, 0.0,
            0.0, sy,  0.0, 0.0,
            0.0, 0.0, sz,  0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    #[rustfmt::skip]
    pub fn orthographic(l: f32, r: f32, b: f32, t: f32, n: f32, f: f32) -> Self {
        Self([
            2.0 / (r - l),     0.0,               0.0,               0.0,
            0.0,               2.0 / (t - b),     0.0,               0.0,
            0.0,               0.0,               2.0 / (n - f),     0.0,
            (l + r) / (l - r), (b + t) / (b - t), (n + f) / (n - f), 1.0,
        ])
    }

    /// Perspective projection looking down -Z. Clip space z runs from -1 at
    /// `near` to 1 at `far`.
    #[rustfmt::skip]
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Result<Self> {
        if aspect == 0.0 || !aspect.is_finite() {
            return Err(Error::Degenerate("aspect ratio must be non-zero"));
        }
        if near == far {
            return Err(Error::Degenerate("near and far planes coincide"));
        }

        let half = (fov_y * 0.5).tan();
        if half == 0.0 || !half.is_finite() {
            return Err(Error::Degenerate("field of view out of range"));
        }

        let f = 1.0 / half;
        let range_inv = 1.0 / (near - far);
        Ok(Self([
            f / aspect, 0.0, 0.0,                          0.0,
            0.0,        f,   0.0,                          0.0,
            0.0,        0.0, (near + far) * range_inv,     -1.0,
            0.0,        0.0, near * far * range_inv * 2.0, 0.0,
        ]))
    }

    #[rustfmt::skip]
    pub fn frustum(l: f32, r: f32, b: f32, t: f32, n: f32, f: f32) -> Result<Self> {
        let dx = r - l;
        let dy = t - b;
        let dz = f - n;
        if dx == 0.0 || dy == 0.0 || dz == 0.0 {
            return Err(Error::Degenerate("frustum has zero extent"));
        }

        Ok(Self([
            2.0 * n / dx,  0.0,           0.0,                0.0,
            0.0,           2.0 * n / dy,  0.0,                0.0,
            (l + r) / dx,  (t + b) / dy,  -(f + n) / dz,      -1.0,
            0.0,           0.0,           -2.0 * n * f / dz,  0.0,
        ]))
    }

    /// Maps pixel coordinates, (0, 0) top left, onto clip space.
    #[rustfmt::skip]
    pub fn projection(width: f32, height: f32, depth: f32) -> Self {
        Self([
            2.0 / width, 0.0,           0.0,         0.0,
            0.0,         -2.0 / height, 0.0,         0.0,
            0.0,         0.0,           2.0 / depth, 0.0,
            -1.0,        1.0,           0.0,         1.0,
        ])
    }

    /// World matrix of an object at `eye` facing `target`. Its -Z axis
    /// points at the target. The inverse of this is the view matrix.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Result<Self> {
        let (x, y, z) = Self::basis(eye, target, up)?;

        #[rustfmt::skip]
        let m = Self([
            x.x,   x.y,   x.z,   0.0,
            y.x,   y.y,   y.z,   0.0,
            z.x,   z.y,   z.z,   0.0,
            eye.x, eye.y, eye.z, 1.0,
        ]);
        Ok(m)
    }

    /// View matrix for a camera at `eye` looking at `target`.
    pub fn view(eye: Vec3, target: Vec3, up: Vec3) -> Result<Self> {
        let (x, y, z) = Self::basis(eye, target, up)?;

        #[rustfmt::skip]
        let m = Self([
            x.x,         y.x,         z.x,         0.0,
            x.y,         y.y,         z.y,         0.0,
            x.z,         y.z,         z.z,         0.0,
            -x.dot(eye), -y.dot(eye), -z.dot(eye), 1.0,
        ]);
        Ok(m)
    }

    fn basis(eye: Vec3, target: Vec3, up: Vec3) -> Result<(Vec3, Vec3, Vec3)> {
        let z = (eye - target).normalize();
        if z == Vec3::ZERO {
            return Err(Error::Degenerate("eye and target coincide"));
        }

        let x = up.cross(z).normalize();
        if x == Vec3::ZERO {
            return Err(Error::Degenerate("up is parallel to view direction"));
        }

        let y = z.cross(x).normalize();
        Ok((x, y, z))
    }

    #[must_use]
    pub fn multiply(&self, rhs: &Mat4) -> Mat4 {
        let a = &self.0;
        let b = &rhs.0;
        let mut out = [0.0; 16];
        for c in 0..4 {
            for r in 0..4 {
                out[c * 4 + r] = a[r] * b[c * 4]
                    + a[4 + r] * b[c * 4 + 1]
                    + a[8 + r] * b[c * 4 + 2]
                    + a[12 + r] * b[c * 4 + 3];
            }
        }
        Mat4(out)
    }

    #[must_use]
    pub fn translate(&self, tx: f32, ty: f32, tz: f32) -> Mat4 {
        let mut m = *self;
        m.0[12] += m.0[0] * tx + m.0[4] * ty + m.0[8] * tz;
        m.0[13] += m.0[1] * tx + m.0[5] * ty + m.0[9] * tz;
        m.0[14] += m.0[2] * tx + m.0[6] * ty + m.0[10] * tz;
        m.0[15] += m.0[3] * tx + m.0[7] * ty + m.0[11] * tz;
        m
    }

    #[must_use]
    pub fn x_rotate(&self, theta: f32) -> Mat4 {
        self.multiply(&Mat4::x_rotation(theta))
    }

    #[must_use]
    pub fn y_rotate(&self, theta: f32) -> Mat4 {
        self.multiply(&Mat4::y_rotation(theta))
    }

    #[must_use]
    pub fn z_rotate(&self, theta: f32) -> Mat4 {
        let mut m = *self;
        let (s, c) = theta.sin_cos();
        for i in 0..4 {
            let a = self.0[i];
            let b = self.0[4 + i];
            m.0[i] = c * a + s * b;
            m.0[4 + i] = c * b - s * a;
        }
        m
    }

    #[must_use]
    pub fn axis_rotate(&self, axis: Vec3, theta: f32) -> Mat4 {
        self.multiply(&Mat4::axis_rotation(axis, theta))
    }

    #[must_use]
    pub fn scale(&self, sx: f32, sy: f32, sz: f32) -> Mat4 {
        let mut m = *self;
        for i in 0..4 {
            m.0[i] *= sx;
            m.0[4 + i] *= sy;
            m.0[8 + i] *= sz;
        }
        m
    }

    #[must_use]
    pub fn transpose(&self) -> Mat4 {
        let mut out = [0.0; 16];
        for c in 0..4 {
            for r in 0..4 {
                out[r * 4 + c] = self.0[c * 4 + r];
            }
        }
        Mat4(out)
    }

    // 2x2 minors of the top two and bottom two rows, shared by the
    // determinant and the inverse.
    fn minors(&self) -> ([f32; 6], [f32; 6]) {
        let a = |r: usize, c: usize| self.0[c * 4 + r];
        let s = [
            a(0, 0) * a(1, 1) - a(1, 0) * a(0, 1),
            a(0, 0) * a(1, 2) - a(1, 0) * a(0, 2),
            a(0, 0) * a(1, 3) - a(1, 0) * a(0, 3),
            a(0, 1) * a(1, 2) - a(1, 1) * a(0, 2),
            a(0, 1) * a(1, 3) - a(1, 1) * a(0, 3),
            a(0, 2) * a(1, 3) - a(1, 2) * a(0, 3),
        ];
        let c = [
            a(2, 0) * a(3, 1) - a(3, 0) * a(2, 1),
            a(2, 0) * a(3, 2) - a(3, 0) * a(2, 2),
            a(2, 0) * a(3, 3) - a(3, 0) * a(2, 3),
            a(2, 1) * a(3, 2) - a(3, 1) * a(2, 2),
            a(2, 1) * a(3, 3) - a(3, 1) * a(2, 3),
            a(2, 2) * a(3, 3) - a(3, 2) * a(2, 3),
        ];
        (s, c)
    }

    pub fn determinant(&self) -> f32 {
        let (s, c) = self.minors();
        s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0]
    }

    pub fn inverse(&self) -> Result<Mat4> {
        let (s, c) = self.minors();
        let det = s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1]
            + s[5] * c[0];
        // A tiny determinant is fine as long as its reciprocal is finite.
        if det == 0.0 || !(1.0 / det).is_finite() {
            return Err(Error::Singular);
        }

        let a = |r: usize, c: usize| self.0[c * 4 + r];
        let inv = 1.0 / det;

        // Rows of the inverse.
        let b = [
            [
                a(1, 1) * c[5] - a(1, 2) * c[4] + a(1, 3) * c[3],
                -a(0, 1) * c[5] + a(0, 2) * c[4] - a(0, 3) * c[3],
                a(3, 1) * s[5] - a(3, 2) * s[4] + a(3, 3) * s[3],
                -a(2, 1) * s[5] + a(2, 2) * s[4] - a(2, 3) * s[3],
            ],
            [
                -a(1, 0) * c[5] + a(1, 2) * c[2] - a(1, 3) * c[1],
                a(0, 0) * c[5] - a(0, 2) * c[2] + a(0, 3) * c[1],
                -a(3, 0) * s[5] + a(3, 2) * s[2] - a(3, 3) * s[1],
                a(2, 0) * s[5] - a(2, 2) * s[2] + a(2, 3) * s[1],
            ],
            [
                a(1, 0) * c[4] - a(1, 1) * c[2] + a(1, 3) * c[0],
                -a(0, 0) * c[4] + a(0, 1) * c[2] - a(0, 3) * c[0],
                a(3, 0) * s[4] - a(3, 1) * s[2] + a(3, 3) * s[0],
                -a(2, 0) * s[4] + a(2, 1) * s[2] - a(2, 3) * s[0],
            ],
            [
                -a(1, 0) * c[3] + a(1, 1) * c[1] - a(1, 2) * c[0],
                a(0, 0) * c[3] - a(0, 1) * c[1] + a(0, 2) * c[0],
                -a(3, 0) * s[3] + a(3, 1) * s[1] - a(3, 2) * s[0],
                a(2, 0) * s[3] - a(2, 1) * s[1] + a(2, 2) * s[0],
            ],
        ];

        let mut out = [0.0; 16];
        for (r, row) in b.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                out[c * 4 + r] = value * inv;
            }
        }
        Ok(Mat4(out))
    }

    /// Transform a position, dividing through by w.
    pub fn transform_point(&self, v: Vec3) -> Vec3 {
        let m = &self.0;
        let x = m[0] * v.x + m[4] * v.y + m[8] * v.z + m[12];
        let y = m[1] * v.x + m[5] * v.y + m[9] * v.z + m[13];
        let z = m[2] * v.x + m[6] * v.y + m[10] * v.z + m[14];
        let w = m[3] * v.x + m[7] * v.y + m[11] * v.z + m[15];

        if w != 0.0 && w != 1.0 {
            Vec3::new(x / w, y / w, z / w)
        } else {
            Vec3::new(x, y, z)
        }
    }

    /// Transform a direction, ignoring translation.
    pub fn transform_direction(&self, v: Vec3) -> Vec3 {
        let m = &self.0;
        Vec3::new(
            m[0] * v.x + m[4] * v.y + m[8] * v.z,
            m[1] * v.x + m[5] * v.y + m[9] * v.z,
            m[2] * v.x + m[6] * v.y + m[10] * v.z,
        )
    }

    /// Transform a surface normal by the inverse transpose.
    pub fn transform_normal(&self, n: Vec3) -> Result<Vec3> {
        let mi = self.inverse()?.0;
        Ok(Vec3::new(
            mi[0] * n.x + mi[1] * n.y + mi[2] * n.z,
            mi[4] * n.x + mi[5] * n.y + mi[6] * n.z,
            mi[8] * n.x + mi[9] * n.y + mi[10] * n.z,
        ))
    }

    pub fn normal_matrix(&self) -> Result<Mat3> {
        Ok(Mat3::from_mat4(self).inverse()?.transpose())
    }

    pub fn approx_eq(&self, other: &Mat4, eps: f32) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        self.multiply(&rhs)
    }
}

impl Mul<Vec3> for Mat4 {
    type Output = Vec3;

    fn mul(self, rhs: Vec3) -> Vec3 {
        self.transform_point(rhs)
    }
}

impl From<Mat4> for [f32; 16] {
    fn from(m: Mat4) -> Self {
        m.0
    }
}
