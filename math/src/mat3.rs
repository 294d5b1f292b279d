use std::ops::Mul;

use serde_derive::{Deserialize, Serialize};

use crate::{Error, Mat4, Result};

/// 3x3 column-major matrix. Used for 2D transforms and normal matrices.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct Mat3(pub [f32; 9]);

impl Mat3 {
    #[rustfmt::skip]
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0,
        0.0, 1.0, 0.0,
        0.0, 0.0, 1.0,
    ]);

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    #[rustfmt::skip]
    pub fn translation(tx: f32, ty: f32) -> Self {
        Self([
            1.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            tx,  ty,  1.0,
        ])
    }

    #[rustfmt::skip]
    pub fn rotation(theta: f32) -> Self {
        let (s, c) = theta.sin_cos();
        Self([
            c,   s,   0.0,
            -s,  c,   0.0,
            0.0, 0.0, 1.0,
        ])
    }

    #[rustfmt::skip]
    pub fn scaling(sx: f32, sy: f32) -> Self {
        Self([
            sx,  0.0, 0.0,
            0.0, sy,  0.0,
            0.0, 0.0, 1.0,
        ])
    }

    /// Pixel space, (0, 0) top left, to clip space.
    #[rustfmt::skip]
    pub fn projection(width: f32, height: f32) -> Self {
        Self([
            2.0 / width, 0.0,           0.0,
            0.0,         -2.0 / height, 0.0,
            -1.0,        1.0,           1.0,
        ])
    }

    /// Upper left 3x3 block.
    #[rustfmt::skip]
    pub fn from_mat4(m: &Mat4) -> Self {
        let m = &m.0;
        Self([
            m[0], m[1], m[2],
            m[4], m[5], m[6],
            m[8], m[9], m[10],
        ])
    }

    #[must_use]
    pub fn multiply(&self, rhs: &Mat3) -> Mat3 {
        let a = &self.0;
        let b = &rhs.0;
        let mut out = [0.0; 9];
        for c in 0..3 {
            for r in 0..3 {
                out[c * 3 + r] = a[r] * b[c * 3] + a[3 + r] * b[c * 3 + 1] + a[6 + r] * b[c * 3 + 2];
            }
        }
        Mat3(out)
    }

    #[must_use]
    pub fn translate(&self, tx: f32, ty: f32) -> Mat3 {
        self.multiply(&Mat3::translation(tx, ty))
    }

    #[must_use]
    pub fn rotate(&self, theta: f32) -> Mat3 {
        self.multiply(&Mat3::rotation(theta))
    }

    #[must_use]
    pub fn scale(&self, sx: f32, sy: f32) -> Mat3 {
        self.multiply(&Mat3::scaling(sx, sy))
    }

    #[must_use]
    pub fn transpose(&self) -> Mat3 {
        let m = &self.0;
        Mat3([m[0], m[3], m[6], m[1], m[4], m[7], m[2], m[5], m[8]])
    }

    pub fn determinant(&self) -> f32 {
        let m = &self.0;
        m[0] * (m[4] * m[8] - m[7] * m[5]) - m[3] * (m[1] * m[8] - m[7] * m[2])
            + m[6] * (m[1] * m[5] - m[4] * m[2])
    }

    pub fn inverse(&self) -> Result<Mat3> {
        let det = self.determinant();
        // A tiny determinant is fine as long as its reciprocal is finite.
        if det == 0.0 || !(1.0 / det).is_finite() {
            return Err(Error::Singular);
        }

        let a = &self.0;
        let inv = 1.0 / det;
        Ok(Mat3([
            (a[4] * a[8] - a[5] * a[7]) * inv,
            (a[2] * a[7] - a[1] * a[8]) * inv,
            (a[1] * a[5] - a[2] * a[4]) * inv,
            (a[5] * a[6] - a[3] * a[8]) * inv,
            (a[0] * a[8] - a[2] * a[6]) * inv,
            (a[2] * a[3] - a[0] * a[5]) * inv,
            (a[3] * a[7] - a[4] * a[6]) * inv,
            (a[1] * a[6] - a[0] * a[7]) * inv,
            (a[0] * a[4] - a[1] * a[3]) * inv,
        ]))
    }

    pub fn transform_point(&self, (x, y): (f32, f32)) -> (f32, f32) {
        let m = &self.0;
        (m[0] * x + m[3] * y + m[6], m[1] * x + m[4] * y + m[7])
    }

    pub fn approx_eq(&self, other: &Mat3, eps: f32) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat3 {
    type Output = Mat3;

    fn mul(self, rhs: Mat3) -> Mat3 {
        self.multiply(&rhs)
    }
}
