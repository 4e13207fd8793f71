//! 4x4 matrices and the usual OpenGL-style transform builders.
//!
//! Matrices are row-major and act on column vectors: `m * p` transforms `p`,
//! and `a * b` applies `b` first.

use std::ops::Mul;

use crate::point4d::{Point4D, dot4};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Matrix4 {
    pub rows: [[f32; 4]; 4],
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix4 {
    pub const fn new(rows: [[f32; 4]; 4]) -> Self {
        Matrix4 { rows }
    }

    pub const fn identity() -> Self {
        Matrix4 {
            rows: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    pub fn row(&self, i: usize) -> Point4D {
        let r = self.rows[i];
        Point4D::new(r[0], r[1], r[2], r[3])
    }

    pub fn column(&self, j: usize) -> Point4D {
        Point4D::new(self.rows[0][j], self.rows[1][j], self.rows[2][j], self.rows[3][j])
    }

    pub fn transpose(&self) -> Matrix4 {
        let mut rows = [[0.0; 4]; 4];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = self.rows[j][i];
            }
        }
        Matrix4 { rows }
    }

    pub fn is_finite(&self) -> bool {
        self.rows.iter().flatten().all(|v| v.is_finite())
    }
}

impl Mul<Point4D> for Matrix4 {
    type Output = Point4D;
    fn mul(self, p: Point4D) -> Point4D {
        Point4D {
            x: dot4(self.row(0), p),
            y: dot4(self.row(1), p),
            z: dot4(self.row(2), p),
            w: dot4(self.row(3), p),
        }
    }
}

impl Mul<Point4D> for &Matrix4 {
    type Output = Point4D;
    fn mul(self, p: Point4D) -> Point4D {
        *self * p
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;
    fn mul(self, other: Matrix4) -> Matrix4 {
        let mut rows = [[0.0; 4]; 4];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = dot4(self.row(i), other.column(j));
            }
        }
        Matrix4 { rows }
    }
}

/// Counter-clockwise rotation about the x axis (looking down the axis towards the origin).
pub fn rotation_x(angle: f32) -> Matrix4 {
    let (s, c) = angle.sin_cos();
    Matrix4::new([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, c, -s, 0.0],
        [0.0, s, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

pub fn rotation_y(angle: f32) -> Matrix4 {
    let (s, c) = angle.sin_cos();
    Matrix4::new([
        [c, 0.0, s, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [-s, 0.0, c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

pub fn rotation_z(angle: f32) -> Matrix4 {
    let (s, c) = angle.sin_cos();
    Matrix4::new([
        [c, -s, 0.0, 0.0],
        [s, c, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

pub fn scaling(sx: f32, sy: f32, sz: f32) -> Matrix4 {
    Matrix4::new([
        [sx, 0.0, 0.0, 0.0],
        [0.0, sy, 0.0, 0.0],
        [0.0, 0.0, sz, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

pub fn translation(tx: f32, ty: f32, tz: f32) -> Matrix4 {
    Matrix4::new([
        [1.0, 0.0, 0.0, tx],
        [0.0, 1.0, 0.0, ty],
        [0.0, 0.0, 1.0, tz],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// glOrtho: maps `[l, r] x [b, t] x [-n, -f]` in a right-handed view space
/// looking down -z onto the `[-1, 1]` cube.
pub fn orthographic(l: f32, r: f32, b: f32, t: f32, n: f32, f: f32) -> Matrix4 {
    Matrix4::new([
        [2.0 / (r - l), 0.0, 0.0, -(r + l) / (r - l)],
        [0.0, 2.0 / (t - b), 0.0, -(t + b) / (t - b)],
        [0.0, 0.0, -2.0 / (f - n), -(f + n) / (f - n)],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// glFrustum. `l, r, b, t` are measured on the near plane.
pub fn perspective(l: f32, r: f32, b: f32, t: f32, n: f32, f: f32) -> Matrix4 {
    Matrix4::new([
        [2.0 * n / (r - l), 0.0, (r + l) / (r - l), 0.0],
        [0.0, 2.0 * n / (t - b), (t + b) / (t - b), 0.0],
        [0.0, 0.0, -(f + n) / (f - n), -2.0 * f * n / (f - n)],
        [0.0, 0.0, -1.0, 0.0],
    ])
}

/// gluPerspective, vertical field of view in degrees.
pub fn perspective_fov(fov_y_degrees: f32, aspect: f32, n: f32, f: f32) -> Matrix4 {
    let t = n * (fov_y_degrees.to_radians() * 0.5).tan();
    let r = t * aspect;
    perspective(-r, r, -t, t, n, f)
}
