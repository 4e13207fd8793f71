//! Homogeneous positions.

use std::ops::{Add, Sub, Mul, Div};

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Point4D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Point4D {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Point4D { x, y, z, w }
    }

    /// A point in 3D space, `w = 1`.
    pub const fn point(x: f32, y: f32, z: f32) -> Self {
        Point4D { x, y, z, w: 1.0 }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }
}

impl Add for Point4D {
    type Output = Point4D;
    fn add(self, other: Point4D) -> Point4D {
        Point4D { x: self.x + other.x, y: self.y + other.y, z: self.z + other.z, w: self.w + other.w }
    }
}

impl Sub for Point4D {
    type Output = Point4D;
    fn sub(self, other: Point4D) -> Point4D {
        Point4D { x: self.x - other.x, y: self.y - other.y, z: self.z - other.z, w: self.w - other.w }
    }
}

impl Mul<f32> for Point4D {
    type Output = Point4D;
    fn mul(self, scalar: f32) -> Point4D {
        Point4D { x: self.x * scalar, y: self.y * scalar, z: self.z * scalar, w: self.w * scalar }
    }
}

impl Div<f32> for Point4D {
    type Output = Point4D;
    fn div(self, scalar: f32) -> Point4D {
        Point4D { x: self.x / scalar, y: self.y / scalar, z: self.z / scalar, w: self.w / scalar }
    }
}

#[inline(always)]
pub fn dot4(a: Point4D, b: Point4D) -> f32 {
    a.x * b.x + a.y * b.y + a.z * b.z + a.w * b.w
}
