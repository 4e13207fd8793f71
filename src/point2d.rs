#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

use std::ops::{Add, Sub, Mul, Div};

impl Point2D {
    pub const fn new(x: f32, y: f32) -> Self {
        Point2D { x, y }
    }

    /// Wraps both components into `[0, 1)`, tiling the plane.
    pub fn wrapped(self) -> Point2D {
        Point2D { x: self.x.rem_euclid(1.0), y: self.y.rem_euclid(1.0) }
    }
}

impl Add for Point2D {
    type Output = Point2D;
    fn add(self, other: Point2D) -> Point2D {
        Point2D { x: self.x + other.x, y: self.y + other.y }
    }
}

impl Sub for Point2D {
    type Output = Point2D;
    fn sub(self, other: Point2D) -> Point2D {
        Point2D { x: self.x - other.x, y: self.y - other.y }
    }
}

impl Mul<f32> for Point2D {
    type Output = Point2D;
    fn mul(self, scalar: f32) -> Point2D {
        Point2D { x: self.x * scalar, y: self.y * scalar }
    }
}

impl Div<f32> for Point2D {
    type Output = Point2D;
    fn div(self, scalar: f32) -> Point2D {
        Point2D { x: self.x / scalar, y: self.y / scalar }
    }
}

/// z component of the 3D cross product of two 2D vectors.
#[inline(always)]
pub fn cross2(a: Point2D, b: Point2D) -> f32 {
    a.x * b.y - a.y * b.x
}
