use crate::point2d::{Point2D, cross2};
use crate::point3d::Point3D;
use crate::point4d::Point4D;

/// Perspective divide. The returned `w` is 1.
#[inline(always)]
pub fn divide_by_w(position: Point4D) -> Point4D {
    let inv_w = 1.0 / position.w;
    Point4D { x: position.x * inv_w, y: position.y * inv_w, z: position.z * inv_w, w: 1.0 }
}

/// Viewport transform from NDC to pixel coordinates. Screen y grows
/// downwards, so the axis is flipped.
#[inline(always)]
pub fn clip_to_screen_space(ndc: Point2D, screen_width: u32, screen_height: u32) -> Point2D {
    let half_width = screen_width as f32 / 2.0;
    let half_height = screen_height as f32 / 2.0;
    Point2D {
        x: (ndc.x + 1.0) * half_width,
        y: screen_height as f32 - (ndc.y + 1.0) * half_height,
    }
}

/// Multiply, divide and viewport-transform a single point. The returned
/// `z` is the NDC depth, comparable with the values of a depth buffer
/// rendered with the same matrix.
pub fn project_to_screen(clip: Point4D, screen_width: u32, screen_height: u32) -> Point3D {
    let ndc = divide_by_w(clip);
    let screen = clip_to_screen_space(Point2D::new(ndc.x, ndc.y), screen_width, screen_height);
    Point3D { x: screen.x, y: screen.y, z: ndc.z }
}

/// Two-point form of the line through `v1` and `v2`, evaluated at `(x, y)`.
/// Zero on the line; the sign tells the side.
#[inline(always)]
pub fn implicit_line(x: f64, y: f64, v1: Point2D, v2: Point2D) -> f64 {
    let (x1, y1) = (v1.x as f64, v1.y as f64);
    let (x2, y2) = (v2.x as f64, v2.y as f64);
    (y1 - y2) * x + (x2 - x1) * y + x1 * y2 - x2 * y1
}

/// Twice the signed area of the screen-space triangle. Negative for
/// counter-clockwise winding because screen y points down.
#[inline(always)]
pub fn signed_double_area(v0: Point2D, v1: Point2D, v2: Point2D) -> f32 {
    cross2(v1 - v0, v2 - v0)
}

/// Counter-clockwise as seen on the screen (y axis pointing down).
#[inline(always)]
pub fn are_vertices_ccw_in_screen_space(v0: Point2D, v1: Point2D, v2: Point2D) -> bool {
    signed_double_area(v0, v1, v2) < 0.0
}
