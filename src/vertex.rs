use crate::point2d::Point2D;
use crate::point3d::Point3D;
use crate::point4d::Point4D;

/// A mesh corner as it travels through the pipeline. Each stage produces new
/// copies; nothing mutates a vertex in place.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vertex {
    /// Homogeneous position. Model space before the MVP multiply, clip space after.
    pub position: Point4D,
    /// RGB, nominally in `[0, 1]`. Clamped only when written to the color buffer.
    pub color: Point3D,
    /// Texture coordinate. Values outside `[0, 1]` wrap.
    pub texcrd: Point2D,
}

impl Vertex {
    pub const fn new(position: Point4D, color: Point3D, texcrd: Point2D) -> Self {
        Vertex { position, color, texcrd }
    }

    /// Interpolates position, color and texture coordinate with the same `t`.
    pub fn lerp(a: &Vertex, b: &Vertex, t: f32) -> Vertex {
        Vertex {
            position: a.position + (b.position - a.position) * t,
            color: a.color + (b.color - a.color) * t,
            texcrd: a.texcrd + (b.texcrd - a.texcrd) * t,
        }
    }
}
