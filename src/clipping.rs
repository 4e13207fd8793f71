//! Frustum classification and homogeneous clipping of clip-space triangles.
//!
//! Clip planes are 4D normals pointing into the clip volume: a position is
//! inside a plane when `dot(position, plane) >= 0`. Clipping happens before
//! the perspective divide so that vertices with `w <= 0` are handled.

use bitflags::bitflags;

use crate::point4d::{Point4D, dot4};
use crate::vertex::Vertex;

bitflags! {
    /// Frustum planes a clip-space position lies outside of.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OutCode: u8 {
        const LEFT   = 1 << 0;
        const RIGHT  = 1 << 1;
        const BOTTOM = 1 << 2;
        const TOP    = 1 << 3;
        const FAR    = 1 << 4;
        const NEAR   = 1 << 5;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipMode {
    /// Only the near plane is clipped exactly. Geometry crossing the side
    /// planes is left to the rasterizer's clamped bounding box and the far
    /// plane is ignored.
    #[default]
    NearPlane,
    /// Sutherland-Hodgman against all six frustum planes.
    Frustum,
}

/// Clip plane defined by a 4D homogeneous normal vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPlane(pub Point4D);

impl ClipPlane {
    pub const LEFT: Self = Self(Point4D::new(1.0, 0.0, 0.0, 1.0)); // x >= -w
    pub const RIGHT: Self = Self(Point4D::new(-1.0, 0.0, 0.0, 1.0)); // x <= w
    pub const BOTTOM: Self = Self(Point4D::new(0.0, 1.0, 0.0, 1.0)); // y >= -w
    pub const TOP: Self = Self(Point4D::new(0.0, -1.0, 0.0, 1.0)); // y <= w
    pub const NEAR: Self = Self(Point4D::new(0.0, 0.0, 1.0, 1.0)); // z >= -w
    pub const FAR: Self = Self(Point4D::new(0.0, 0.0, -1.0, 1.0)); // z <= w

    pub const FRUSTUM: [Self; 6] = [Self::NEAR, Self::FAR, Self::LEFT, Self::RIGHT, Self::BOTTOM, Self::TOP];

    /// Signed distance, negative outside the clip volume.
    #[inline(always)]
    pub fn distance(&self, position: Point4D) -> f32 {
        dot4(position, self.0)
    }
}

/// Classifies a clip-space position against the frustum planes.
pub fn outcode(position: Point4D, mode: ClipMode) -> OutCode {
    let Point4D { x, y, z, w } = position;
    let mut code = OutCode::empty();
    code.set(OutCode::LEFT, x < -w);
    code.set(OutCode::RIGHT, x > w);
    code.set(OutCode::BOTTOM, y < -w);
    code.set(OutCode::TOP, y > w);
    code.set(OutCode::NEAR, z < -w);
    code.set(OutCode::FAR, mode == ClipMode::Frustum && z > w);
    code
}

/// Clips a convex polygon against one plane, keeping the inside part.
///
/// New vertices are interpolated along the crossing edge with
/// `t = d_a / (d_a - d_b)`, applied to position, color and uv alike. The
/// result is empty when the polygon lies entirely outside.
pub fn clip_polygon_to_plane(polygon: &[Vertex], plane: ClipPlane) -> Vec<Vertex> {
    let mut clipped = Vec::with_capacity(polygon.len() + 1);
    for (i, a) in polygon.iter().enumerate() {
        let b = &polygon[(i + 1) % polygon.len()];
        let da = plane.distance(a.position);
        let db = plane.distance(b.position);
        let a_inside = da >= 0.0;
        let b_inside = db >= 0.0;

        if a_inside {
            clipped.push(*a);
        }
        if a_inside != b_inside {
            let t = da / (da - db);
            clipped.push(Vertex::lerp(a, b, t));
        }
    }
    clipped
}

/// Splits a convex polygon into a triangle fan around its first vertex.
pub fn fan_triangulate(polygon: &[Vertex]) -> Vec<[Vertex; 3]> {
    if polygon.len() < 3 {
        return Vec::new();
    }
    (1..polygon.len() - 1)
        .map(|i| [polygon[0], polygon[i], polygon[i + 1]])
        .collect()
}

/// Outcome of classifying and clipping one triangle.
#[derive(Debug, Clone, PartialEq)]
pub enum Clipped {
    /// All three vertices share an outside plane.
    Rejected,
    /// Fully inside, passed through untouched.
    Inside([Vertex; 3]),
    /// Straddled a clip plane and was re-triangulated.
    Split(Vec<[Vertex; 3]>),
}

impl Clipped {
    pub fn into_triangles(self) -> Vec<[Vertex; 3]> {
        match self {
            Clipped::Rejected => Vec::new(),
            Clipped::Inside(tri) => vec![tri],
            Clipped::Split(tris) => tris,
        }
    }
}

/// Culls or clips a clip-space triangle.
pub fn clip_triangle(v0: &Vertex, v1: &Vertex, v2: &Vertex, mode: ClipMode) -> Clipped {
    let codes = [v0, v1, v2].map(|v| outcode(v.position, mode));
    if !(codes[0] & codes[1] & codes[2]).is_empty() {
        return Clipped::Rejected;
    }
    if (codes[0] | codes[1] | codes[2]).is_empty() {
        return Clipped::Inside([*v0, *v1, *v2]);
    }

    let mut polygon = vec![*v0, *v1, *v2];
    match mode {
        ClipMode::NearPlane => {
            polygon = clip_polygon_to_plane(&polygon, ClipPlane::NEAR);
        }
        ClipMode::Frustum => {
            for plane in ClipPlane::FRUSTUM {
                polygon = clip_polygon_to_plane(&polygon, plane);
                if polygon.is_empty() {
                    break;
                }
            }
        }
    }
    Clipped::Split(fan_triangulate(&polygon))
}
