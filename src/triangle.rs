//! Per-triangle setup: perspective divide, viewport transform, back-face
//! test, bounding box and the interpolation planes used for mipmapping.

use crate::geometry::{
    are_vertices_ccw_in_screen_space, clip_to_screen_space, divide_by_w, signed_double_area,
};
use crate::point2d::Point2D;
use crate::point3d::{Point3D, cross3, dot3, normalize};
use crate::point4d::Point4D;
use crate::rectangle::Rect;
use crate::vertex::Vertex;

/// Plane `a*x + b*y + c*z + d = 0` with a unit normal.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Plane {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
}

impl Plane {
    pub fn through(p1: Point3D, p2: Point3D, p3: Point3D) -> Plane {
        let normal = normalize(cross3(p2 - p1, p3 - p1));
        Plane { a: normal.x, b: normal.y, c: normal.z, d: -dot3(p1, normal) }
    }

    /// Solves the plane equation for `z` at `(x, y)`.
    #[inline(always)]
    pub fn z_at(&self, x: f32, y: f32, one_over_c: f32) -> f32 {
        -(self.a * x + self.b * y + self.d) * one_over_c
    }
}

/// `dz/dx` and `dz/dy` of a plane, together with `1/c` for evaluating it.
#[derive(Debug, Copy, Clone, PartialEq)]
struct PlaneGradient {
    plane: Plane,
    one_over_c: f32,
    ddx: f32,
    ddy: f32,
}

impl PlaneGradient {
    fn new(plane: Plane) -> Self {
        let one_over_c = 1.0 / plane.c;
        PlaneGradient { plane, one_over_c, ddx: -plane.a * one_over_c, ddy: -plane.b * one_over_c }
    }

    #[inline(always)]
    fn value(&self, x: f32, y: f32) -> f32 {
        self.plane.z_at(x, y, self.one_over_c)
    }
}

/// A screen-space triangle ready for rasterization.
///
/// Vertex positions hold pixel coordinates in `x`/`y` and NDC depth in `z`.
/// The original clip-space `1/w` of every corner is kept separately for
/// perspective correction.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleToRasterize {
    vertices: [Vertex; 3],
    one_over_w: [f64; 3],
    bounds: Rect,
    alpha: PlaneGradient,
    beta: PlaneGradient,
    gamma: PlaneGradient,
}

impl TriangleToRasterize {
    /// Projects a clip-space triangle onto a `screen_width x screen_height`
    /// buffer. Returns `None` for back-facing triangles (when culling is
    /// enabled), zero-area triangles and triangles without any pixel inside
    /// the buffer.
    pub fn setup(
        v0: &Vertex,
        v1: &Vertex,
        v2: &Vertex,
        screen_width: u32,
        screen_height: u32,
        cull_backfaces: bool,
    ) -> Option<Self> {
        let clip = [v0, v1, v2];
        let one_over_w = clip.map(|v| 1.0 / v.position.w as f64);
        let vertices = clip.map(|v| {
            let ndc = divide_by_w(v.position);
            let screen = clip_to_screen_space(Point2D::new(ndc.x, ndc.y), screen_width, screen_height);
            Vertex { position: Point4D::new(screen.x, screen.y, ndc.z, 1.0), ..*v }
        });
        let xy = vertices.map(|v| Point2D::new(v.position.x, v.position.y));

        let area = signed_double_area(xy[0], xy[1], xy[2]);
        if !area.is_finite() || area == 0.0 {
            return None;
        }
        if cull_backfaces && !are_vertices_ccw_in_screen_space(xy[0], xy[1], xy[2]) {
            return None;
        }
        let bounds = Rect::clipped_bounds(xy[0], xy[1], xy[2], screen_width, screen_height)?;

        let plane_through = |attribute: [f32; 3]| {
            let points = [0, 1, 2].map(|i| Point3D::new(xy[i].x, xy[i].y, attribute[i]));
            PlaneGradient::new(Plane::through(points[0], points[1], points[2]))
        };
        let q = one_over_w.map(|q| q as f32);
        let alpha = plane_through([0, 1, 2].map(|i| vertices[i].texcrd.x * q[i]));
        let beta = plane_through([0, 1, 2].map(|i| vertices[i].texcrd.y * q[i]));
        let gamma = plane_through(q);

        Some(TriangleToRasterize { vertices, one_over_w, bounds, alpha, beta, gamma })
    }

    pub fn vertices(&self) -> &[Vertex; 3] {
        &self.vertices
    }

    pub fn one_over_w(&self) -> [f64; 3] {
        self.one_over_w
    }

    /// Inclusive pixel bounds, already clamped to the target buffer.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn alpha_plane(&self) -> Plane {
        self.alpha.plane
    }

    pub fn beta_plane(&self) -> Plane {
        self.beta.plane
    }

    pub fn gamma_plane(&self) -> Plane {
        self.gamma.plane
    }

    /// Screen-space derivatives `(du/dx, du/dy, dv/dx, dv/dy)` of the
    /// perspective-correct texture coordinate at `(x, y)`.
    pub fn texcoord_derivatives(&self, x: f32, y: f32) -> (f32, f32, f32, f32) {
        let u_over_w = self.alpha.value(x, y);
        let v_over_w = self.beta.value(x, y);
        let one_over_w = self.gamma.value(x, y);
        let one_over_squared = 1.0 / (one_over_w * one_over_w);

        let dudx = one_over_squared * (self.alpha.ddx * one_over_w - u_over_w * self.gamma.ddx);
        let dudy = one_over_squared * (self.alpha.ddy * one_over_w - u_over_w * self.gamma.ddy);
        let dvdx = one_over_squared * (self.beta.ddx * one_over_w - v_over_w * self.gamma.ddx);
        let dvdy = one_over_squared * (self.beta.ddy * one_over_w - v_over_w * self.gamma.ddy);
        (dudx, dudy, dvdx, dvdy)
    }

    /// Texel-space derivatives at `(x, y)` for a texture whose level 0 is
    /// `cols x rows`.
    pub fn texel_derivatives(&self, x: f32, y: f32, cols: u32, rows: u32) -> (f32, f32, f32, f32) {
        let (dudx, dudy, dvdx, dvdy) = self.texcoord_derivatives(x, y);
        let (cols, rows) = (cols as f32, rows as f32);
        (dudx * cols, dudy * cols, dvdx * rows, dvdy * rows)
    }

    /// Unclamped mipmap level at `(x, y)`.
    pub fn texture_lod(&self, x: f32, y: f32, cols: u32, rows: u32) -> f32 {
        let (dudx, dudy, dvdx, dvdy) = self.texel_derivatives(x, y, cols, rows);
        crate::texture::lod_from_derivatives(dudx, dudy, dvdx, dvdy)
    }
}
