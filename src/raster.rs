//! Scan conversion of set-up triangles into a [`ScreenSpace`].

use crate::geometry::implicit_line;
use crate::point2d::Point2D;
use crate::point3d::Point3D;
use crate::screen::ScreenSpace;
use crate::texture::Texture;
use crate::triangle::TriangleToRasterize;

/// Affine (screen-space) barycentric weights of the point `(x, y)`.
///
/// Each weight is the implicit line equation of the opposite edge evaluated at
/// the point, normalised by its value at the vertex itself. The weights sum to
/// one and are all non-negative exactly when the point is inside the triangle
/// or on one of its edges.
#[inline(always)]
pub fn affine_weights(tri: &TriangleToRasterize, x: f64, y: f64) -> [f64; 3] {
    let p = tri.vertices().map(|v| Point2D::new(v.position.x, v.position.y));
    let alpha = implicit_line(x, y, p[1], p[2]) / implicit_line(p[0].x as f64, p[0].y as f64, p[1], p[2]);
    let beta = implicit_line(x, y, p[2], p[0]) / implicit_line(p[1].x as f64, p[1].y as f64, p[2], p[0]);
    let gamma = implicit_line(x, y, p[0], p[1]) / implicit_line(p[2].x as f64, p[2].y as f64, p[0], p[1]);
    [alpha, beta, gamma]
}

/// Re-weights affine barycentrics by each vertex's `1/w` so attributes vary
/// linearly in 3D rather than on the screen. A no-op when every `w` is 1.
#[inline(always)]
pub fn perspective_correct_weights(weights: [f64; 3], one_over_w: [f64; 3]) -> [f64; 3] {
    let d = 1.0 / (weights[0] * one_over_w[0] + weights[1] * one_over_w[1] + weights[2] * one_over_w[2]);
    [
        weights[0] * d * one_over_w[0],
        weights[1] * d * one_over_w[1],
        weights[2] * d * one_over_w[2],
    ]
}

#[inline(always)]
fn to_byte(channel: f32) -> u8 {
    (255.0 * channel.clamp(0.0, 1.0)).round() as u8
}

/// Rasterizes one triangle, returning the number of pixels written.
///
/// Pixels are sampled at their centers. The depth test is a strict "less"
/// against the affinely interpolated NDC depth. With a texture the color
/// comes from trilinear mipmapped sampling, otherwise from the interpolated
/// vertex colors.
pub fn raster_triangle(tri: &TriangleToRasterize, screen: &mut ScreenSpace, texture: Option<&Texture>) -> usize {
    let bounds = tri.bounds();
    // Setup clamps to the buffer it was built for; guard against a mismatched one.
    if bounds.max_x >= screen.width || bounds.max_y >= screen.height {
        return 0;
    }
    let [v0, v1, v2] = tri.vertices();
    let one_over_w = tri.one_over_w();
    let mut written = 0;

    for yi in bounds.min_y..=bounds.max_y {
        for xi in bounds.min_x..=bounds.max_x {
            let x = xi as f64 + 0.5;
            let y = yi as f64 + 0.5;

            let [alpha, beta, gamma] = affine_weights(tri, x, y);
            if !(alpha >= 0.0 && beta >= 0.0 && gamma >= 0.0) {
                continue;
            }

            let z_affine = alpha * v0.position.z as f64 + beta * v1.position.z as f64 + gamma * v2.position.z as f64;
            let Some(stored) = screen.depth.get(xi, yi) else { continue };
            if !(z_affine < stored) {
                continue;
            }

            let [a, b, c] = perspective_correct_weights([alpha, beta, gamma], one_over_w);
            let (a, b, c) = (a as f32, b as f32, c as f32);
            let color_persp: Point3D = v0.color * a + v1.color * b + v2.color * c;
            let texcrd_persp: Point2D = v0.texcrd * a + v1.texcrd * b + v2.texcrd * c;

            let pixel_color = match texture {
                Some(texture) => {
                    let (dudx, dudy, dvdx, dvdy) =
                        tri.texel_derivatives(x as f32, y as f32, texture.cols(), texture.rows());
                    texture.sample(texcrd_persp, dudx, dudy, dvdx, dvdy)
                }
                None => color_persp,
            };

            screen.color.set_pixel(xi, yi, to_byte(pixel_color.z), to_byte(pixel_color.y), to_byte(pixel_color.x), 255);
            screen.depth.set(xi, yi, z_affine);
            written += 1;
        }
    }
    written
}
