use log::{debug, trace};
use rayon::prelude::*;

use crate::clipping::{ClipMode, Clipped, clip_triangle};
use crate::error::{Error, Result};
use crate::geometry::project_to_screen;
use crate::mesh::Mesh;
use crate::point3d::Point3D;
use crate::point4d::Point4D;
use crate::raster::raster_triangle;
use crate::screen::{ColorBuffer, DepthBuffer, ScreenSpace};
use crate::texture::Texture;
use crate::transform::Matrix4;
use crate::triangle::TriangleToRasterize;
use crate::vertex::Vertex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RendererOptions {
    /// Discard triangles that are not counter-clockwise on screen.
    pub backface_culling: bool,
    pub clipping: ClipMode,
}

/// Per-call counters, reset at the start of every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Triangles in the mesh.
    pub triangles: usize,
    /// Triangles entirely outside a frustum plane.
    pub frustum_rejected: usize,
    /// Triangles that straddled a clip plane.
    pub clipped: usize,
    /// Triangles handed to setup, including those produced by clipping.
    pub setup: usize,
    /// Back-facing, zero-area or fully off-screen after projection.
    pub culled: usize,
    pub rasterized: usize,
    pub pixels_written: usize,
}

/// Software renderer with a fixed viewport.
///
/// Owns its color and depth buffers; every render call clears them, draws
/// the whole mesh and hands back copies.
pub struct Renderer {
    width: u32,
    height: u32,
    options: RendererOptions,
    screen: ScreenSpace,
    stats: RenderStats,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::with_options(width, height, RendererOptions::default())
    }

    pub fn with_options(width: u32, height: u32, options: RendererOptions) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidViewport { width, height });
        }
        Ok(Self {
            width,
            height,
            options,
            screen: ScreenSpace::new(width, height),
            stats: RenderStats::default(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn options(&self) -> RendererOptions {
        self.options
    }

    pub fn set_backface_culling(&mut self, enabled: bool) {
        self.options.backface_culling = enabled;
    }

    pub fn set_clip_mode(&mut self, mode: ClipMode) {
        self.options.clipping = mode;
    }

    /// Counters of the most recent render call.
    pub fn last_stats(&self) -> RenderStats {
        self.stats
    }

    /// Renders the mesh with interpolated vertex colors.
    pub fn render(&mut self, mesh: &Mesh, mvp: &Matrix4) -> Result<(ColorBuffer, DepthBuffer)> {
        self.render_internal(mesh, mvp, None)
    }

    /// Renders the mesh with every pixel's color sampled from `texture`.
    pub fn render_textured(
        &mut self,
        mesh: &Mesh,
        mvp: &Matrix4,
        texture: &Texture,
    ) -> Result<(ColorBuffer, DepthBuffer)> {
        self.render_internal(mesh, mvp, Some(texture))
    }

    fn render_internal(
        &mut self,
        mesh: &Mesh,
        mvp: &Matrix4,
        texture: Option<&Texture>,
    ) -> Result<(ColorBuffer, DepthBuffer)> {
        if !mvp.is_finite() {
            return Err(Error::NonFiniteMatrix);
        }
        self.screen.clear();
        self.stats = RenderStats { triangles: mesh.num_triangles(), ..RenderStats::default() };

        let clip_positions: Vec<Point4D> = mesh
            .vertices()
            .par_iter()
            .map(|v| mvp * v.position)
            .collect();

        let vertices = mesh.vertices();
        let triangles = mesh
            .position_indices()
            .iter()
            .zip(mesh.color_indices())
            .zip(mesh.texcoord_indices());
        for (i, ((tvi, tci), tti)) in triangles.enumerate() {
            let corner = |k: usize| Vertex {
                position: clip_positions[tvi[k]],
                color: vertices[tci[k]].color,
                texcrd: vertices[tti[k]].texcrd,
            };
            let (v0, v1, v2) = (corner(0), corner(1), corner(2));

            let clipped = match clip_triangle(&v0, &v1, &v2, self.options.clipping) {
                Clipped::Rejected => {
                    trace!("triangle {i} outside the view frustum");
                    self.stats.frustum_rejected += 1;
                    continue;
                }
                Clipped::Inside(tri) => vec![tri],
                Clipped::Split(tris) => {
                    self.stats.clipped += 1;
                    tris
                }
            };

            for [a, b, c] in clipped {
                self.stats.setup += 1;
                let Some(tri) = TriangleToRasterize::setup(
                    &a,
                    &b,
                    &c,
                    self.width,
                    self.height,
                    self.options.backface_culling,
                ) else {
                    trace!("triangle {i} culled after projection");
                    self.stats.culled += 1;
                    continue;
                };
                self.stats.rasterized += 1;
                self.stats.pixels_written += raster_triangle(&tri, &mut self.screen, texture);
            }
        }

        debug!(
            "rendered {} triangles into {}x{}: {:?}",
            mesh.num_triangles(),
            self.width,
            self.height,
            self.stats
        );
        Ok((self.screen.color.clone(), self.screen.depth.clone()))
    }
}

/// Where a single point lands on a `width x height` viewport under `mvp`.
///
/// Returns pixel `x`, `y` and the NDC depth. No visibility test is implied;
/// compare the depth against a depth buffer rendered with the same matrix.
pub fn project_vertex(position: Point4D, mvp: &Matrix4, width: u32, height: u32) -> Point3D {
    project_to_screen(mvp * position, width, height)
}
