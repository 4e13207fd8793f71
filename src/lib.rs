//! # softraster
//!
//! A CPU triangle rasterizer that projects an indexed mesh onto a color and
//! depth image without a GPU.
//!
//! ## Pipeline
//!
//! 1. Every vertex position is multiplied by the model-view-projection matrix.
//! 2. Each triangle is classified against the view frustum in clip space;
//!    triangles behind a shared plane are rejected, triangles crossing the
//!    near plane are clipped in homogeneous coordinates and fan-triangulated.
//! 3. Setup divides by `w`, maps to pixels (y pointing down), optionally
//!    culls back faces, clamps the bounding box to the viewport and fits the
//!    planes used for mip level selection.
//! 4. The rasterizer walks the bounding box, computes barycentric weights at
//!    pixel centers, depth-tests against the affine NDC depth, applies
//!    perspective correction and shades with vertex colors or a trilinearly
//!    filtered texture.
//!
//! ## Quick Start
//!
//! ```rust
//! use softraster::{Mesh, Point2D, Point3D, Point4D, Renderer, Vertex, transform};
//!
//! let red = Point3D::new(1.0, 0.0, 0.0);
//! let corner = |x, y| Vertex::new(Point4D::point(x, y, 0.0), red, Point2D::default());
//! let mesh = Mesh::from_triangles(
//!     vec![corner(-1.0, -1.0), corner(1.0, -1.0), corner(1.0, 1.0), corner(-1.0, 1.0)],
//!     vec![[0, 1, 2], [0, 2, 3]],
//! )
//! .unwrap();
//!
//! let mut renderer = Renderer::new(100, 100).unwrap();
//! let (color, depth) = renderer.render(&mesh, &transform::Matrix4::identity()).unwrap();
//! assert_eq!(color.get_pixel(50, 50), Some([0, 0, 255, 255]));
//! assert_eq!(depth.get(50, 50), Some(0.0));
//! ```

pub mod camera;
pub mod clipping;
mod error;
pub mod geometry;
mod mesh;
pub mod obj;
mod point2d;
mod point3d;
mod point4d;
pub mod raster;
mod rectangle;
mod renderer;
mod screen;
mod texture;
pub mod transform;
mod triangle;
mod vertex;

pub use camera::OrbitCamera;
pub use clipping::ClipMode;
pub use error::{Error, Result};
pub use mesh::Mesh;
pub use point2d::Point2D;
pub use point3d::Point3D;
pub use point4d::Point4D;
pub use rectangle::Rect;
pub use renderer::{RenderStats, Renderer, RendererOptions, project_vertex};
pub use screen::{ColorBuffer, DepthBuffer, ScreenSpace};
pub use texture::{Texture, lod_from_derivatives};
pub use transform::Matrix4;
pub use triangle::{Plane, TriangleToRasterize};
pub use vertex::Vertex;
