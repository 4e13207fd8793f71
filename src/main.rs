//! Offline renderer: draws an OBJ mesh (or a built-in cube) to image files.
//!
//! Usage:
//!   softraster --mesh model.obj --texture albedo.png -o color.png --depth-out depth.png
//!   softraster --yaw 30 --pitch 20             # built-in vertex-colored cube

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use softraster::{
    ClipMode, Mesh, OrbitCamera, Point2D, Point3D, Point4D, Renderer, RendererOptions, Texture,
    Vertex, obj,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ClipArg {
    Near,
    Frustum,
}

impl From<ClipArg> for ClipMode {
    fn from(arg: ClipArg) -> Self {
        match arg {
            ClipArg::Near => ClipMode::NearPlane,
            ClipArg::Frustum => ClipMode::Frustum,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "softraster")]
#[command(author, version, about = "Software triangle rasterizer", long_about = None)]
struct Args {
    /// Wavefront OBJ mesh (default: a unit cube with vertex colors)
    #[arg(short, long)]
    mesh: Option<PathBuf>,

    /// Diffuse texture; enables textured shading
    #[arg(short, long)]
    texture: Option<PathBuf>,

    /// Color output (format from extension; .bmp uses the built-in writer)
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,

    /// Depth visualisation output
    #[arg(long)]
    depth_out: Option<PathBuf>,

    #[arg(long, default_value = "800")]
    width: u32,

    #[arg(long, default_value = "600")]
    height: u32,

    /// Model rotation about y, degrees
    #[arg(long, default_value = "30")]
    yaw: f32,

    /// Model rotation about x, degrees
    #[arg(long, default_value = "20")]
    pitch: f32,

    /// Camera distance from the origin
    #[arg(long, default_value = "4")]
    distance: f32,

    /// Vertical field of view, degrees
    #[arg(long, default_value = "45")]
    fov: f32,

    /// Discard triangles facing away from the camera
    #[arg(long)]
    cull: bool,

    #[arg(long, value_enum, default_value = "near")]
    clip: ClipArg,

    /// Worker threads for the vertex stage (default: logical cores)
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let cores = args.threads.unwrap_or_else(num_cpus::get);
    rayon::ThreadPoolBuilder::new()
        .num_threads(cores)
        .build_global()
        .context("failed to build thread pool")?;
    info!("using {cores} worker threads");

    let mesh = match &args.mesh {
        Some(path) => obj::load_mesh(path).with_context(|| format!("loading {}", path.display()))?,
        None => demo_cube()?,
    };
    let texture = args
        .texture
        .as_ref()
        .map(|path| Texture::load(path).with_context(|| format!("loading {}", path.display())))
        .transpose()?;

    let camera = OrbitCamera {
        fov_y_degrees: args.fov,
        yaw: args.yaw.to_radians(),
        pitch: args.pitch.to_radians(),
        distance: args.distance,
        ..OrbitCamera::default()
    };
    let mvp = camera.model_view_projection(args.width as f32 / args.height as f32);

    let options = RendererOptions { backface_culling: args.cull, clipping: args.clip.into() };
    let mut renderer = Renderer::with_options(args.width, args.height, options)?;

    let frame_start = Instant::now();
    let (color, depth) = match &texture {
        Some(texture) => renderer.render_textured(&mesh, &mvp, texture)?,
        None => renderer.render(&mesh, &mvp)?,
    };
    let frame_time = frame_start.elapsed();
    let stats = renderer.last_stats();
    info!(
        "frame time {frame_time:.2?}: {} of {} triangles rasterized, {} pixels written",
        stats.rasterized, stats.triangles, stats.pixels_written
    );

    let is_bmp = args.output.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("bmp"));
    if is_bmp {
        color.write_bmp(&args.output)?;
    } else {
        color.save(&args.output)?;
    }
    info!("saved {}", args.output.display());

    if let Some(path) = &args.depth_out {
        depth
            .to_gray_image()
            .save(path)
            .with_context(|| format!("saving {}", path.display()))?;
        info!("saved {}", path.display());
    }
    Ok(())
}

/// Unit cube, one color per face, wound counter-clockwise seen from outside.
fn demo_cube() -> Result<Mesh> {
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        ([1.0, 0.0, 0.0], [[1.0, -1.0, 1.0], [1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0]]),
        ([0.0, 1.0, 1.0], [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]]),
        ([0.0, 1.0, 0.0], [[-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0]]),
        ([1.0, 0.0, 1.0], [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]]),
        ([0.0, 0.0, 1.0], [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]]),
        ([1.0, 1.0, 0.0], [[1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0]]),
    ];
    let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

    let mut vertices = Vec::with_capacity(24);
    let mut triangles = Vec::with_capacity(12);
    for (color, corners) in faces {
        let base = vertices.len();
        for (p, uv) in corners.iter().zip(uvs) {
            vertices.push(Vertex::new(
                Point4D::point(p[0], p[1], p[2]),
                Point3D::new(color[0], color[1], color[2]),
                Point2D::new(uv[0], uv[1]),
            ));
        }
        triangles.push([base, base + 1, base + 2]);
        triangles.push([base, base + 2, base + 3]);
    }
    Ok(Mesh::from_triangles(vertices, triangles)?)
}
