//! Interactive viewer. Drag with the left mouse button to orbit, W/S to
//! zoom, mouse wheel for the field of view, C toggles back-face culling.
//!
//! Usage:
//!   viewer <mesh.obj> [texture.png]

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use raylib::prelude::*;

use softraster::{OrbitCamera, Renderer, Texture, obj};

#[derive(Parser, Debug)]
#[command(name = "viewer")]
#[command(author, version, about = "Interactive software rasterizer viewer", long_about = None)]
struct Args {
    /// Wavefront OBJ mesh
    mesh: PathBuf,

    /// Diffuse texture; enables textured shading
    texture: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mesh = obj::load_mesh(&args.mesh).with_context(|| format!("loading {}", args.mesh.display()))?;
    let texture = args
        .texture
        .as_ref()
        .map(|path| Texture::load(path).with_context(|| format!("loading {}", path.display())))
        .transpose()?;

    // Define Render resolution
    let width = 960;
    let height = 720;
    let mut renderer = Renderer::new(width, height)?;
    let mut cam = OrbitCamera::default();

    // Create raylib handle
    let (mut r1, thread) = raylib::init()
        .size(width as i32, height as i32)
        .title("softraster")
        .resizable()
        .build();
    r1.set_target_fps(60);
    let image = Image::gen_image_color(width as i32, height as i32, Color::BLACK);
    let mut screen_texture = r1
        .load_texture_from_image(&thread, &image)
        .map_err(|e| anyhow::anyhow!("raylib texture creation failed: {e}"))?;

    let mut rgba = vec![0u8; (width * height * 4) as usize];
    while !r1.window_should_close() {
        cam.camera_update(&r1);
        if r1.is_key_pressed(KeyboardKey::KEY_C) {
            let culling = !renderer.options().backface_culling;
            renderer.set_backface_culling(culling);
            info!("back-face culling {}", if culling { "on" } else { "off" });
        }

        let frame_start = Instant::now();
        let mvp = cam.model_view_projection(width as f32 / height as f32);
        let (color, _) = match &texture {
            Some(texture) => renderer.render_textured(&mesh, &mvp, texture)?,
            None => renderer.render(&mesh, &mvp)?,
        };
        let frame_time = frame_start.elapsed();

        // raylib wants RGBA
        for (dst, src) in rgba.chunks_exact_mut(4).zip(&color.bgra) {
            dst.copy_from_slice(&[src[2], src[1], src[0], 255]);
        }
        let _ = screen_texture.update_texture(&rgba);

        let window_width = r1.get_screen_width();
        let window_height = r1.get_screen_height();
        let stats = renderer.last_stats();

        let mut d = r1.begin_drawing(&thread);
        d.clear_background(Color::BLACK);
        d.draw_texture_pro(
            &screen_texture,
            Rectangle { x: 0.0, y: 0.0, width: width as f32, height: height as f32 },
            Rectangle { x: 0.0, y: 0.0, width: window_width as f32, height: window_height as f32 },
            Vector2 { x: 0.0, y: 0.0 },
            0.0,
            Color::WHITE,
        );
        d.draw_text(
            &format!(
                "Frame time: {:.2?}\nTriangles: {}/{}\nPixels: {}",
                frame_time, stats.rasterized, stats.triangles, stats.pixels_written
            ),
            10,
            10,
            20,
            Color::LIME,
        );
    }
    Ok(())
}
