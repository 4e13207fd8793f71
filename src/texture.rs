use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use log::info;

use crate::error::{Error, Result};
use crate::point2d::Point2D;
use crate::point3d::Point3D;

/// An RGBA image with its full mipmap chain.
///
/// `mipmaps[0]` is the source image, every further level halves both
/// dimensions (never below 1) until a 1x1 level is reached. Texture
/// coordinates have their origin at the top-left texel and wrap in both
/// directions.
#[derive(Debug, Clone)]
pub struct Texture {
    mipmaps: Vec<RgbaImage>,
}

impl Texture {
    pub fn new(image: RgbaImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::EmptyTexture);
        }
        let levels = (width.ilog2().max(height.ilog2()) + 1) as usize;
        let mut mipmaps = Vec::with_capacity(levels);
        mipmaps.push(image);
        for lvl in 1..levels {
            let prev = &mipmaps[lvl - 1];
            let (nw, nh) = ((width >> lvl).max(1), (height >> lvl).max(1));
            let down = imageops::resize(prev, nw, nh, FilterType::Triangle);
            mipmaps.push(down);
        }
        Ok(Self { mipmaps })
    }

    pub fn from_dynamic(image: DynamicImage) -> Result<Self> {
        Self::new(image.to_rgba8())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let img = image::open(path.as_ref())?;
        let texture = Self::from_dynamic(img)?;
        info!(
            "loaded texture {} ({}x{}, {} mip levels)",
            path.as_ref().display(),
            texture.cols(),
            texture.rows(),
            texture.num_levels()
        );
        Ok(texture)
    }

    /// Width of level 0.
    pub fn cols(&self) -> u32 {
        self.mipmaps[0].width()
    }

    /// Height of level 0.
    pub fn rows(&self) -> u32 {
        self.mipmaps[0].height()
    }

    pub fn num_levels(&self) -> usize {
        self.mipmaps.len()
    }

    pub fn level(&self, level: usize) -> &RgbaImage {
        &self.mipmaps[level]
    }

    pub fn levels(&self) -> &[RgbaImage] {
        &self.mipmaps
    }

    /// RGBA texel at integer coordinates, wrapped into the level's extent.
    pub fn texel(&self, level: usize, x: i64, y: i64) -> [u8; 4] {
        let img = &self.mipmaps[level];
        let xi = x.rem_euclid(img.width() as i64) as u32;
        let yi = y.rem_euclid(img.height() as i64) as u32;
        img.get_pixel(xi, yi).0
    }

    /// Bilinear lookup on a single level. Returns RGB in `[0, 1]`.
    pub fn sample_bilinear(&self, level: usize, texcrd: Point2D) -> Point3D {
        let img = &self.mipmaps[level];
        let uv = texcrd.wrapped();
        // Texel centers sit at (i + 0.5) / size.
        let x = uv.x * img.width() as f32 - 0.5;
        let y = uv.y * img.height() as f32 - 0.5;
        let x0 = x.floor();
        let y0 = y.floor();
        let alpha = x - x0;
        let beta = y - y0;
        let (xi, yi) = (x0 as i64, y0 as i64);

        let a = (1.0 - alpha) * (1.0 - beta);
        let b = alpha * (1.0 - beta);
        let c = (1.0 - alpha) * beta;
        let d = alpha * beta;

        let color = texel_rgb(self.texel(level, xi, yi)) * a
            + texel_rgb(self.texel(level, xi + 1, yi)) * b
            + texel_rgb(self.texel(level, xi, yi + 1)) * c
            + texel_rgb(self.texel(level, xi + 1, yi + 1)) * d;
        color / 255.0
    }

    /// Blends the two mip levels around `lambda` (clamped to the chain).
    pub fn sample_trilinear(&self, texcrd: Point2D, lambda: f32) -> Point3D {
        let max_level = (self.mipmaps.len() - 1) as f32;
        let lambda = if lambda.is_nan() { 0.0 } else { lambda.clamp(0.0, max_level) };
        let floor = lambda.floor();
        let frac = lambda - floor;
        let lower = floor as usize;
        let upper = (lower + 1).min(self.mipmaps.len() - 1);

        let color_floor = self.sample_bilinear(lower, texcrd);
        if frac == 0.0 || upper == lower {
            return color_floor;
        }
        let color_ceil = self.sample_bilinear(upper, texcrd);
        color_floor * (1.0 - frac) + color_ceil * frac
    }

    /// Trilinear lookup with the level chosen from screen-space derivatives
    /// of the texture coordinate, already scaled to level-0 texels.
    pub fn sample(&self, texcrd: Point2D, dudx: f32, dudy: f32, dvdx: f32, dvdy: f32) -> Point3D {
        self.sample_trilinear(texcrd, lod_from_derivatives(dudx, dudy, dvdx, dvdy))
    }
}

/// `log2` of the larger texel footprint along the screen x and y axes.
pub fn lod_from_derivatives(dudx: f32, dudy: f32, dvdx: f32, dvdy: f32) -> f32 {
    let px = (dudx * dudx + dvdx * dvdx).sqrt();
    let py = (dudy * dudy + dvdy * dvdy).sqrt();
    px.max(py).log2()
}

fn texel_rgb(texel: [u8; 4]) -> Point3D {
    Point3D::new(texel[0] as f32, texel[1] as f32, texel[2] as f32)
}
