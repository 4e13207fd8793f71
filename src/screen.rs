use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::{GrayImage, Luma, RgbaImage};

use crate::error::Result;

/// 8-bit BGRA color image, row-major with the origin at the top-left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorBuffer {
    pub width: u32,
    pub height: u32,
    pub bgra: Vec<[u8; 4]>,
}

impl ColorBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, bgra: vec![[0; 4]; pixel_count(width, height)] }
    }
    pub fn set_pixel(&mut self, x: u32, y: u32, blue: u8, green: u8, red: u8, alpha: u8) {
        if let Some(i) = pixel_index(self.width, self.height, x, y) {
            self.bgra[i] = [blue, green, red, alpha];
        }
    }
    /// BGRA at `(x, y)`, `None` outside the buffer.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        pixel_index(self.width, self.height, x, y).map(|i| self.bgra[i])
    }
    pub fn clear(&mut self) {
        self.bgra.fill([0; 4]);
    }
    /// Raw interleaved BGRA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.bgra)
    }
    /// Number of pixels that have been written (non-zero alpha).
    pub fn covered_pixels(&self) -> usize {
        self.bgra.iter().filter(|p| p[3] != 0).count()
    }
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let [b, g, r, a] = self.get_pixel(x, y).unwrap_or_default();
            image::Rgba([r, g, b, a])
        })
    }
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_rgba_image().save(path)?;
        Ok(())
    }
    /// Uncompressed 24-bit BMP, alpha dropped.
    pub fn write_bmp<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let width = self.width;
        let height = self.height;
        let row_stride = (3 * width + 3) & !3;
        let pixel_array_size = row_stride * height;
        let file_size = 54 + pixel_array_size;
        let mut file = BufWriter::new(File::create(path)?);
        file.write_all(b"BM")?;
        file.write_all(&file_size.to_le_bytes())?;
        file.write_all(&[0u8; 4])?;
        file.write_all(&54u32.to_le_bytes())?;
        file.write_all(&40u32.to_le_bytes())?;
        file.write_all(&(width as i32).to_le_bytes())?;
        file.write_all(&(height as i32).to_le_bytes())?;
        file.write_all(&1u16.to_le_bytes())?;
        file.write_all(&24u16.to_le_bytes())?;
        file.write_all(&[0u8; 4])?;
        file.write_all(&pixel_array_size.to_le_bytes())?;
        file.write_all(&[0u8; 16])?;
        let padding = vec![0u8; (row_stride - width * 3) as usize];
        // BMP rows run bottom-up
        for y in (0..height).rev() {
            for x in 0..width {
                let [b, g, r, _] = self.get_pixel(x, y).unwrap_or_default();
                file.write_all(&[b, g, r])?;
            }
            file.write_all(&padding)?;
        }
        file.flush()?;
        Ok(())
    }
}

/// Per-pixel NDC depth; smaller is closer. Untouched pixels hold `f64::INFINITY`.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBuffer {
    pub width: u32,
    pub height: u32,
    pub depth: Vec<f64>,
}

impl DepthBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, depth: vec![f64::INFINITY; pixel_count(width, height)] }
    }
    /// Writes are ignored outside the buffer.
    pub fn set(&mut self, x: u32, y: u32, value: f64) {
        if let Some(i) = pixel_index(self.width, self.height, x, y) {
            self.depth[i] = value;
        }
    }
    /// Depth at `(x, y)`, `None` outside the buffer.
    pub fn get(&self, x: u32, y: u32) -> Option<f64> {
        pixel_index(self.width, self.height, x, y).map(|i| self.depth[i])
    }
    pub fn clear(&mut self) {
        self.depth.fill(f64::INFINITY);
    }
    /// Grayscale visualisation: near surfaces bright, far ones fading out,
    /// empty pixels black.
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([depth_to_u8(self.get(x, y).unwrap_or(f64::INFINITY))])
        })
    }
}

fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

/// Row-major offset of `(x, y)`, `None` outside a `width x height` buffer.
#[inline(always)]
fn pixel_index(width: u32, height: u32, x: u32, y: u32) -> Option<usize> {
    if x >= width || y >= height {
        return None;
    }
    Some(y as usize * width as usize + x as usize)
}

fn depth_to_u8(depth: f64) -> u8 {
    if !depth.is_finite() {
        return 0;
    }
    // NDC depth in [-1, 1] -> [0, 2]
    let y = 255.0 * (-(depth + 1.0) * 1.5).exp();
    y.round().clamp(0.0, 255.0) as u8
}

/// The pair of buffers a renderer draws into.
#[derive(Debug, Clone)]
pub struct ScreenSpace {
    pub width: u32,
    pub height: u32,
    pub color: ColorBuffer,
    pub depth: DepthBuffer,
}

impl ScreenSpace {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            color: ColorBuffer::new(width, height),
            depth: DepthBuffer::new(width, height),
        }
    }
    pub fn clear(&mut self) {
        self.color.clear();
        self.depth.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_resets_both_buffers() {
        let mut screen = ScreenSpace::new(4, 3);
        screen.color.set_pixel(1, 2, 10, 20, 30, 255);
        screen.depth.set(1, 2, 0.25);
        assert_eq!(screen.color.get_pixel(1, 2), Some([10, 20, 30, 255]));
        assert_eq!(screen.color.covered_pixels(), 1);
        screen.clear();
        assert_eq!(screen.color.get_pixel(1, 2), Some([0, 0, 0, 0]));
        assert_eq!(screen.depth.get(1, 2), Some(f64::INFINITY));
    }

    #[test]
    fn out_of_range_pixels_are_ignored() {
        let mut color = ColorBuffer::new(2, 2);
        color.set_pixel(2, 0, 1, 1, 1, 1);
        assert_eq!(color.get_pixel(2, 0), None);
        assert_eq!(color.covered_pixels(), 0);
    }

    #[test]
    fn out_of_range_depth_is_ignored() {
        let mut depth = DepthBuffer::new(3, 2);
        depth.set(3, 0, -0.5);
        depth.set(0, 2, -0.5);
        assert_eq!(depth.get(3, 0), None);
        assert_eq!(depth.get(0, 2), None);
        assert!(depth.depth.iter().all(|d| *d == f64::INFINITY));
        depth.set(2, 1, -0.5);
        assert_eq!(depth.get(2, 1), Some(-0.5));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn pixel_offsets_do_not_overflow_u32() {
        // 70000^2 exceeds u32::MAX
        let (w, h) = (70_000u32, 70_000u32);
        assert_eq!(pixel_count(w, h) as u64, 4_900_000_000);
        assert_eq!(pixel_index(w, h, w - 1, h - 1).map(|i| i as u64), Some(4_899_999_999));
        assert_eq!(pixel_index(w, h, w, 0), None);
    }

    #[test]
    fn bytes_and_image_use_expected_channel_order() {
        let mut color = ColorBuffer::new(1, 1);
        color.set_pixel(0, 0, 1, 2, 3, 255);
        assert_eq!(color.as_bytes(), &[1, 2, 3, 255]);
        assert_eq!(color.to_rgba_image().get_pixel(0, 0).0, [3, 2, 1, 255]);
    }

    #[test]
    fn depth_visualisation_is_monotonic() {
        assert_eq!(depth_to_u8(f64::INFINITY), 0);
        assert_eq!(depth_to_u8(-1.0), 255);
        assert!(depth_to_u8(-0.5) > depth_to_u8(0.5));
    }
}
