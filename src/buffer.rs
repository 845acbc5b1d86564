use std::path::Path;

use image::RgbaImage;

use crate::color::Rgb;
use crate::error::{Result, TextureError};

/// Square RGBA8 pixel buffer, row-major with a top-left origin
///
/// Every pixel written through this type is opaque; alpha stays at 255.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    resolution: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate an opaque black buffer of `resolution` x `resolution` pixels
    ///
    /// A zero resolution yields an empty buffer; requests reject it earlier.
    pub fn new(resolution: u32) -> Self {
        let len = resolution as usize * resolution as usize;
        let data = [0, 0, 0, 255].repeat(len);
        PixelBuffer { resolution, data }
    }

    /// Wrap existing RGBA bytes, checking the length matches the resolution
    pub fn from_raw(resolution: u32, data: Vec<u8>) -> Option<Self> {
        (data.len() == resolution as usize * resolution as usize * 4).then_some(PixelBuffer { resolution, data })
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn width(&self) -> u32 {
        self.resolution
    }

    pub fn height(&self) -> u32 {
        self.resolution
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// View the buffer as whole RGBA pixels
    pub fn as_pixels(&self) -> &[[u8; 4]] {
        bytemuck::cast_slice(&self.data)
    }

    pub fn as_pixels_mut(&mut self) -> &mut [[u8; 4]] {
        bytemuck::cast_slice_mut(&mut self.data)
    }

    /// Fill every pixel with one opaque color
    pub fn fill(&mut self, color: Rgb) {
        let rgba = color.to_rgba();
        self.as_pixels_mut().fill(rgba);
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.resolution as usize + x as usize
    }

    /// Get a pixel, or `None` outside the buffer
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x < self.resolution && y < self.resolution {
            Some(self.as_pixels()[self.index(x, y)])
        } else {
            None
        }
    }

    /// Get the RGB part of a pixel, or `None` outside the buffer
    pub fn rgb(&self, x: u32, y: u32) -> Option<Rgb> {
        self.pixel(x, y).map(|[r, g, b, _]| Rgb::new(r, g, b))
    }

    /// Write an opaque pixel; writes outside the buffer are ignored
    #[inline]
    pub fn put_pixel(&mut self, x: u32, y: u32, color: Rgb) {
        if x < self.resolution && y < self.resolution {
            let index = self.index(x, y);
            self.as_pixels_mut()[index] = color.to_rgba();
        }
    }

    /// Shade every pixel from its normalized UV coordinate
    ///
    /// `u = x / resolution` and `v = y / resolution`, so both lie in [0, 1).
    pub fn shade_uv<F>(&mut self, mut shade: F)
    where
        F: FnMut(f64, f64) -> Rgb,
    {
        let res = self.resolution;
        let scale = res as f64;
        let pixels = self.as_pixels_mut();
        for y in 0..res {
            let v = y as f64 / scale;
            let row = y as usize * res as usize;
            for x in 0..res {
                let u = x as f64 / scale;
                pixels[row + x as usize] = shade(u, v).to_rgba();
            }
        }
    }

    /// Mean channel sum over one row
    pub fn row_brightness(&self, y: u32) -> f64 {
        if y >= self.resolution {
            return 0.0;
        }
        let start = self.index(0, y);
        let row = &self.as_pixels()[start..start + self.resolution as usize];
        let total: u64 = row.iter().map(|p| p[0] as u64 + p[1] as u64 + p[2] as u64).sum();
        total as f64 / self.resolution as f64
    }

    /// Convert into an `image` buffer without copying
    pub fn into_image(self) -> Result<RgbaImage> {
        let resolution = self.resolution;
        RgbaImage::from_raw(resolution, resolution, self.data)
            .ok_or(TextureError::InvalidResolution(resolution as i64))
    }

    /// Save the buffer as a PNG file
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        image::save_buffer(
            path.as_ref(),
            &self.data,
            self.resolution,
            self.resolution,
            image::ColorType::Rgba8,
        )?;
        Ok(())
    }
}
