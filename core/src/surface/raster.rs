//! CPU rasterizer over an RGBA8 image.

use super::{DrawSurface, Paint, Rect, SurfaceError};
use crate::color::{Rgb, Rgba};
use image::RgbaImage;
use std::path::Path;

/// Software surface with canvas-like semantics: source-over blending in
/// straight alpha, content reset to the background on resize.
pub struct RasterSurface {
    image: RgbaImage,
    background: Rgba,
}

impl RasterSurface {
    /// Surface filled with opaque `background`.
    pub fn new(width: u32, height: u32, background: Rgb) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::InvalidSize { width, height });
        }
        let background = background.with_alpha(255);
        Ok(Self {
            image: RgbaImage::from_pixel(width, height, background.into()),
            background,
        })
    }

    /// White surface, the page color the effect is drawn over.
    pub fn white(width: u32, height: u32) -> Result<Self, SurfaceError> {
        Self::new(width, height, Rgb::WHITE)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.image.width() || y >= self.image.height() {
            return None;
        }
        let [r, g, b, a] = self.image.get_pixel(x, y).0;
        Some(Rgba::new(r, g, b, a))
    }

    /// Raw RGBA8 bytes, row-major.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Reset every pixel to the background.
    pub fn clear(&mut self) {
        let bg: image::Rgba<u8> = self.background.into();
        for px in self.image.pixels_mut() {
            *px = bg;
        }
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), SurfaceError> {
        self.image
            .save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    /// Pixel-space bounds clipped to the image, as half-open ranges.
    fn clip(&self, x0: f32, y0: f32, x1: f32, y1: f32) -> Option<(u32, u32, u32, u32)> {
        let (w, h) = (self.image.width() as f32, self.image.height() as f32);
        let x0 = x0.floor().clamp(0.0, w);
        let y0 = y0.floor().clamp(0.0, h);
        let x1 = x1.ceil().clamp(0.0, w);
        let y1 = y1.ceil().clamp(0.0, h);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    #[inline]
    fn blend(&mut self, x: u32, y: u32, src: Rgba) {
        if src.a == 0 {
            return;
        }
        let dst = self.image.get_pixel_mut(x, y);
        *dst = image::Rgba(source_over(src, dst.0));
    }
}

/// Straight-alpha source-over.
fn source_over(src: Rgba, dst: [u8; 4]) -> [u8; 4] {
    let sa = src.a as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return [0, 0, 0, 0];
    }
    let channel = |s: u8, d: u8| -> u8 {
        let c = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    [
        channel(src.r, dst[0]),
        channel(src.g, dst[1]),
        channel(src.b, dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ]
}

impl DrawSurface for RasterSurface {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("Ignoring resize to {}x{}", width, height);
            return;
        }
        self.image = RgbaImage::from_pixel(width, height, self.background.into());
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let Some((x0, y0, x1, y1)) =
            self.clip(rect.x, rect.y, rect.x + rect.width, rect.y + rect.height)
        else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend(x, y, color);
            }
        }
    }

    fn fill_arc(&mut self, center: [f32; 2], radius: f32, paint: &Paint) {
        if radius <= 0.0 || !radius.is_finite() {
            return;
        }
        let [cx, cy] = center;
        let Some((x0, y0, x1, y1)) = self.clip(cx - radius, cy - radius, cx + radius, cy + radius)
        else {
            return;
        };
        let r2 = radius * radius;
        for y in y0..y1 {
            let dy = y as f32 + 0.5 - cy;
            for x in x0..x1 {
                let dx = x as f32 + 0.5 - cx;
                let d2 = dx * dx + dy * dy;
                // sample at pixel centers
                if d2 > r2 {
                    continue;
                }
                let color = paint.color_at_distance(d2.sqrt());
                self.blend(x, y, color);
            }
        }
    }
}
