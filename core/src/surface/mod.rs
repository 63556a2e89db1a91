//! Drawing surface abstraction.
//!
//! The field only ever needs four things from its host surface:
//! - rectangle fill with an alpha-carrying color
//! - radial gradient paint
//! - filled circular arcs
//! - resize
//!
//! Implementations:
//! - [`RecordingSurface`]: records draw calls, paints nothing
//! - [`RasterSurface`]: CPU rasterizer over an RGBA8 image
//! - [`GpuSurface`](crate::gpu::GpuSurface): wgpu render target

mod raster;
mod recording;

pub use raster::RasterSurface;
pub use recording::{DrawCommand, RecordingSurface};

use crate::color::Rgba;

/// Errors raised by surface backends outside the draw path.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("Surface dimensions must be non-zero, got {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle covering a whole surface of the given size.
    pub fn covering(size: (u32, u32)) -> Self {
        Self::new(0.0, 0.0, size.0 as f32, size.1 as f32)
    }
}

/// Color stop at `offset` in `[0, 1]` along a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

/// Radial gradient between two concentric circles.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: [f32; 2],
    pub inner_radius: f32,
    pub outer_radius: f32,
    /// Sorted by offset.
    pub stops: Vec<ColorStop>,
}

impl RadialGradient {
    pub fn new(center: [f32; 2], inner_radius: f32, outer_radius: f32) -> Self {
        Self {
            center,
            inner_radius,
            outer_radius,
            stops: Vec::with_capacity(2),
        }
    }

    /// Add a stop, keeping stops ordered. Offsets are clamped into `[0, 1]`;
    /// stops with equal offsets keep insertion order.
    pub fn add_color_stop(&mut self, offset: f32, color: Rgba) {
        let offset = offset.clamp(0.0, 1.0);
        let at = self.stops.partition_point(|s| s.offset <= offset);
        self.stops.insert(at, ColorStop { offset, color });
    }

    pub fn with_stop(mut self, offset: f32, color: Rgba) -> Self {
        self.add_color_stop(offset, color);
        self
    }

    /// Gradient parameter `t` for a point at distance `distance` from the center.
    pub fn offset_at(&self, distance: f32) -> f32 {
        let span = self.outer_radius - self.inner_radius;
        if span <= f32::EPSILON {
            return if distance < self.outer_radius { 0.0 } else { 1.0 };
        }
        ((distance - self.inner_radius) / span).clamp(0.0, 1.0)
    }

    /// Color at gradient parameter `t`, interpolated linearly between the
    /// bracketing stops. Before the first / after the last stop the end color
    /// is held.
    pub fn color_at(&self, t: f32) -> Rgba {
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Rgba::TRANSPARENT,
        };
        if t <= first.offset {
            return first.color;
        }
        if t >= last.offset {
            return last.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t >= a.offset && t <= b.offset {
                let span = b.offset - a.offset;
                let f = if span <= f32::EPSILON { 1.0 } else { (t - a.offset) / span };
                return lerp_rgba(a.color, b.color, f);
            }
        }
        last.color
    }
}

/// Fill style for arcs.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Radial(RadialGradient),
}

impl Paint {
    /// Color at a point `distance` pixels from the arc center.
    pub fn color_at_distance(&self, distance: f32) -> Rgba {
        match self {
            Paint::Solid(color) => *color,
            Paint::Radial(gradient) => gradient.color_at(gradient.offset_at(distance)),
        }
    }
}

fn lerp_rgba(a: Rgba, b: Rgba, f: f32) -> Rgba {
    let mix = |x: u8, y: u8| -> u8 {
        let x = x as f32;
        let y = y as f32;
        (x + f * (y - x)).round().clamp(0.0, 255.0) as u8
    };
    Rgba::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b), mix(a.a, b.a))
}

/// A 2D drawing target supplied by the host.
pub trait DrawSurface {
    /// Current size in pixels.
    fn size(&self) -> (u32, u32);

    /// Change the surface size. Content may be discarded.
    fn resize(&mut self, width: u32, height: u32);

    /// Blend `color` over `rect`.
    fn fill_rect(&mut self, rect: Rect, color: Rgba);

    /// Fill a full circle of `radius` around `center` with `paint`.
    fn fill_arc(&mut self, center: [f32; 2], radius: f32, paint: &Paint);

    /// Called once after each frame's draw calls.
    fn present(&mut self) {}
}

impl<S: DrawSurface + ?Sized> DrawSurface for Box<S> {
    fn size(&self) -> (u32, u32) {
        (**self).size()
    }

    fn resize(&mut self, width: u32, height: u32) {
        (**self).resize(width, height)
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        (**self).fill_rect(rect, color)
    }

    fn fill_arc(&mut self, center: [f32; 2], radius: f32, paint: &Paint) {
        (**self).fill_arc(center, radius, paint)
    }

    fn present(&mut self) {
        (**self).present()
    }
}
