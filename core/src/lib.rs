//! Watercolor Trail
//!
//! Pointer-driven particle effect: every pointer move spawns a couple of
//! particles that drift outward, grow and fade, drawn as soft radial gradients
//! over a translucent white veil that leaves a decaying trail. Colors walk a
//! cyclic watercolor palette.
//!
//! # Features
//!
//! - [`ParticleField`]: particle lifecycle, palette cursor and per-frame render
//! - [`DrawSurface`] trait with a recording double, a CPU rasterizer (`image`)
//!   and a wgpu surface
//! - [`EffectHost`]: listener lifetime, event routing and frame scheduling
//! - [`Playback`]: scripted pointer paths for headless runs

pub mod color;
pub mod config;
pub mod field;
pub mod gpu;
pub mod host;
pub mod palette;
pub mod particle;
pub mod playback;
pub mod surface;

// Re-export commonly used types
pub use color::{parse_hex_color, Rgb, Rgba};
pub use config::{ConfigError, FieldConfig};
pub use field::{FrameRequest, ParticleField};
pub use gpu::{GpuContext, GpuError, GpuSurface};
pub use host::{EffectHost, FrameScheduler, HostEvent, ManualScheduler};
pub use palette::{PaletteCursor, WATERCOLOR_ANCHORS};
pub use particle::Particle;
pub use playback::{Playback, PlaybackStats, PointerPath};
pub use surface::{
    DrawCommand, DrawSurface, Paint, RadialGradient, RasterSurface, Rect, RecordingSurface,
    SurfaceError,
};
