//! GPU drawing surface using wgpu.
//!
//! Provides a headless [`GpuSurface`] that renders the effect into an
//! offscreen canvas texture (Metal on macOS, Vulkan or GL elsewhere).

pub mod context;
pub mod surface;
pub mod textures;

pub use context::{GpuContext, GpuError};
pub use surface::{GpuSurface, QuadVertex};
pub use textures::{CanvasTarget, ReadbackBuffer};
