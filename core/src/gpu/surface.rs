//! wgpu-backed drawing surface.
//!
//! Draw calls are batched as quads on the CPU and flushed into a persistent
//! canvas texture on [`DrawSurface::present`]. The texture is loaded (never
//! cleared) between frames so the trail veil accumulates the same way it
//! does on a 2D canvas.

use super::context::{GpuContext, GpuError};
use super::textures::{CanvasTarget, ReadbackBuffer, CANVAS_FORMAT};
use crate::color::{Rgb, Rgba};
use crate::surface::{DrawSurface, Paint, Rect};
use wgpu::{Buffer, RenderPipeline};

/// Vertex data for one quad corner.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    /// Clip-space position.
    pub position: [f32; 2],
    /// Position inside the arc's bounding box, `[-1, 1]`; zero for rects.
    pub local_pos: [f32; 2],
    pub inner_color: [f32; 4],
    pub outer_color: [f32; 4],
    /// Gradient inner/outer radius as a fraction of the arc radius.
    pub stops: [f32; 2],
}

const INITIAL_QUADS: usize = 256;

/// GPU drawing surface rendering into an offscreen RGBA8 canvas.
pub struct GpuSurface {
    ctx: GpuContext,
    pipeline: RenderPipeline,
    target: CanvasTarget,
    background: Rgba,
    vertices: Vec<QuadVertex>,
    vertex_buffer: Buffer,
    vertex_capacity: usize,
    needs_clear: bool,
}

impl GpuSurface {
    /// Create a surface of `width`x`height` filled with `background`.
    pub async fn new(width: u32, height: u32, background: Rgb) -> Result<Self, GpuError> {
        if width == 0 || height == 0 {
            return Err(GpuError::InvalidSize { width, height });
        }
        let ctx = GpuContext::new().await?;

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("watercolor_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/watercolor.wgsl").into()),
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("watercolor_pipeline_layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("watercolor_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<QuadVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x2,
                        },
                        wgpu::VertexAttribute {
                            offset: 8,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32x2,
                        },
                        wgpu::VertexAttribute {
                            offset: 16,
                            shader_location: 2,
                            format: wgpu::VertexFormat::Float32x4,
                        },
                        wgpu::VertexAttribute {
                            offset: 32,
                            shader_location: 3,
                            format: wgpu::VertexFormat::Float32x4,
                        },
                        wgpu::VertexAttribute {
                            offset: 48,
                            shader_location: 4,
                            format: wgpu::VertexFormat::Float32x2,
                        },
                    ],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: CANVAS_FORMAT,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let vertex_capacity = INITIAL_QUADS * 6;
        let vertex_buffer = create_vertex_buffer(&ctx.device, vertex_capacity);
        let target = CanvasTarget::new(&ctx.device, width, height);

        let mut surface = Self {
            ctx,
            pipeline,
            target,
            background: background.with_alpha(255),
            vertices: Vec::with_capacity(vertex_capacity),
            vertex_buffer,
            vertex_capacity,
            needs_clear: true,
        };
        surface.flush();
        Ok(surface)
    }

    /// White surface.
    pub async fn white(width: u32, height: u32) -> Result<Self, GpuError> {
        Self::new(width, height, Rgb::WHITE).await
    }

    /// Blocking variant of [`GpuSurface::new`] for hosts without an async runtime.
    pub fn new_blocking(width: u32, height: u32, background: Rgb) -> Result<Self, GpuError> {
        pollster::block_on(Self::new(width, height, background))
    }

    /// Flush pending draws and copy the canvas back as tightly packed RGBA8.
    pub fn read_pixels(&mut self) -> Result<Vec<u8>, GpuError> {
        self.flush();
        let (width, height) = self.target.size();
        let readback = ReadbackBuffer::new(&self.ctx.device, width, height);
        let mut encoder = self.ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("watercolor_readback_encoder"),
        });
        readback.copy_from(&mut encoder, &self.target);
        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        readback.read_pixels(&self.ctx.device)
    }

    /// Quads batched since the last flush.
    pub fn pending_quads(&self) -> usize {
        self.vertices.len() / 6
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.ctx.adapter_info()
    }

    #[inline]
    fn to_ndc(&self, x: f32, y: f32) -> [f32; 2] {
        let (w, h) = self.target.size();
        [(x / w as f32) * 2.0 - 1.0, 1.0 - (y / h as f32) * 2.0]
    }

    fn push_quad(
        &mut self,
        min: [f32; 2],
        max: [f32; 2],
        local: f32,
        inner: [f32; 4],
        outer: [f32; 4],
        stops: [f32; 2],
    ) {
        let positions = [
            self.to_ndc(min[0], min[1]), // top-left
            self.to_ndc(max[0], min[1]), // top-right
            self.to_ndc(min[0], max[1]), // bottom-left
            self.to_ndc(max[0], max[1]), // bottom-right
        ];
        let local_positions = [[-local, -local], [local, -local], [-local, local], [local, local]];
        let indices = [0, 2, 1, 1, 2, 3]; // Two triangles

        for &idx in &indices {
            self.vertices.push(QuadVertex {
                position: positions[idx],
                local_pos: local_positions[idx],
                inner_color: inner,
                outer_color: outer,
                stops,
            });
        }
    }

    /// Submit batched quads into the canvas.
    fn flush(&mut self) {
        if self.vertices.is_empty() && !self.needs_clear {
            return;
        }

        if self.vertices.len() > self.vertex_capacity {
            self.vertex_capacity = self.vertices.len().next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.ctx.device, self.vertex_capacity);
            log::debug!("Grew GPU vertex buffer to {} vertices", self.vertex_capacity);
        }
        if !self.vertices.is_empty() {
            self.ctx.queue.write_buffer(
                &self.vertex_buffer,
                0,
                bytemuck::cast_slice(&self.vertices),
            );
        }

        let load = if self.needs_clear {
            let [r, g, b, a] = self.background.to_f32();
            wgpu::LoadOp::Clear(wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: a as f64,
            })
        } else {
            wgpu::LoadOp::Load
        };

        let mut encoder = self.ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("watercolor_frame_encoder"),
        });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("watercolor_frame_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.target.view(),
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if !self.vertices.is_empty() {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.draw(0..self.vertices.len() as u32, 0..1);
            }
        }
        self.ctx.queue.submit(std::iter::once(encoder.finish()));

        self.vertices.clear();
        self.needs_clear = false;
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertices: usize) -> Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("watercolor_vertices"),
        size: (std::mem::size_of::<QuadVertex>() * vertices) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

impl DrawSurface for GpuSurface {
    fn size(&self) -> (u32, u32) {
        self.target.size()
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("Ignoring resize to {}x{}", width, height);
            return;
        }
        self.target = CanvasTarget::new(&self.ctx.device, width, height);
        self.vertices.clear();
        self.needs_clear = true;
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        if color.a == 0 {
            return;
        }
        let color = color.to_f32();
        self.push_quad(
            [rect.x, rect.y],
            [rect.x + rect.width, rect.y + rect.height],
            0.0,
            color,
            color,
            [0.0, 1.0],
        );
    }

    // Gradients are evaluated around the arc center using their first and
    // last stops.
    fn fill_arc(&mut self, center: [f32; 2], radius: f32, paint: &Paint) {
        if radius <= 0.0 || !radius.is_finite() {
            return;
        }
        let (inner, outer, stops) = match paint {
            Paint::Solid(color) => (color.to_f32(), color.to_f32(), [0.0, 1.0]),
            Paint::Radial(gradient) => (
                gradient.color_at(0.0).to_f32(),
                gradient.color_at(1.0).to_f32(),
                [
                    gradient.inner_radius / radius,
                    gradient.outer_radius / radius,
                ],
            ),
        };
        let [cx, cy] = center;
        self.push_quad(
            [cx - radius, cy - radius],
            [cx + radius, cy + radius],
            1.0,
            inner,
            outer,
            stops,
        );
    }

    fn present(&mut self) {
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout_matches_shader_offsets() {
        assert_eq!(std::mem::size_of::<QuadVertex>(), 56);
    }

    async fn with_surface<F>(width: u32, height: u32, test_fn: F)
    where
        F: FnOnce(&mut GpuSurface),
    {
        match GpuSurface::white(width, height).await {
            Ok(mut surface) => test_fn(&mut surface),
            Err(e) => eprintln!("Skipping test - GPU not available: {}", e),
        }
    }

    #[tokio::test]
    async fn test_new_surface_is_white() {
        with_surface(64, 32, |surface| {
            let pixels = surface.read_pixels().unwrap();
            assert_eq!(pixels.len(), 64 * 32 * 4);
            assert!(pixels[0] > 250 && pixels[1] > 250 && pixels[2] > 250);
        })
        .await;
    }

    #[tokio::test]
    async fn test_draws_are_batched_until_present() {
        with_surface(32, 32, |surface| {
            surface.fill_rect(Rect::covering((32, 32)), Rgba::new(0, 0, 0, 255));
            surface.fill_arc([16.0, 16.0], 4.0, &Paint::Solid(Rgba::new(255, 0, 0, 255)));
            assert_eq!(surface.pending_quads(), 2);
            surface.present();
            assert_eq!(surface.pending_quads(), 0);
        })
        .await;
    }

    #[tokio::test]
    async fn test_arc_only_covers_circle() {
        with_surface(64, 64, |surface| {
            surface.fill_arc([32.0, 32.0], 16.0, &Paint::Solid(Rgba::new(0, 0, 0, 255)));
            surface.present();
            let pixels = surface.read_pixels().unwrap();
            let at = |x: usize, y: usize| pixels[(y * 64 + x) * 4];
            assert!(at(32, 32) < 10, "center should be filled");
            // bounding box corner lies outside the circle
            assert!(at(17, 17) > 245, "corner should stay white");
        })
        .await;
    }

    #[tokio::test]
    async fn test_resize_clears_canvas() {
        with_surface(16, 16, |surface| {
            surface.fill_rect(Rect::covering((16, 16)), Rgba::new(0, 0, 0, 255));
            surface.present();
            surface.resize(8, 4);
            assert_eq!(surface.size(), (8, 4));
            let pixels = surface.read_pixels().unwrap();
            assert_eq!(pixels.len(), 8 * 4 * 4);
            assert!(pixels.iter().all(|&p| p > 250));
        })
        .await;
    }
}
