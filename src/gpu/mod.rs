//! wgpu renderer for the native preview.
//!
//! The browser draws through the canvas 2D API immediately. Here every
//! [`Surface`] call between two presents is batched into one triangle list
//! (lines become thin quads, dots become feathered discs) and drawn in a
//! single pass on [`Surface::present`].

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{UVec2, Vec2};
use winit::window::Window;

use crate::error::GpuError;
use crate::surface::Surface;
use crate::visuals::Rgba;

/// WGSL source of the backdrop pipeline.
pub const SHADER_SOURCE: &str = include_str!("backdrop.wgsl");

/// Page background behind the backdrop.
pub const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 0.043,
    g: 0.047,
    b: 0.078,
    a: 1.0,
};

/// One corner of a line quad or dot quad.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// CSS pixels, top-left origin.
    pub position: [f32; 2],
    /// Unit-disc coordinate for dots; zero for lines.
    pub local: [f32; 2],
    pub color: [f32; 4],
    /// Dot radius in CSS pixels; zero marks a line.
    pub extent: f32,
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x2,
        1 => Float32x2,
        2 => Float32x4,
        3 => Float32
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ViewUniform {
    size: [f32; 2],
    scale: f32,
    _pad: f32,
}

/// Triangles accumulated for the next present.
#[derive(Debug, Default)]
pub struct Batch {
    vertices: Vec<Vertex>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    /// A segment of the given width as two triangles. Degenerate segments
    /// are dropped.
    pub fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        let Some(dir) = (to - from).try_normalize() else {
            return;
        };
        let offset = dir.perp() * (width * 0.5);
        let color = color.to_array();
        let corner = |p: Vec2| Vertex {
            position: p.to_array(),
            local: [0.0, 0.0],
            color,
            extent: 0.0,
        };
        let (a, b, c, d) = (from + offset, from - offset, to - offset, to + offset);
        self.vertices.extend([a, b, c, a, c, d].into_iter().map(corner));
    }

    /// A disc as a bounding quad; the fragment stage cuts the corners.
    pub fn circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if radius <= 0.0 {
            return;
        }
        let color = color.to_array();
        let corner = |local: Vec2| Vertex {
            position: (center + local * radius).to_array(),
            local: local.to_array(),
            color,
            extent: radius,
        };
        let (a, b, c, d) = (
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(-1.0, 1.0),
        );
        self.vertices.extend([a, b, c, a, c, d].into_iter().map(corner));
    }
}

/// A window-backed [`Surface`].
pub struct GpuSurface {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    view_buffer: wgpu::Buffer,
    view_bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    batch: Batch,
    css_size: UVec2,
    scale: f32,
}

impl GpuSurface {
    pub async fn new(window: Arc<Window>) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Backdrop Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        // Canvas colours are already sRGB-encoded; blend them as-is.
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::IncompatibleSurface)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .ok_or(GpuError::IncompatibleSurface)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Backdrop Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let view_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Backdrop View Buffer"),
            size: std::mem::size_of::<ViewUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Backdrop Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let view_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Backdrop Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: view_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Backdrop Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Backdrop Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
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
            multiview: None,
            cache: None,
        });

        let vertex_capacity = 1024;
        let vertex_buffer = create_vertex_buffer(&device, vertex_capacity);

        log::info!(
            "preview surface ready: {:?} ({:?})",
            adapter.get_info().name,
            config.format
        );

        Ok(Self {
            surface,
            device,
            queue,
            css_size: UVec2::new(config.width, config.height),
            config,
            pipeline,
            view_buffer,
            view_bind_group,
            vertex_buffer,
            vertex_capacity,
            batch: Batch::new(),
            scale: 1.0,
        })
    }

    pub fn batch(&self) -> &Batch {
        &self.batch
    }

    fn reconfigure(&mut self) {
        if self.config.width > 0 && self.config.height > 0 {
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn upload(&mut self) {
        let needed = self.batch.vertices().len();
        if needed > self.vertex_capacity {
            self.vertex_capacity = needed.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.device, self.vertex_capacity);
        }
        if needed > 0 {
            self.queue.write_buffer(
                &self.vertex_buffer,
                0,
                bytemuck::cast_slice(self.batch.vertices()),
            );
        }
        let view = ViewUniform {
            size: [self.css_size.x.max(1) as f32, self.css_size.y.max(1) as f32],
            scale: self.scale,
            _pad: 0.0,
        };
        self.queue.write_buffer(&self.view_buffer, 0, bytemuck::bytes_of(&view));
    }
}

impl Surface for GpuSurface {
    fn resize(&mut self, backing: UVec2, css: UVec2) {
        self.css_size = css;
        self.config.width = backing.x;
        self.config.height = backing.y;
        self.reconfigure();
    }

    fn set_transform(&mut self, scale: f32) {
        self.scale = scale;
    }

    fn clear(&mut self, _width: f32, _height: f32) {
        self.batch.clear();
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.batch.line(from, to, width, color);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.batch.circle(center, radius, color);
    }

    fn present(&mut self) {
        if self.config.width == 0 || self.config.height == 0 {
            return;
        }
        self.upload();

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.reconfigure();
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::trace!("surface timeout, skipping frame");
                return;
            }
            Err(e) => {
                log::error!("surface error: {}", e);
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Backdrop Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Backdrop Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(BACKGROUND),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            let count = self.batch.vertices().len() as u32;
            if count > 0 {
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &self.view_bind_group, &[]);
                pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                pass.draw(0..count, 0..1);
            }
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Backdrop Vertex Buffer"),
        size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visuals::Rgb;

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 9 * 4);
    }

    #[test]
    fn line_becomes_quad_of_requested_width() {
        let mut batch = Batch::new();
        let color = Rgb::new(99, 102, 241).with_alpha(0.5);
        batch.line(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), 2.0, color);

        let v = batch.vertices();
        assert_eq!(v.len(), 6);
        let ys: Vec<f32> = v.iter().map(|v| v.position[1].abs()).collect();
        assert!(ys.iter().all(|y| (*y - 1.0).abs() < 1e-6));
        assert!(v.iter().all(|v| v.extent == 0.0));
    }

    #[test]
    fn degenerate_shapes_are_dropped() {
        let mut batch = Batch::new();
        let color = Rgb::new(0, 0, 0).with_alpha(1.0);
        batch.line(Vec2::ONE, Vec2::ONE, 1.0, color);
        batch.circle(Vec2::ONE, 0.0, color);
        assert!(batch.vertices().is_empty());
    }

    #[test]
    fn circle_quad_bounds_the_disc() {
        let mut batch = Batch::new();
        batch.circle(Vec2::new(5.0, 5.0), 2.0, Rgb::new(1, 2, 3).with_alpha(1.0));
        let v = batch.vertices();
        assert_eq!(v.len(), 6);
        assert_eq!(v[0].position, [3.0, 3.0]);
        assert_eq!(v[2].position, [7.0, 7.0]);
        assert!(v.iter().all(|v| v.extent == 2.0));
    }
}
