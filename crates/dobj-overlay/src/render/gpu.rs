//! wgpu upload and presentation of tessellated draw lists.
//!
//! [`OverlayGpu`] owns the window surface and a single alpha-blended
//! pipeline. Each frame it tessellates the [`DrawList`], grows the vertex
//! buffer when needed, and issues one draw call in screen-pixel space.

use std::sync::Arc;

use dobj_host::math::Vec2;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::tessellate::{pixel_projection, tessellate, ColorVertex};
use crate::draw::DrawList;
use crate::text::GlyphFont;

/// Initial vertex buffer capacity.
const INITIAL_VERTICES: usize = 64 * 1024;

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

const BACKDROP: wgpu::Color = wgpu::Color {
    r: 0.08,
    g: 0.1,
    b: 0.12,
    a: 1.0,
};

fn vertex_bytes(count: usize) -> wgpu::BufferAddress {
    (count * std::mem::size_of::<ColorVertex>()) as wgpu::BufferAddress
}

fn vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("overlay_vertices"),
        size: vertex_bytes(capacity),
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// The screen uniform: one matrix taking pixels to clip space.
struct ScreenUniform {
    buffer: wgpu::Buffer,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl ScreenUniform {
    fn new(device: &wgpu::Device, viewport: Vec2) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("overlay_screen"),
            contents: bytemuck::cast_slice(&pixel_projection(viewport)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("overlay_screen_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("overlay_screen_group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self {
            buffer,
            layout,
            bind_group,
        }
    }
}

fn overlay_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    screen: &ScreenUniform,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("overlay_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders.wgsl").into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("overlay_layout"),
        bind_group_layouts: &[&screen.layout],
        push_constant_ranges: &[],
    });
    let vertex_layout = wgpu::VertexBufferLayout {
        array_stride: vertex_bytes(1),
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("overlay_pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[vertex_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        // Triangle list, no culling: fans are wound either way.
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// GPU state for presenting the overlay in a window.
pub struct OverlayGpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::RenderPipeline,
    screen: ScreenUniform,
    vertices: wgpu::Buffer,
    vertex_capacity: usize,
    font: GlyphFont,
    /// Color behind the overlay.
    pub clear_color: wgpu::Color,
}

impl OverlayGpu {
    /// Bring up a surface, device and pipeline for `window`.
    ///
    /// `font` must be the font the overlay measured its text with, or
    /// tooltip backgrounds will not fit their text.
    ///
    /// # Errors
    ///
    /// Fails when no adapter can present to the window or the device
    /// request is refused.
    pub async fn new(window: Arc<Window>, font: GlyphFont) -> Result<Self, anyhow::Error> {
        let PhysicalSize { width, height } = window.inner_size();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window.clone())?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("no GPU adapter can present to this window"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("dobj_overlay"),
                    ..Default::default()
                },
                None,
            )
            .await?;

        let mut config = surface
            .get_default_config(&adapter, width.max(1), height.max(1))
            .ok_or_else(|| anyhow::anyhow!("surface is not supported by the adapter"))?;
        if let Some(srgb) = surface
            .get_capabilities(&adapter)
            .formats
            .into_iter()
            .find(|f| f.is_srgb())
        {
            config.format = srgb;
        }
        surface.configure(&device, &config);

        let viewport = Vec2::new(config.width as f32, config.height as f32);
        let screen = ScreenUniform::new(&device, viewport);
        let pipeline = overlay_pipeline(&device, config.format, &screen);
        let vertices = vertex_buffer(&device, INITIAL_VERTICES);

        Ok(Self {
            window,
            surface,
            config,
            device,
            queue,
            pipeline,
            screen,
            vertices,
            vertex_capacity: INITIAL_VERTICES,
            font,
            clear_color: BACKDROP,
        })
    }

    /// Viewport size in pixels.
    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.config.width as f32, self.config.height as f32)
    }

    /// Upload `vertices`, replacing the buffer if it is too small.
    fn upload(&mut self, vertices: &[ColorVertex]) {
        if vertices.len() > self.vertex_capacity {
            let capacity = vertices.len().next_power_of_two();
            tracing::debug!(capacity, "growing overlay vertex buffer");
            self.vertices = vertex_buffer(&self.device, capacity);
            self.vertex_capacity = capacity;
        }
        if !vertices.is_empty() {
            self.queue
                .write_buffer(&self.vertices, 0, bytemuck::cast_slice(vertices));
        }
    }

    /// Present one frame showing `list`.
    ///
    /// # Errors
    ///
    /// Passes on the [`wgpu::SurfaceError`] when no output texture is
    /// available, for example while minimized or after the surface was lost.
    pub fn render(&mut self, list: &DrawList) -> Result<(), wgpu::SurfaceError> {
        let projection = pixel_projection(self.viewport());
        self.queue
            .write_buffer(&self.screen.buffer, 0, bytemuck::cast_slice(&projection));
        let vertices = tessellate(list, &self.font);
        self.upload(&vertices);

        let frame = self.surface.get_current_texture()?;
        let target = frame.texture.create_view(&Default::default());
        let mut encoder = self.device.create_command_encoder(&Default::default());
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("overlay_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                ..Default::default()
            });
            if !vertices.is_empty() {
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &self.screen.bind_group, &[]);
                pass.set_vertex_buffer(0, self.vertices.slice(..vertex_bytes(vertices.len())));
                pass.draw(0..vertices.len() as u32, 0..1);
            }
        }
        self.queue.submit([encoder.finish()]);
        frame.present();
        Ok(())
    }

    /// Follow a window resize. Minimized (zero) sizes keep the old surface.
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
    }

    pub fn window(&self) -> &Window {
        &self.window
    }
}
