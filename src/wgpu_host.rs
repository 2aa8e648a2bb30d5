//! Reference rendering-bridge implementation on wgpu.
//!
//! Runs on an existing device/queue handed over by the integrator; it never
//! creates an instance or surface of its own. Bridge calls record into the
//! host, and the integrator replays them into its own render pass with
//! [`WgpuHost::render`] after the dialog frame:
//!
//! ```rust,ignore
//! host.set_viewport(width, height);
//! dialog.frame(&input, &mut host)?;
//! let mut pass = encoder.begin_render_pass(&descriptor);
//! host.render(&mut pass);
//! ```
//!
//! Dynamic vertex/index buffers grow to the largest upload seen and never
//! shrink, per the bridge contract.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::host::{RenderHost, ScissorRect, TextureHandle};
use crate::render::VERTEX_STRIDE;

/// WGSL shader for the dialog's textured, vertex-tinted quads.
///
/// Positions arrive in viewport pixels and are mapped to clip space with the
/// screen size uniform; colors arrive packed RGBA8 little-endian.
const DIALOG_SHADER: &str = r#"
struct Globals {
    screen_size: vec2<f32>,
    _pad: vec2<f32>,
}

@group(0) @binding(0)
var<uniform> globals: Globals;

@group(0) @binding(1)
var atlas_texture: texture_2d<f32>;

@group(0) @binding(2)
var atlas_sampler: sampler;

struct VertexInput {
    @location(0) pos: vec2<f32>,
    @location(1) color: u32,
    @location(2) uv: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) uv: vec2<f32>,
}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let ndc = vec2<f32>(
        in.pos.x / globals.screen_size.x * 2.0 - 1.0,
        1.0 - in.pos.y / globals.screen_size.y * 2.0,
    );
    out.clip = vec4<f32>(ndc, 0.0, 1.0);
    out.color = unpack4x8unorm(in.color);
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color * textureSample(atlas_texture, atlas_sampler, in.uv);
}
"#;

struct AtlasBinding {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

struct PendingDraw {
    scissor: ScissorRect,
    vertex_offset: u32,
    index_offset: u32,
    element_count: u32,
}

/// [`RenderHost`] on an existing wgpu device and queue.
pub struct WgpuHost {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    globals: wgpu::Buffer,
    atlas: Option<AtlasBinding>,
    vertex_buffer: Option<wgpu::Buffer>,
    vertex_capacity: u64,
    index_buffer: Option<wgpu::Buffer>,
    index_capacity: u64,
    pending: Vec<PendingDraw>,
    viewport: (u32, u32),
    next_handle: u64,
}

impl WgpuHost {
    /// Build the pipeline for a render target of `target_format`.
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        target_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("File Dialog Shader"),
            source: wgpu::ShaderSource::Wgsl(DIALOG_SHADER.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("File Dialog Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("File Dialog Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("File Dialog Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: VERTEX_STRIDE as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Float32x2,
                            offset: 0,
                            shader_location: 0,
                        },
                        wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Uint32,
                            offset: 8,
                            shader_location: 1,
                        },
                        wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Float32x2,
                            offset: 12,
                            shader_location: 2,
                        },
                    ],
                }],
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
            cache: None,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("File Dialog Sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let globals = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("File Dialog Globals Buffer"),
            size: 16,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            device,
            queue,
            pipeline,
            bind_group_layout,
            sampler,
            globals,
            atlas: None,
            vertex_buffer: None,
            vertex_capacity: 0,
            index_buffer: None,
            index_capacity: 0,
            pending: Vec::new(),
            viewport: (0, 0),
            next_handle: 0,
        }
    }

    /// Update the viewport used for clip-space mapping and scissor clamping.
    /// Call whenever the render target is resized.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        let globals: [f32; 4] = [width.max(1) as f32, height.max(1) as f32, 0.0, 0.0];
        self.queue
            .write_buffer(&self.globals, 0, bytemuck::cast_slice(&globals));
    }

    /// Replay the frame's recorded draws into the integrator's render pass.
    pub fn render<'pass>(&'pass mut self, pass: &mut wgpu::RenderPass<'pass>) {
        let pending = std::mem::take(&mut self.pending);
        let (Some(atlas), Some(vertex_buffer), Some(index_buffer)) = (
            self.atlas.as_ref(),
            self.vertex_buffer.as_ref(),
            self.index_buffer.as_ref(),
        ) else {
            return;
        };

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &atlas.bind_group, &[]);
        pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint16);

        for draw in pending {
            let Some((x, y, w, h)) = clamp_scissor(draw.scissor, self.viewport) else {
                continue;
            };
            pass.set_scissor_rect(x, y, w, h);
            pass.draw_indexed(
                draw.index_offset..draw.index_offset + draw.element_count,
                draw.vertex_offset as i32,
                0..1,
            );
        }
    }

    fn grow_buffer(
        device: &wgpu::Device,
        slot: &mut Option<wgpu::Buffer>,
        capacity: &mut u64,
        needed: u64,
        label: &str,
        usage: wgpu::BufferUsages,
    ) {
        if needed <= *capacity && slot.is_some() {
            return;
        }
        // Grow to the largest size seen, never shrink. Index buffer sizes
        // must stay COPY_BUFFER_ALIGNMENT-aligned for write_buffer.
        let size = needed.max(*capacity).next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT);
        log::debug!("growing {label} to {size} bytes");
        *slot = Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        *capacity = size;
    }
}

impl RenderHost for WgpuHost {
    fn create_texture(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<TextureHandle> {
        anyhow::ensure!(
            pixels.len() as u64 == width as u64 * height as u64 * 4,
            "pixel buffer does not match {width}x{height} RGBA8"
        );

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("File Dialog Atlas Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("File Dialog Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.globals.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        self.atlas = Some(AtlasBinding {
            _texture: texture,
            bind_group,
        });
        self.next_handle += 1;
        Ok(TextureHandle(self.next_handle))
    }

    fn upload_buffers(&mut self, vertices: &[u8], indices: &[u8]) -> Result<()> {
        Self::grow_buffer(
            &self.device,
            &mut self.vertex_buffer,
            &mut self.vertex_capacity,
            vertices.len() as u64,
            "File Dialog Vertex Buffer",
            wgpu::BufferUsages::VERTEX,
        );
        Self::grow_buffer(
            &self.device,
            &mut self.index_buffer,
            &mut self.index_capacity,
            indices.len() as u64,
            "File Dialog Index Buffer",
            wgpu::BufferUsages::INDEX,
        );

        if !vertices.is_empty() {
            let buffer = self
                .vertex_buffer
                .as_ref()
                .context("vertex buffer missing after growth")?;
            self.queue.write_buffer(buffer, 0, vertices);
        }
        if !indices.is_empty() {
            let buffer = self
                .index_buffer
                .as_ref()
                .context("index buffer missing after growth")?;
            // write_buffer needs 4-byte-aligned sizes; quad index streams
            // are 12 bytes per quad, so this holds.
            self.queue.write_buffer(buffer, 0, indices);
        }

        Ok(())
    }

    fn draw_indexed(
        &mut self,
        scissor: ScissorRect,
        vertex_offset: u32,
        _vertex_count: u32,
        index_offset: u32,
        element_count: u32,
    ) -> Result<()> {
        self.pending.push(PendingDraw {
            scissor,
            vertex_offset,
            index_offset,
            element_count,
        });
        Ok(())
    }
}

/// Clamp a scissor rectangle to the viewport; wgpu panics on out-of-bounds
/// scissors. Returns `None` when nothing is left.
fn clamp_scissor(scissor: ScissorRect, viewport: (u32, u32)) -> Option<(u32, u32, u32, u32)> {
    let (vw, vh) = (viewport.0 as i64, viewport.1 as i64);
    let x0 = (scissor.x as i64).clamp(0, vw);
    let y0 = (scissor.y as i64).clamp(0, vh);
    let x1 = (scissor.x as i64 + scissor.width as i64).clamp(0, vw);
    let y1 = (scissor.y as i64 + scissor.height as i64).clamp(0, vh);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some((x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32))
}
