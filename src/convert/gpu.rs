//! GPU color conversion
//!
//! Uploads the three planes of a frame as single-channel textures and runs
//! the BT.601 matrix in a fragment shader over a full-screen quad, storing
//! into an 8-bit RGBA target owned by the converter. Plane textures use
//! nearest-neighbor sampling: chroma is read at full-resolution positions
//! without bilinear upsampling, like the CPU path.

use super::cpu::validate_planes;
use crate::error::{Error, Result};
use crate::y4m::FrameRef;
use tracing::{debug, info};

/// WGSL shader: full-screen quad plus full-range BT.601 conversion
const CONVERT_SHADER: &str = r#"
struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) tex_coord: vec2<f32>,
}

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> VertexOutput {
    // Full-screen quad using 6 vertices. Texture coordinates are flipped on
    // the Y axis relative to clip space: plane data starts at the top-left.
    var positions = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );
    var tex_coords = array<vec2<f32>, 6>(
        vec2<f32>(0.0, 1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(1.0, 0.0),
        vec2<f32>(0.0, 1.0),
        vec2<f32>(1.0, 0.0),
        vec2<f32>(0.0, 0.0),
    );

    var output: VertexOutput;
    output.position = vec4<f32>(positions[vertex_index], 0.0, 1.0);
    output.tex_coord = tex_coords[vertex_index];
    return output;
}

@group(0) @binding(0) var luma_texture: texture_2d<f32>;
@group(0) @binding(1) var cb_texture: texture_2d<f32>;
@group(0) @binding(2) var cr_texture: texture_2d<f32>;
@group(0) @binding(3) var plane_sampler: sampler;

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let y = textureSample(luma_texture, plane_sampler, input.tex_coord).r;
    let cb = textureSample(cb_texture, plane_sampler, input.tex_coord).r - 0.5;
    let cr = textureSample(cr_texture, plane_sampler, input.tex_coord).r - 0.5;

    // Full-range BT.601; the Rgba8Unorm target clamps on store
    let r = y + 1.4 * cr;
    let g = y - 0.343 * cb - 0.711 * cr;
    let b = y + 1.765 * cb;

    return vec4<f32>(r, g, b, 1.0);
}
"#;

const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// GPU-side converter from planar 4:2:0 frames to an RGBA texture.
///
/// Plane and target textures are owned by the converter and released when
/// it drops. Dimensions follow the uploaded frame; textures are recreated
/// only when they change.
pub struct GpuConverter {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    plane_textures: Option<(wgpu::Texture, wgpu::Texture, wgpu::Texture)>,
    bind_group: Option<wgpu::BindGroup>,
    target: Option<wgpu::Texture>,
    frame_width: u32,
    frame_height: u32,
}

impl GpuConverter {
    /// Create a headless converter on the first available adapter
    pub async fn new() -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| Error::render(format!("Failed to request adapter: {}", e)))?;

        info!("Using GPU adapter: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .map_err(|e| Error::render(format!("Failed to create device: {}", e)))?;

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Plane Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Convert Shader"),
            source: wgpu::ShaderSource::Wgsl(CONVERT_SHADER.into()),
        });

        let plane_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Convert Bind Group Layout"),
                entries: &[
                    plane_entry(0),
                    plane_entry(1),
                    plane_entry(2),
                    wgpu::BindGroupLayoutEntry {
                        binding: 3,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Convert Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Convert Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: TARGET_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Ok(Self {
            device,
            queue,
            pipeline,
            bind_group_layout,
            sampler,
            plane_textures: None,
            bind_group: None,
            target: None,
            frame_width: 0,
            frame_height: 0,
        })
    }

    /// Blocking constructor for callers without an async runtime
    pub fn new_blocking() -> Result<Self> {
        pollster::block_on(Self::new())
    }

    /// Upload a frame's planes and render the conversion into the owned
    /// RGBA target texture
    pub fn convert(&mut self, frame: &FrameRef<'_>) -> Result<()> {
        validate_planes(frame)?;
        self.ensure_resources(frame.width, frame.height);
        self.upload_planes(frame);

        let target = self.target.as_ref().ok_or_else(|| {
            Error::render("conversion target texture missing".to_string())
        })?;
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Convert Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Convert Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            let bind_group = self.bind_group.as_ref().ok_or_else(|| {
                Error::render("plane bind group missing".to_string())
            })?;
            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, bind_group, &[]);
            render_pass.draw(0..6, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    /// Convert a frame and read the result back as packed RGBA bytes
    /// (`width*height*4`)
    pub fn convert_to_rgba(&mut self, frame: &FrameRef<'_>) -> Result<Vec<u8>> {
        self.convert(frame)?;

        let target = self.target.as_ref().ok_or_else(|| {
            Error::render("conversion target texture missing".to_string())
        })?;

        let width = self.frame_width;
        let height = self.frame_height;
        let row_bytes = width * 4;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_row_bytes = row_bytes.div_ceil(align) * align;

        let staging = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Readback Buffer"),
            size: padded_row_bytes as u64 * height as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Readback Encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: target,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row_bytes),
                    rows_per_image: None,
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let slice = staging.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = self.device.poll(wgpu::PollType::wait_indefinitely());

        rx.recv()
            .map_err(|e| Error::render(format!("Failed to map readback buffer: {}", e)))?
            .map_err(|e| Error::render(format!("Readback buffer map error: {:?}", e)))?;

        let mapped = slice.get_mapped_range();
        let mut rgba = vec![0u8; row_bytes as usize * height as usize];
        for row in 0..height as usize {
            let src = row * padded_row_bytes as usize;
            let dst = row * row_bytes as usize;
            rgba[dst..dst + row_bytes as usize]
                .copy_from_slice(&mapped[src..src + row_bytes as usize]);
        }
        drop(mapped);
        staging.unmap();

        Ok(rgba)
    }

    /// The converted-frame texture, once a frame has been converted
    pub fn rgba_texture(&self) -> Option<&wgpu::Texture> {
        self.target.as_ref()
    }

    /// The wgpu device backing this converter
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// The wgpu queue backing this converter
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    fn ensure_resources(&mut self, width: u32, height: u32) {
        if self.frame_width == width && self.frame_height == height {
            return;
        }

        debug!(width, height, "allocating conversion textures");

        let plane = |label, w, h| {
            self.device.create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width: w,
                    height: h,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::R8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            })
        };

        let chroma_width = width / 2;
        let chroma_height = height / 2;
        let luma_texture = plane("Luma Texture", width, height);
        let cb_texture = plane("Cb Texture", chroma_width, chroma_height);
        let cr_texture = plane("Cr Texture", chroma_width, chroma_height);

        let luma_view = luma_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let cb_view = cb_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let cr_view = cr_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Convert Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&luma_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&cb_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&cr_view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let target = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("RGBA Target Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });

        self.plane_textures = Some((luma_texture, cb_texture, cr_texture));
        self.bind_group = Some(bind_group);
        self.target = Some(target);
        self.frame_width = width;
        self.frame_height = height;
    }

    fn upload_planes(&self, frame: &FrameRef<'_>) {
        let Some((luma_texture, cb_texture, cr_texture)) = &self.plane_textures else {
            return;
        };

        let write = |texture, data: &[u8], w: u32, h: u32| {
            self.queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                data,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(w),
                    rows_per_image: None,
                },
                wgpu::Extent3d {
                    width: w,
                    height: h,
                    depth_or_array_layers: 1,
                },
            );
        };

        write(luma_texture, frame.luma, frame.width, frame.height);
        write(cb_texture, frame.cb, frame.chroma_width(), frame.chroma_height());
        write(cr_texture, frame.cr, frame.chroma_width(), frame.chroma_height());
    }
}
