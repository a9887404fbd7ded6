use std::collections::HashMap;
use std::ops::Range;

use wgpu::util::DeviceExt;

use crate::outline::StipplePattern;
use crate::program::{
    BindingKind, ProgramContext, ProgramError, ProgramLayout, ShaderModule, UniformLocation, UniformValue,
};
use crate::render::{RenderCtx, RenderTarget};

use super::config::PipelineConfig;
use super::layout::{bind_group_layout_entries, premul_alpha_blend, vertex_attributes};
use super::texture::BoundTexture;

/// Program linked into a wgpu render pipeline.
#[derive(Debug)]
pub struct WgpuProgram {
    id: u64,
    label: &'static str,
    layout: ProgramLayout,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    texture_unit: Option<UniformLocation>,
}

impl WgpuProgram {
    #[inline]
    pub fn label(&self) -> &'static str {
        self.label
    }

    #[inline]
    pub fn layout(&self) -> &ProgramLayout {
        &self.layout
    }

    #[inline]
    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }
}

/// [`ProgramContext`] backed by a wgpu device and queue.
///
/// Uniform writes land in a host copy of each program's uniform block.
/// [`draw_strip`](Self::draw_strip) snapshots that copy into a buffer owned
/// by the draw, so every draw sees the uniforms set before it was recorded,
/// even when several draws share one encoder and submission.
pub struct WgpuContext<'a> {
    ctx: RenderCtx<'a>,
    config: PipelineConfig,

    // host copies of uniform blocks, by program id
    uniform_blocks: HashMap<u64, Vec<u8>>,

    // texture units
    units: HashMap<u32, BoundTexture>,
    active_unit: HashMap<u64, u32>,
    fallback: Option<BoundTexture>,
    warned_unbound_unit: bool,

    next_program_id: u64,
}

impl<'a> WgpuContext<'a> {
    pub fn new(ctx: RenderCtx<'a>, config: PipelineConfig) -> Self {
        Self {
            ctx,
            config,
            uniform_blocks: HashMap::new(),
            units: HashMap::new(),
            active_unit: HashMap::new(),
            fallback: None,
            warned_unbound_unit: false,
            next_program_id: 0,
        }
    }

    #[inline]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Binds `view` + `sampler` to texture `unit`, replacing any previous binding.
    pub fn bind_texture(&mut self, unit: u32, view: wgpu::TextureView, sampler: wgpu::Sampler) {
        self.units.insert(unit, BoundTexture { view, sampler });
    }

    pub fn unbind_texture(&mut self, unit: u32) -> Option<BoundTexture> {
        self.units.remove(&unit)
    }

    /// Uploads the mask texture for `pattern` and binds it to `unit`.
    pub fn upload_stipple(&mut self, unit: u32, pattern: &StipplePattern) {
        let texture = BoundTexture::stipple(self.ctx.device, self.ctx.queue, pattern);
        log::debug!(
            "stipple pattern {:#06x} x{} bound to unit {unit}",
            pattern.pattern,
            pattern.factor
        );
        self.units.insert(unit, texture);
    }

    /// Records a pass drawing `vertices` of `vertex_buffer` as a triangle strip.
    ///
    /// The draw uses the uniform values set before this call; later
    /// `set_uniform` calls do not affect it. The pass loads the existing
    /// color and depth contents. The texture bound to the program's selected
    /// unit is sampled; an unbound unit samples opaque white.
    pub fn draw_strip(
        &mut self,
        program: &WgpuProgram,
        target: &mut RenderTarget<'_>,
        vertex_buffer: &wgpu::Buffer,
        vertices: Range<u32>,
    ) {
        if vertices.is_empty() {
            return;
        }

        let bind_group = self.bind_group(program);

        let depth_stencil_attachment = match (self.config.depth_format, target.depth_view) {
            (Some(_), Some(view)) => Some(wgpu::RenderPassDepthStencilAttachment {
                view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            (Some(_), None) => {
                log::warn!("`{}`: pipeline expects depth but target has none; skipping draw", program.label);
                return;
            }
            (None, _) => None,
        };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("orbis outline pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&program.pipeline);
        rpass.set_bind_group(0, &bind_group, &[]);
        rpass.set_vertex_buffer(0, vertex_buffer.slice(..));
        rpass.draw(vertices, 0..1);
    }

    // ── helpers ────────────────────────────────────────────────────────────

    /// Texture currently selected by `program`, or the white fallback.
    fn selected_texture(&mut self, program: &WgpuProgram) -> BoundTexture {
        let unit = self.active_unit.get(&program.id).copied().unwrap_or(0);
        if let Some(bound) = self.units.get(&unit) {
            return bound.clone();
        }

        if !self.warned_unbound_unit {
            log::warn!("`{}`: texture unit {unit} is unbound; sampling white", program.label);
            self.warned_unbound_unit = true;
        }

        let (device, queue) = (self.ctx.device, self.ctx.queue);
        self.fallback
            .get_or_insert_with(|| BoundTexture::white(device, queue))
            .clone()
    }

    fn bind_group(&mut self, program: &WgpuProgram) -> wgpu::BindGroup {
        let needs_texture = program
            .layout
            .bindings()
            .iter()
            .any(|b| matches!(b.kind, BindingKind::Texture2d | BindingKind::Sampler));
        let texture = needs_texture.then(|| self.selected_texture(program));

        let uniform_buffer = program.layout.uniform_block_size().map(|size| {
            let block = self
                .uniform_blocks
                .entry(program.id)
                .or_insert_with(|| vec![0; size as usize]);
            self.ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(program.label),
                contents: block.as_slice(),
                usage: wgpu::BufferUsages::UNIFORM,
            })
        });

        let entries: Vec<wgpu::BindGroupEntry<'_>> = program
            .layout
            .bindings()
            .iter()
            .filter_map(|slot| {
                let resource = match slot.kind {
                    BindingKind::UniformBlock { .. } => uniform_buffer.as_ref()?.as_entire_binding(),
                    BindingKind::Texture2d => wgpu::BindingResource::TextureView(&texture.as_ref()?.view),
                    BindingKind::Sampler => wgpu::BindingResource::Sampler(&texture.as_ref()?.sampler),
                };
                Some(wgpu::BindGroupEntry {
                    binding: slot.binding,
                    resource,
                })
            })
            .collect();

        self.ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(program.label),
            layout: &program.bind_group_layout,
            entries: &entries,
        })
    }
}

impl ProgramContext for WgpuContext<'_> {
    type Program = WgpuProgram;

    fn link_program(&mut self, module: ShaderModule) -> Result<WgpuProgram, ProgramError> {
        let source = *module.source();
        let layout = module.layout().clone();
        let device = self.ctx.device;

        let texture_unit = match source.texture_unit_uniform {
            Some(name) => Some(layout.uniform(name).ok_or_else(|| {
                ProgramError::compilation(source.label, format!("texture unit uniform `{name}` not found"))
            })?),
            None => None,
        };

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(source.label),
            source: wgpu::ShaderSource::Wgsl(source.wgsl.into()),
        });

        let bgl_entries = bind_group_layout_entries(&layout);
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(source.label),
            entries: &bgl_entries,
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(source.label),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let attributes = vertex_attributes(&layout);
        let vertex_buffers = [wgpu::VertexBufferLayout {
            array_stride: layout.vertex_stride() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &attributes,
        }];

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(source.label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some(source.vertex_entry),
                compilation_options: Default::default(),
                buffers: &vertex_buffers,
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(source.fragment_entry),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.config.color_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: self.config.depth_stencil(),
            multisample: self.config.multisample(),
            multiview_mask: None,
            cache: None,
        });

        let id = self.next_program_id;
        self.next_program_id += 1;

        if let Some(size) = layout.uniform_block_size() {
            self.uniform_blocks.insert(id, vec![0; size as usize]);
        }

        log::debug!("`{}` linked as wgpu program #{id}", source.label);

        Ok(WgpuProgram {
            id,
            label: source.label,
            layout,
            pipeline,
            bind_group_layout,
            texture_unit,
        })
    }

    fn set_uniform(&mut self, program: &WgpuProgram, location: UniformLocation, value: UniformValue) {
        debug_assert_eq!(location.kind, value.kind(), "uniform type mismatch");

        if let (Some(unit_location), UniformValue::Int(unit)) = (program.texture_unit, value) {
            if unit_location == location {
                self.active_unit.insert(program.id, unit.max(0) as u32);
            }
        }

        let Some(size) = program.layout.uniform_block_size() else {
            log::warn!("`{}` has no uniform block; dropping upload", program.label);
            return;
        };
        let block = self
            .uniform_blocks
            .entry(program.id)
            .or_insert_with(|| vec![0; size as usize]);
        if !write_block(block, location.offset, value.as_bytes()) {
            log::warn!(
                "`{}`: uniform at offset {} overruns the {}-byte block; dropping upload",
                program.label,
                location.offset,
                block.len()
            );
        }
    }
}

/// Copies `bytes` into `block` at `offset`. Returns `false` when out of range.
fn write_block(block: &mut [u8], offset: u32, bytes: &[u8]) -> bool {
    let start = offset as usize;
    let Some(dst) = block.get_mut(start..start + bytes.len()) else {
        return false;
    };
    dst.copy_from_slice(bytes);
    true
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec3};
    use wgpu::util::DeviceExt;

    use super::*;
    use crate::device::{Gpu, GpuInit, OffscreenDesc, OffscreenTarget};
    use crate::outline::{OutlinePath, OutlineShaderResource, OutlineUniforms};
    use crate::paint::Color;

    const SIZE: u32 = 64;
    const RED: [u8; 4] = [255, 0, 0, 255];
    const GREEN: [u8; 4] = [0, 255, 0, 255];
    const CLEAR: [u8; 4] = [0, 0, 0, 0];

    // ── uniform block copies ──────────────────────────────────────────────

    #[test]
    fn block_write_lands_at_offset() {
        let mut block = vec![0u8; 16];
        assert!(write_block(&mut block, 4, &[1, 2, 3, 4]));
        assert_eq!(block[..8], [0, 0, 0, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn block_write_out_of_range_is_rejected() {
        let mut block = vec![0u8; 8];
        assert!(!write_block(&mut block, 6, &[1, 2, 3, 4]));
        assert!(block.iter().all(|&b| b == 0));
    }

    // ── rendering on a headless adapter ───────────────────────────────────

    fn headless() -> Option<Gpu> {
        match pollster::block_on(Gpu::new_headless(GpuInit::default())) {
            Ok(gpu) => Some(gpu),
            Err(err) => {
                eprintln!("no GPU adapter, skipping: {err:#}");
                None
            }
        }
    }

    fn target(gpu: &Gpu) -> OffscreenTarget {
        gpu.create_target(&OffscreenDesc {
            width: SIZE,
            height: SIZE,
            color_format: wgpu::TextureFormat::Rgba8Unorm,
            depth_format: None,
        })
        .unwrap()
    }

    fn pipeline_config() -> PipelineConfig {
        PipelineConfig {
            color_format: wgpu::TextureFormat::Rgba8Unorm,
            depth_format: None,
            sample_count: 1,
        }
    }

    /// Identity projection; 8 px wide ribbon (one pixel is 2/SIZE in NDC).
    fn uniforms(color: Color) -> OutlineUniforms {
        OutlineUniforms {
            model_view_projection: Mat4::IDENTITY,
            outline_width: 8.0,
            pixel_size_factor: 0.0,
            pixel_size_offset: 2.0 / SIZE as f32,
            color,
            ..Default::default()
        }
    }

    /// Horizontal segment at NDC y = 0.5 (pixel row 16), depth 0.5.
    ///
    /// The offset axis of a point at (x, 0.5, 0.5) is (0, 1, 1)/√2, so the
    /// ribbon spreads across rows and stays inside the depth range.
    fn segment(gpu: &Gpu, x0: f32, x1: f32) -> (wgpu::Buffer, u32) {
        let strip = OutlinePath::open([Vec3::new(x0, 0.5, 0.5), Vec3::new(x1, 0.5, 0.5)]).strip_vertices();
        let buffer = gpu.device().create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("test segment"),
            contents: bytemuck::cast_slice(&strip),
            usage: wgpu::BufferUsages::VERTEX,
        });
        (buffer, strip.len() as u32)
    }

    fn pixel(pixels: &[[u8; 4]], x: u32, y: u32) -> [u8; 4] {
        pixels[(y * SIZE + x) as usize]
    }

    #[test]
    fn red_segment_covers_its_pixels_only() {
        let Some(gpu) = headless() else { return };
        let target = target(&gpu);
        let mut ctx = WgpuContext::new(gpu.render_ctx(), pipeline_config());
        let resource = OutlineShaderResource::new(&mut ctx).unwrap();
        let (vbo, count) = segment(&gpu, -0.8, 0.8);

        uniforms(Color::from_premul(1.0, 0.0, 0.0, 1.0)).apply(&resource, &mut ctx).unwrap();

        let mut encoder = gpu.create_encoder("test encoder");
        target.clear(&mut encoder, Color::transparent());
        let mut rt = RenderTarget::new(&mut encoder, target.color_view());
        ctx.draw_strip(resource.program().handle(), &mut rt, &vbo, 0..count);
        gpu.submit(encoder);

        let pixels = gpu.read_rgba8(&target).unwrap();
        assert_eq!(pixel(&pixels, 32, 16), RED);
        assert_eq!(pixel(&pixels, 16, 15), RED);
        // below the ribbon and beyond its ends
        assert_eq!(pixel(&pixels, 32, 48), CLEAR);
        assert_eq!(pixel(&pixels, 1, 16), CLEAR);
    }

    #[test]
    fn each_draw_keeps_the_uniforms_set_before_it() {
        let Some(gpu) = headless() else { return };
        let target = target(&gpu);
        let mut ctx = WgpuContext::new(gpu.render_ctx(), pipeline_config());
        let resource = OutlineShaderResource::new(&mut ctx).unwrap();
        let (left, left_count) = segment(&gpu, -0.9, -0.1);
        let (right, right_count) = segment(&gpu, 0.1, 0.9);

        let mut encoder = gpu.create_encoder("test encoder");
        target.clear(&mut encoder, Color::transparent());
        {
            let mut rt = RenderTarget::new(&mut encoder, target.color_view());
            let program = resource.program().handle();

            uniforms(Color::from_premul(1.0, 0.0, 0.0, 1.0)).apply(&resource, &mut ctx).unwrap();
            ctx.draw_strip(program, &mut rt, &left, 0..left_count);

            uniforms(Color::from_premul(0.0, 1.0, 0.0, 1.0)).apply(&resource, &mut ctx).unwrap();
            ctx.draw_strip(program, &mut rt, &right, 0..right_count);
        }
        gpu.submit(encoder);

        let pixels = gpu.read_rgba8(&target).unwrap();
        assert_eq!(pixel(&pixels, 16, 16), RED);
        assert_eq!(pixel(&pixels, 48, 16), GREEN);
    }

    #[test]
    fn stipple_mask_modulates_color_when_enabled() {
        let Some(gpu) = headless() else { return };
        let mut ctx = WgpuContext::new(gpu.render_ctx(), pipeline_config());
        let resource = OutlineShaderResource::new(&mut ctx).unwrap();
        let (vbo, count) = segment(&gpu, -0.8, 0.8);

        // Arc lengths stay far below one stipple cycle, so only the first
        // pattern step is sampled.
        let cases = [
            (StipplePattern::new(1, 0x0001), true, RED),
            (StipplePattern::new(1, 0xFFFE), true, CLEAR),
            (StipplePattern::new(1, 0xFFFE), false, RED),
        ];

        for (pattern, enabled, expected) in cases {
            let target = target(&gpu);
            ctx.upload_stipple(1, &pattern);
            OutlineUniforms {
                texture_enabled: enabled,
                texture_unit: 1,
                ..uniforms(Color::from_premul(1.0, 0.0, 0.0, 1.0))
            }
            .apply(&resource, &mut ctx)
            .unwrap();

            let mut encoder = gpu.create_encoder("test encoder");
            target.clear(&mut encoder, Color::transparent());
            let mut rt = RenderTarget::new(&mut encoder, target.color_view());
            ctx.draw_strip(resource.program().handle(), &mut rt, &vbo, 0..count);
            gpu.submit(encoder);

            let pixels = gpu.read_rgba8(&target).unwrap();
            assert_eq!(pixel(&pixels, 32, 16), expected, "pattern {:#06x}, texture {enabled}", pattern.pattern);
        }
    }
}
