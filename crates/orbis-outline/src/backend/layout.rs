//! Reflected program interface to wgpu descriptor translation.

use std::num::NonZeroU64;

use crate::program::{AttributeFormat, BindingKind, ProgramLayout};

pub(super) fn vertex_format(format: AttributeFormat) -> wgpu::VertexFormat {
    match format {
        AttributeFormat::Float => wgpu::VertexFormat::Float32,
        AttributeFormat::Vec2 => wgpu::VertexFormat::Float32x2,
        AttributeFormat::Vec3 => wgpu::VertexFormat::Float32x3,
        AttributeFormat::Vec4 => wgpu::VertexFormat::Float32x4,
    }
}

/// One interleaved buffer; attributes in location order.
pub(super) fn vertex_attributes(layout: &ProgramLayout) -> Vec<wgpu::VertexAttribute> {
    layout
        .attributes()
        .iter()
        .map(|a| wgpu::VertexAttribute {
            format: vertex_format(a.format),
            offset: a.offset as wgpu::BufferAddress,
            shader_location: a.location,
        })
        .collect()
}

pub(super) fn bind_group_layout_entries(layout: &ProgramLayout) -> Vec<wgpu::BindGroupLayoutEntry> {
    layout
        .bindings()
        .iter()
        .map(|slot| {
            let ty = match slot.kind {
                BindingKind::UniformBlock { size } => wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(size as u64),
                },
                BindingKind::Texture2d => wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                BindingKind::Sampler => wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            };
            wgpu::BindGroupLayoutEntry {
                binding: slot.binding,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty,
                count: None,
            }
        })
        .collect()
}

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}
