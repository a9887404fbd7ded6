use crate::outline::StipplePattern;

/// Texture view + sampler bound to one texture unit.
#[derive(Debug, Clone)]
pub struct BoundTexture {
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl BoundTexture {
    /// 1x1 opaque white. Sampling it leaves a modulated color unchanged.
    pub(super) fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self::from_rgba8(device, queue, "orbis white texture", 1, &[[u8::MAX; 4]])
    }

    /// Repeating 1-pixel-high mask for `pattern`.
    pub(super) fn stipple(device: &wgpu::Device, queue: &wgpu::Queue, pattern: &StipplePattern) -> Self {
        let texels = pattern.rgba_texels();
        Self::from_rgba8(device, queue, "orbis stipple texture", pattern.texel_count(), &texels)
    }

    fn from_rgba8(device: &wgpu::Device, queue: &wgpu::Queue, label: &str, width: u32, texels: &[[u8; 4]]) -> Self {
        let size = wgpu::Extent3d {
            width,
            height: 1,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(texels),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(1),
            },
            size,
        );

        // Dashes repeat along s; nearest keeps their edges crisp.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        Self {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            sampler,
        }
    }
}
