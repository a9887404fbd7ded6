use anyhow::Result;

use crate::paint::Color;

/// Description of an offscreen render target.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OffscreenDesc {
    pub width: u32,
    pub height: u32,
    pub color_format: wgpu::TextureFormat,
    pub depth_format: Option<wgpu::TextureFormat>,
}

impl Default for OffscreenDesc {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            color_format: wgpu::TextureFormat::Rgba8UnormSrgb,
            depth_format: Some(wgpu::TextureFormat::Depth32Float),
        }
    }
}

/// Color texture (and optional depth texture) rendered to without a surface.
pub struct OffscreenTarget {
    desc: OffscreenDesc,
    color: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth: Option<(wgpu::Texture, wgpu::TextureView)>,
}

impl OffscreenTarget {
    pub(super) fn new(device: &wgpu::Device, desc: &OffscreenDesc) -> Result<Self> {
        anyhow::ensure!(desc.width > 0 && desc.height > 0, "offscreen target has zero size");

        let size = wgpu::Extent3d {
            width: desc.width,
            height: desc.height,
            depth_or_array_layers: 1,
        };

        let color = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("orbis offscreen color"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: desc.color_format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());

        let depth = desc.depth_format.map(|format| {
            let texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("orbis offscreen depth"),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            });
            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
            (texture, view)
        });

        log::debug!(
            "offscreen target {}x{} {:?} depth={:?}",
            desc.width,
            desc.height,
            desc.color_format,
            desc.depth_format
        );

        Ok(Self {
            desc: *desc,
            color,
            color_view,
            depth,
        })
    }

    #[inline]
    pub fn desc(&self) -> &OffscreenDesc {
        &self.desc
    }

    #[inline]
    pub fn color_texture(&self) -> &wgpu::Texture {
        &self.color
    }

    #[inline]
    pub fn color_view(&self) -> &wgpu::TextureView {
        &self.color_view
    }

    #[inline]
    pub fn depth_view(&self) -> Option<&wgpu::TextureView> {
        self.depth.as_ref().map(|(_, view)| view)
    }

    /// Records a pass clearing color to `clear` and depth to 1.
    pub fn clear(&self, encoder: &mut wgpu::CommandEncoder, clear: Color) {
        let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("orbis clear pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: clear.r as f64,
                        g: clear.g as f64,
                        b: clear.b as f64,
                        a: clear.a as f64,
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: self.depth_view().map(|view| wgpu::RenderPassDepthStencilAttachment {
                view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }
}
