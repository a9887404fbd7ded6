/// Render target description every linked pipeline is built against.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub color_format: wgpu::TextureFormat,

    /// Enables the depth test (`LessEqual`, depth writes on) when set.
    pub depth_format: Option<wgpu::TextureFormat>,

    pub sample_count: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            color_format: wgpu::TextureFormat::Rgba8UnormSrgb,
            depth_format: Some(wgpu::TextureFormat::Depth32Float),
            sample_count: 1,
        }
    }
}

impl PipelineConfig {
    pub(super) fn depth_stencil(&self) -> Option<wgpu::DepthStencilState> {
        self.depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        })
    }

    pub(super) fn multisample(&self) -> wgpu::MultisampleState {
        wgpu::MultisampleState {
            count: self.sample_count.max(1),
            ..Default::default()
        }
    }
}
