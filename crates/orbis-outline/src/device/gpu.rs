use anyhow::{Context, Result};

use crate::render::RenderCtx;

use super::init::GpuInit;
use super::target::{OffscreenDesc, OffscreenTarget};

/// Owns wgpu core objects for offscreen rendering.
///
/// - creates and stores Instance/Adapter/Device/Queue
/// - allocates offscreen targets
/// - provides encoders and submits them
pub struct Gpu {
    /// Kept alive for the adapter's lifetime.
    _instance: wgpu::Instance,

    /// Selected adapter.
    adapter: wgpu::Adapter,

    /// Logical device.
    device: wgpu::Device,

    /// Command queue.
    queue: wgpu::Queue,
}

impl Gpu {
    /// Creates a GPU context with no surface.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new_headless(init: GpuInit) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: None,
                force_fallback_adapter: init.force_fallback_adapter,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let info = adapter.get_info();
        log::info!("using adapter `{}` ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("orbis device"),
                required_features: init.required_features,
                required_limits: init.required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        Ok(Gpu {
            _instance: instance,
            adapter,
            device,
            queue,
        })
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    #[inline]
    pub fn render_ctx(&self) -> RenderCtx<'_> {
        RenderCtx::new(&self.device, &self.queue)
    }

    /// Allocates an offscreen color target (plus depth when requested).
    pub fn create_target(&self, desc: &OffscreenDesc) -> Result<OffscreenTarget> {
        OffscreenTarget::new(&self.device, desc)
    }

    pub fn create_encoder(&self, label: &str) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) })
    }

    /// Submits the recorded commands.
    pub fn submit(&self, encoder: wgpu::CommandEncoder) {
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Copies the color texture of `target` back to the host, row-major.
    ///
    /// Blocks until the GPU finished all submitted work. Only 8-bit RGBA
    /// targets are supported.
    pub fn read_rgba8(&self, target: &OffscreenTarget) -> Result<Vec<[u8; 4]>> {
        let desc = target.desc();
        anyhow::ensure!(
            matches!(
                desc.color_format,
                wgpu::TextureFormat::Rgba8Unorm | wgpu::TextureFormat::Rgba8UnormSrgb
            ),
            "readback of {:?} targets is not supported",
            desc.color_format
        );

        let row_bytes = desc.width * 4;
        let padded_row_bytes = row_bytes.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
            * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("orbis readback buffer"),
            size: (padded_row_bytes * desc.height) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self.create_encoder("orbis readback encoder");
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: target.color_texture(),
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row_bytes),
                    rows_per_image: Some(desc.height),
                },
            },
            wgpu::Extent3d {
                width: desc.width,
                height: desc.height,
                depth_or_array_layers: 1,
            },
        );
        self.submit(encoder);

        let slice = buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |res| {
            let _ = tx.send(res);
        });
        self.device
            .poll(wgpu::PollType::wait_indefinitely())
            .context("failed to wait for readback")?;
        rx.recv()
            .context("readback callback dropped")?
            .context("failed to map readback buffer")?;

        let pixels = {
            let data = slice.get_mapped_range();
            data.chunks(padded_row_bytes as usize)
                .flat_map(|row| {
                    row[..row_bytes as usize]
                        .chunks_exact(4)
                        .map(|p| [p[0], p[1], p[2], p[3]])
                })
                .collect()
        };
        buffer.unmap();

        Ok(pixels)
    }
}
