use anyhow::{Context, Result};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use orbis_outline::backend::{PipelineConfig, WgpuContext};
use orbis_outline::device::{Gpu, GpuInit, OffscreenDesc};
use orbis_outline::logging::{init_logging, LoggingConfig};
use orbis_outline::outline::kernel::STIPPLE_CYCLE_LENGTH;
use orbis_outline::outline::{OutlinePath, OutlineShaderResource, OutlineUniforms, PixelSizeModel, StipplePattern};
use orbis_outline::paint::Color;
use orbis_outline::render::RenderTarget;

const EARTH_RADIUS: f32 = 6.371e6;
const VIEWPORT: u32 = 512;
const FOV_Y: f32 = std::f32::consts::FRAC_PI_4;

/// Camera height above the ring's center.
const ALTITUDE: f32 = 1.0e5;
const RING_RADIUS: f32 = 2.5e4;

const STIPPLE_UNIT: u32 = 0;
/// Eight steps on, eight off: 5 km dashes.
const DASH: StipplePattern = StipplePattern { factor: 1, pattern: 0x00FF };

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    pollster::block_on(run())
}

/// Renders a red, dashed ring on the globe surface into an offscreen target.
async fn run() -> Result<()> {
    let gpu = Gpu::new_headless(GpuInit {
        force_fallback_adapter: std::env::var_os("ORBIS_FALLBACK_ADAPTER").is_some(),
        ..Default::default()
    })
    .await?;

    let desc = OffscreenDesc {
        width: VIEWPORT,
        height: VIEWPORT,
        ..Default::default()
    };
    let target = gpu.create_target(&desc)?;

    let mut ctx = WgpuContext::new(
        gpu.render_ctx(),
        PipelineConfig {
            color_format: desc.color_format,
            depth_format: desc.depth_format,
            sample_count: 1,
        },
    );
    let resource = OutlineShaderResource::new(&mut ctx).context("failed to build outline program")?;

    let center = Vec3::Z * EARTH_RADIUS;
    let eye = Vec3::Z * (EARTH_RADIUS + ALTITUDE);
    let view = Mat4::look_at_rh(eye, center, Vec3::Y);
    let proj = Mat4::perspective_rh(FOV_Y, 1.0, 1.0e3, 2.0 * EARTH_RADIUS);

    let ring = OutlinePath::closed((0..64).map(|i| {
        let a = i as f32 / 64.0 * std::f32::consts::TAU;
        let offset = Vec3::new(a.cos(), a.sin(), 0.0) * RING_RADIUS;
        (center + offset).normalize() * EARTH_RADIUS
    }));
    let vertices = ring.strip_vertices();
    log::info!("ring: {} vertices, {:.0} m long", vertices.len(), ring.length());

    let vertex_buffer = gpu.device().create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("orbis demo ring vbo"),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });

    ctx.upload_stipple(STIPPLE_UNIT, &DASH);
    log::info!("dashes span {:.0} px", dash_length_px());

    OutlineUniforms {
        model_view_projection: proj * view,
        eye_position: eye,
        outline_width: 3.0,
        camera_altitude: ALTITUDE,
        color: Color::from_straight(1.0, 0.0, 0.0, 1.0),
        texture_enabled: true,
        texture_unit: STIPPLE_UNIT,
        ..Default::default()
    }
    .with_pixel_size(PixelSizeModel::perspective(FOV_Y, VIEWPORT as f32))
    .apply(&resource, &mut ctx)?;

    let mut encoder = gpu.create_encoder("orbis demo encoder");
    target.clear(&mut encoder, Color::transparent());
    {
        let mut rt = RenderTarget::new(&mut encoder, target.color_view());
        if let Some(depth) = target.depth_view() {
            rt = rt.with_depth(depth);
        }
        ctx.draw_strip(resource.program().handle(), &mut rt, &vertex_buffer, 0..vertices.len() as u32);
    }
    gpu.submit(encoder);

    let pixels = gpu.read_rgba8(&target)?;
    let covered = pixels.iter().filter(|p| p[3] > 0).count();
    anyhow::ensure!(covered > 0, "outline covered no pixels");
    log::info!(
        "rendered outline into {}x{} offscreen target: {covered} pixels covered",
        desc.width,
        desc.height
    );
    Ok(())
}

/// Screen length of one dash of [`DASH`] at the ring.
fn dash_length_px() -> f32 {
    let step = STIPPLE_CYCLE_LENGTH / 16.0;
    let dash = step * DASH.pattern.trailing_ones() as f32;
    dash / PixelSizeModel::perspective(FOV_Y, VIEWPORT as f32).pixel_size_at(ALTITUDE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashes_span_several_pixels() {
        let px = dash_length_px();
        assert!(px > 8.0, "dash is only {px} px");
    }

    #[test]
    fn ring_fits_in_view() {
        let half_height = (0.5 * FOV_Y).tan() * ALTITUDE;
        assert!(RING_RADIUS < half_height);
    }
}
