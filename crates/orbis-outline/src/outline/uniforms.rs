use glam::{Mat4, Vec3};

use crate::paint::Color;
use crate::program::{ProgramContext, ProgramError};

use super::OutlineShaderResource;

/// Per-draw uniform state for the outline program.
///
/// Transient: build it right before a draw and [`apply`](Self::apply) it.
/// The resource never keeps a copy.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OutlineUniforms {
    pub model_view_projection: Mat4,
    pub eye_position: Vec3,
    pub pixel_size_factor: f32,
    pub pixel_size_offset: f32,
    /// Outline width in pixels.
    pub outline_width: f32,
    /// Ceiling for the eye distance used to size the outline.
    pub camera_altitude: f32,
    /// Uploaded but unused by the kernels.
    pub stipple_factor: f32,
    pub color: Color,
    pub texture_enabled: bool,
    pub texture_unit: u32,
}

impl Default for OutlineUniforms {
    fn default() -> Self {
        Self {
            model_view_projection: Mat4::IDENTITY,
            eye_position: Vec3::ZERO,
            pixel_size_factor: 0.0,
            pixel_size_offset: 0.0,
            outline_width: 1.0,
            camera_altitude: f32::MAX,
            stipple_factor: 0.0,
            color: Color::white(),
            texture_enabled: false,
            texture_unit: 0,
        }
    }
}

impl OutlineUniforms {
    /// Sets the pixel-size coefficients from a projection model.
    #[inline]
    pub fn with_pixel_size(mut self, model: PixelSizeModel) -> Self {
        self.pixel_size_factor = model.factor;
        self.pixel_size_offset = model.offset;
        self
    }

    /// Uploads every field through `resource`'s setters.
    pub fn apply<C, P>(&self, resource: &OutlineShaderResource<P>, ctx: &mut C) -> Result<(), ProgramError>
    where
        C: ProgramContext<Program = P>,
    {
        resource.set_model_view_projection(ctx, Some(&self.model_view_projection))?;
        resource.set_eye_position(ctx, self.eye_position);
        resource.set_pixel_size_factor(ctx, self.pixel_size_factor);
        resource.set_pixel_size_offset(ctx, self.pixel_size_offset);
        resource.set_outline_width(ctx, self.outline_width);
        resource.set_camera_altitude(ctx, self.camera_altitude);
        resource.set_stipple_factor(ctx, self.stipple_factor);
        resource.set_color(ctx, Some(&self.color))?;
        resource.set_texture_enabled(ctx, self.texture_enabled);
        resource.set_texture_unit(ctx, self.texture_unit);
        Ok(())
    }
}

/// Linear model of the world-space size of one pixel at a given eye distance:
/// `pixel_size(d) = factor * d + offset`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PixelSizeModel {
    pub factor: f32,
    pub offset: f32,
}

impl PixelSizeModel {
    /// Perspective projection: the frustum height at distance `d` is
    /// `2 d tan(fov_y / 2)`, spread over `viewport_height` pixels.
    pub fn perspective(fov_y_radians: f32, viewport_height: f32) -> Self {
        let height = viewport_height.max(1.0);
        Self {
            factor: 2.0 * (0.5 * fov_y_radians).tan() / height,
            offset: 0.0,
        }
    }

    /// Orthographic projection: pixel size does not depend on distance.
    pub fn orthographic(frustum_height: f32, viewport_height: f32) -> Self {
        Self {
            factor: 0.0,
            offset: frustum_height / viewport_height.max(1.0),
        }
    }

    #[inline]
    pub fn pixel_size_at(self, distance: f32) -> f32 {
        self.factor * distance + self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::UniformValue;
    use crate::program::recording::RecordingContext;

    #[test]
    fn perspective_pixel_spans_frustum_height() {
        let fov = std::f32::consts::FRAC_PI_2; // tan(45°) = 1
        let model = PixelSizeModel::perspective(fov, 1000.0);
        // frustum height at d=500 is 1000 units over 1000 px
        assert!((model.pixel_size_at(500.0) - 1.0).abs() < 1e-5);
        assert_eq!(model.offset, 0.0);
    }

    #[test]
    fn orthographic_pixel_is_constant() {
        let model = PixelSizeModel::orthographic(200.0, 100.0);
        assert_eq!(model.pixel_size_at(1.0), 2.0);
        assert_eq!(model.pixel_size_at(1.0e6), 2.0);
    }

    #[test]
    fn zero_viewport_height_does_not_divide_by_zero() {
        assert!(PixelSizeModel::perspective(1.0, 0.0).factor.is_finite());
        assert!(PixelSizeModel::orthographic(1.0, 0.0).offset.is_finite());
    }

    #[test]
    fn apply_uploads_every_uniform_once() {
        let mut ctx = RecordingContext::new();
        let res = OutlineShaderResource::new(&mut ctx).unwrap();
        let snapshot = OutlineUniforms {
            outline_width: 3.0,
            texture_enabled: true,
            texture_unit: 1,
            ..Default::default()
        }
        .with_pixel_size(PixelSizeModel { factor: 0.25, offset: 0.5 });

        snapshot.apply(&res, &mut ctx).unwrap();

        assert_eq!(ctx.uploads.len(), 10);
        let u = res.uniform_locations();
        assert_eq!(ctx.last_upload(u.outline_width), Some(UniformValue::Float(3.0)));
        assert_eq!(ctx.last_upload(u.pixel_size_factor), Some(UniformValue::Float(0.25)));
        assert_eq!(ctx.last_upload(u.pixel_size_offset), Some(UniformValue::Float(0.5)));
        assert_eq!(ctx.last_upload(u.texture_enabled), Some(UniformValue::Int(1)));
        assert_eq!(ctx.last_upload(u.texture_unit), Some(UniformValue::Int(1)));
        assert_eq!(ctx.last_upload(u.mvp_matrix), Some(UniformValue::Mat4(Mat4::IDENTITY.to_cols_array())));
    }
}
