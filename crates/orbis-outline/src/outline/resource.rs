use glam::{Mat4, Vec3};

use crate::paint::Color;
use crate::program::{
    GpuProgram, ProgramContext, ProgramError, ProgramSource, UniformLocation, UniformValue,
};

/// The fixed outline kernel pair.
pub const OUTLINE_PROGRAM: ProgramSource = ProgramSource {
    label: "orbis outline program",
    wgsl: include_str!("shaders/outline.wgsl"),
    vertex_entry: "vs_main",
    fragment_entry: "fs_main",
    texture_unit_uniform: Some("textureSampler"),
};

const COMPONENT: &str = "OutlineShaderResource";

/// Resolved vertex attribute locations.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OutlineAttributeLocations {
    pub pos: u32,
    pub prev_pos: u32,
    pub next_pos: u32,
    pub direction: u32,
}

/// Resolved uniform locations.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OutlineUniformLocations {
    pub mvp_matrix: UniformLocation,
    pub eye_position: UniformLocation,
    pub pixel_size_factor: UniformLocation,
    pub pixel_size_offset: UniformLocation,
    pub outline_width: UniformLocation,
    pub camera_altitude: UniformLocation,
    pub stipple_factor: UniformLocation,
    pub color: UniformLocation,
    pub texture_enabled: UniformLocation,
    pub texture_unit: UniformLocation,
}

/// Compiled outline program plus its location table.
///
/// Built once and reused across draws; the resource itself never changes
/// after construction and keeps no uniform state. Each setter uploads
/// exactly one uniform through the context it is given.
///
/// Only [`set_model_view_projection`](Self::set_model_view_projection) and
/// [`set_color`](Self::set_color) validate their input. The other setters
/// accept any value, including non-finite ones; bad values only produce
/// wrong pixels.
#[derive(Debug)]
pub struct OutlineShaderResource<P> {
    program: GpuProgram<P>,
    attributes: OutlineAttributeLocations,
    uniforms: OutlineUniformLocations,
}

impl<P> OutlineShaderResource<P> {
    /// Compiles and links the outline kernels and resolves every location.
    pub fn new<C>(ctx: &mut C) -> Result<Self, ProgramError>
    where
        C: ProgramContext<Program = P>,
    {
        let program = GpuProgram::build(ctx, &OUTLINE_PROGRAM)?;

        let attributes = OutlineAttributeLocations {
            pos: program.attribute_location("pos")?,
            prev_pos: program.attribute_location("prevPos")?,
            next_pos: program.attribute_location("nextPos")?,
            direction: program.attribute_location("direction")?,
        };

        let uniforms = OutlineUniformLocations {
            mvp_matrix: program.uniform_location("mvpMatrix")?,
            eye_position: program.uniform_location("eyePos")?,
            pixel_size_factor: program.uniform_location("pixelSizeFactor")?,
            pixel_size_offset: program.uniform_location("pixelSizeOffset")?,
            outline_width: program.uniform_location("outlineWidth")?,
            camera_altitude: program.uniform_location("cameraAltitude")?,
            stipple_factor: program.uniform_location("stippleFactor")?,
            color: program.uniform_location("color")?,
            texture_enabled: program.uniform_location("enableTexture")?,
            texture_unit: program.uniform_location("textureSampler")?,
        };

        log::debug!("{COMPONENT}: program `{}` ready", program.label());

        Ok(Self {
            program,
            attributes,
            uniforms,
        })
    }

    #[inline]
    pub fn program(&self) -> &GpuProgram<P> {
        &self.program
    }

    #[inline]
    pub fn attribute_locations(&self) -> &OutlineAttributeLocations {
        &self.attributes
    }

    #[inline]
    pub fn uniform_locations(&self) -> &OutlineUniformLocations {
        &self.uniforms
    }

    // ── validated setters ─────────────────────────────────────────────────

    /// Uploads the model-view-projection matrix.
    pub fn set_model_view_projection<C>(&self, ctx: &mut C, matrix: Option<&Mat4>) -> Result<(), ProgramError>
    where
        C: ProgramContext<Program = P>,
    {
        let Some(matrix) = matrix else {
            return Err(ProgramError::missing_argument(COMPONENT, "set_model_view_projection", "matrix"));
        };
        self.upload(ctx, self.uniforms.mvp_matrix, UniformValue::Mat4(matrix.to_cols_array()));
        Ok(())
    }

    /// Uploads the outline color (premultiplied RGBA).
    pub fn set_color<C>(&self, ctx: &mut C, color: Option<&Color>) -> Result<(), ProgramError>
    where
        C: ProgramContext<Program = P>,
    {
        let Some(color) = color else {
            return Err(ProgramError::missing_argument(COMPONENT, "set_color", "color"));
        };
        self.upload(ctx, self.uniforms.color, UniformValue::Vec4(color.to_array()));
        Ok(())
    }

    // ── unvalidated setters ───────────────────────────────────────────────

    pub fn set_outline_width<C>(&self, ctx: &mut C, width: f32)
    where
        C: ProgramContext<Program = P>,
    {
        self.upload(ctx, self.uniforms.outline_width, UniformValue::Float(width));
    }

    pub fn set_pixel_size_factor<C>(&self, ctx: &mut C, factor: f32)
    where
        C: ProgramContext<Program = P>,
    {
        self.upload(ctx, self.uniforms.pixel_size_factor, UniformValue::Float(factor));
    }

    pub fn set_pixel_size_offset<C>(&self, ctx: &mut C, offset: f32)
    where
        C: ProgramContext<Program = P>,
    {
        self.upload(ctx, self.uniforms.pixel_size_offset, UniformValue::Float(offset));
    }

    pub fn set_eye_position<C>(&self, ctx: &mut C, eye: Vec3)
    where
        C: ProgramContext<Program = P>,
    {
        self.upload(ctx, self.uniforms.eye_position, UniformValue::Vec3(eye.to_array()));
    }

    /// Upper bound of the eye distance used to size the outline.
    pub fn set_camera_altitude<C>(&self, ctx: &mut C, altitude: f32)
    where
        C: ProgramContext<Program = P>,
    {
        self.upload(ctx, self.uniforms.camera_altitude, UniformValue::Float(altitude));
    }

    /// Uploads `stippleFactor`. The kernels currently ignore it: stipple
    /// coordinates use a fixed 1/10000 scale on arc length.
    pub fn set_stipple_factor<C>(&self, ctx: &mut C, factor: f32)
    where
        C: ProgramContext<Program = P>,
    {
        self.upload(ctx, self.uniforms.stipple_factor, UniformValue::Float(factor));
    }

    /// Selects the texture unit sampled for the stipple mask.
    ///
    /// The uniform is an `i32`; units above `i32::MAX` saturate to it.
    pub fn set_texture_unit<C>(&self, ctx: &mut C, unit: u32)
    where
        C: ProgramContext<Program = P>,
    {
        let unit = i32::try_from(unit).unwrap_or(i32::MAX);
        self.upload(ctx, self.uniforms.texture_unit, UniformValue::Int(unit));
    }

    pub fn set_texture_enabled<C>(&self, ctx: &mut C, enabled: bool)
    where
        C: ProgramContext<Program = P>,
    {
        self.upload(ctx, self.uniforms.texture_enabled, UniformValue::Int(enabled as i32));
    }

    #[inline]
    fn upload<C>(&self, ctx: &mut C, location: UniformLocation, value: UniformValue)
    where
        C: ProgramContext<Program = P>,
    {
        ctx.set_uniform(self.program.handle(), location, value);
    }
}
