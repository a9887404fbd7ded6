//! Host-side mirror of the outline kernels in `shaders/outline.wgsl`.
//!
//! Drawing always goes through the GPU kernels. These functions evaluate the
//! same per-vertex and per-fragment formulas on the CPU for picking, bounds
//! estimation and validation. Keep them in sync with the WGSL.

use glam::{Vec2, Vec3, Vec4};

use crate::paint::Color;

use super::{OutlineUniforms, OutlineVertex};

/// Lower bound of the eye distance fed to the pixel-size model.
pub const MIN_EYE_DISTANCE: f32 = 0.01;

/// Arc length covered by one stipple texture cycle.
pub const STIPPLE_CYCLE_LENGTH: f32 = 10000.0;

/// Eye distance clamped to `[MIN_EYE_DISTANCE, camera_altitude]`.
///
/// Evaluated as `max(0.01, min(d, altitude))`, so an altitude below 0.01
/// yields 0.01.
#[inline]
pub fn effective_distance(eye: Vec3, pos: Vec3, camera_altitude: f32) -> f32 {
    MIN_EYE_DISTANCE.max((eye - pos).length().min(camera_altitude))
}

/// World-space outline width at `distance`.
#[inline]
pub fn pixel_size(outline_width: f32, pixel_size_factor: f32, pixel_size_offset: f32, distance: f32) -> f32 {
    outline_width * (pixel_size_factor * distance + pixel_size_offset)
}

/// Unit extrusion axis: the local outward direction re-orthogonalized
/// against the path tangent.
#[inline]
pub fn offset_axis(pos: Vec3, prev_pos: Vec3, next_pos: Vec3) -> Vec3 {
    let tangent = (next_pos - prev_pos).normalize();
    let outward = pos.normalize();
    let binormal = tangent.cross(outward).normalize();
    binormal.cross(tangent).normalize()
}

/// GLSL/WGSL `sign`: `-1`, `0` or `1`.
#[inline]
fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// World position of `vertex` after extrusion.
pub fn extrude(vertex: &OutlineVertex, u: &OutlineUniforms) -> Vec3 {
    let pos = vertex.position();
    let axis = offset_axis(pos, vertex.previous(), vertex.next());
    let distance = effective_distance(u.eye_position, pos, u.camera_altitude);
    let size = pixel_size(u.outline_width, u.pixel_size_factor, u.pixel_size_offset, distance);
    pos + axis * (sign(vertex.direction) * 0.5 * size)
}

/// Forces `z <= w`.
#[inline]
pub fn clamp_depth(clip: Vec4) -> Vec4 {
    Vec4::new(clip.x, clip.y, clip.z.min(clip.w), clip.w)
}

/// Stipple texture coordinate for a vertex `direction`.
#[inline]
pub fn stipple_coord(direction: f32) -> Vec2 {
    Vec2::new(direction.abs() / STIPPLE_CYCLE_LENGTH, 0.5)
}

/// Output of the vertex stage for one vertex.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProjectedVertex {
    pub clip: Vec4,
    pub tex_coord: Vec2,
}

/// Full vertex stage: extrude, project, clamp depth, stipple coordinate.
pub fn project(vertex: &OutlineVertex, u: &OutlineUniforms) -> ProjectedVertex {
    let world = extrude(vertex, u);
    let clip = u.model_view_projection * world.extend(1.0);
    ProjectedVertex {
        clip: clamp_depth(clip),
        tex_coord: stipple_coord(vertex.direction),
    }
}

/// Fragment stage: the stipple texel modulates the color when texturing is on.
#[inline]
pub fn composite(u: &OutlineUniforms, texel: Color) -> Color {
    if u.texture_enabled {
        texel.modulate(u.color)
    } else {
        u.color
    }
}
