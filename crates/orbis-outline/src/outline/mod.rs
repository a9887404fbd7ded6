//! Globe surface-shape outlines.
//!
//! This module is responsible for:
//! - the embedded outline kernel pair and its compiled resource
//! - the vertex record the kernels consume, and strips built from polylines
//! - per-draw uniform snapshots and the pixel-size model
//! - stipple mask generation
//!
//! The width of an outline stays constant in screen pixels: each vertex is
//! pushed sideways by half of `outline_width * (factor * distance + offset)`,
//! with the eye distance capped by the camera altitude.

mod geometry;
pub mod kernel;
mod resource;
mod stipple;
mod uniforms;
mod vertex;

pub use geometry::{OutlinePath, START_ARC_LENGTH};
pub use resource::{OUTLINE_PROGRAM, OutlineAttributeLocations, OutlineShaderResource, OutlineUniformLocations};
pub use stipple::StipplePattern;
pub use uniforms::{OutlineUniforms, PixelSizeModel};
pub use vertex::OutlineVertex;

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec3, Vec4Swizzles};

    use super::*;
    use crate::paint::Color;
    use crate::program::recording::RecordingContext;
    use crate::program::{ProgramCache, ProgramError, ProgramKey, UniformValue};

    #[test]
    fn red_segment_renders_red_ribbon() {
        let mut ctx = RecordingContext::new();
        let resource = OutlineShaderResource::new(&mut ctx).unwrap();

        let red = Color::from_premul(1.0, 0.0, 0.0, 1.0);
        let u = OutlineUniforms {
            model_view_projection: Mat4::IDENTITY,
            eye_position: Vec3::new(0.0, 0.0, 2.0),
            camera_altitude: 10.0,
            outline_width: 2.0,
            pixel_size_factor: 0.01,
            color: red,
            texture_enabled: false,
            ..Default::default()
        };
        u.apply(&resource, &mut ctx).unwrap();
        assert_eq!(ctx.last_upload(resource.uniform_locations().color), Some(UniformValue::Vec4([1.0, 0.0, 0.0, 1.0])));

        let a = Vec3::new(-0.5, 0.0, 0.5);
        let b = Vec3::new(0.5, 0.0, 0.5);
        let strip = OutlinePath::open([a, b]).strip_vertices();
        assert_eq!(strip.len(), 4);

        let projected: Vec<_> = strip.iter().map(|v| kernel::project(v, &u)).collect();
        for pair in projected.chunks(2) {
            let (l, r) = (pair[0].clip.xyz(), pair[1].clip.xyz());
            assert!(l.z <= pair[0].clip.w && r.z <= pair[1].clip.w);
            // ribbon spans the extrusion axis, centered on the path
            assert!((l - r).length() > 0.0);
            assert!(((l + r) * 0.5).y.abs() < 1e-6);
        }

        // texturing off: the stipple sample is ignored
        assert_eq!(kernel::composite(&u, Color::transparent()), red);
    }

    #[test]
    fn cache_builds_resource_once() {
        let mut ctx = RecordingContext::new();
        let mut cache = ProgramCache::new();
        let key = ProgramKey::new("outline");

        for _ in 0..3 {
            let res = cache
                .get_or_try_insert_with::<ProgramError>(key.clone(), || OutlineShaderResource::new(&mut ctx))
                .unwrap();
            assert_eq!(res.attribute_locations().pos, 0);
        }

        assert_eq!(ctx.links, 1);
        assert_eq!(cache.len(), 1);
    }
}
