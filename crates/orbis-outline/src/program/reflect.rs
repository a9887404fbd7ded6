//! Interface reflection over a validated naga module.
//!
//! Produces the backend-neutral [`ProgramLayout`]: vertex attributes packed
//! into one interleaved buffer, uniform block members addressed by byte
//! offset, and the group-0 resource bindings.

use naga::{AddressSpace, Binding, Handle, ImageClass, ImageDimension, Scalar, ShaderStage, Type, TypeInner, VectorSize};

use super::uniform::{AttributeFormat, UniformKind, UniformLocation};

/// A vertex attribute resolved from the vertex entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSlot {
    pub name: String,
    pub location: u32,
    pub format: AttributeFormat,
    /// Byte offset inside the interleaved vertex record.
    pub offset: u32,
}

/// A uniform block member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformSlot {
    pub name: String,
    pub location: UniformLocation,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BindingKind {
    UniformBlock { size: u32 },
    Texture2d,
    Sampler,
}

/// A resource binding in bind group 0.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BindingSlot {
    pub binding: u32,
    pub kind: BindingKind,
}

/// Reflected program interface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramLayout {
    attributes: Vec<AttributeSlot>,
    vertex_stride: u32,
    uniforms: Vec<UniformSlot>,
    bindings: Vec<BindingSlot>,
}

impl ProgramLayout {
    /// Attributes sorted by shader location.
    pub fn attributes(&self) -> &[AttributeSlot] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeSlot> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Stride of the interleaved vertex record.
    pub fn vertex_stride(&self) -> u32 {
        self.vertex_stride
    }

    pub fn uniforms(&self) -> &[UniformSlot] {
        &self.uniforms
    }

    pub fn uniform(&self, name: &str) -> Option<UniformLocation> {
        self.uniforms.iter().find(|u| u.name == name).map(|u| u.location)
    }

    /// Group-0 bindings sorted by binding index.
    pub fn bindings(&self) -> &[BindingSlot] {
        &self.bindings
    }

    pub fn uniform_block_size(&self) -> Option<u32> {
        self.bindings.iter().find_map(|b| match b.kind {
            BindingKind::UniformBlock { size } => Some(size),
            _ => None,
        })
    }
}

/// Reflects the interface of `vertex_entry` + `fragment_entry`.
///
/// Also performs the inter-stage "link" check: every fragment input location
/// must be written by the vertex stage with the same type.
pub(crate) fn reflect(
    module: &naga::Module,
    vertex_entry: &str,
    fragment_entry: &str,
) -> Result<ProgramLayout, String> {
    let vs = find_entry_point(module, vertex_entry, ShaderStage::Vertex)?;
    let fs = find_entry_point(module, fragment_entry, ShaderStage::Fragment)?;

    // ── vertex attributes ─────────────────────────────────────────────────

    let inputs = vs
        .function
        .arguments
        .iter()
        .map(|arg| (arg.name.as_deref(), arg.ty, arg.binding.as_ref()));
    let mut located = located_members(module, inputs);
    located.sort_by_key(|m| m.location);

    let mut attributes = Vec::with_capacity(located.len());
    let mut offset = 0u32;
    for m in located {
        let name = m.name.ok_or_else(|| format!("unnamed vertex input at location {}", m.location))?;
        let format = attribute_format(&module.types[m.ty].inner)
            .ok_or_else(|| format!("vertex input `{name}` has an unsupported type"))?;
        attributes.push(AttributeSlot {
            name: name.to_owned(),
            location: m.location,
            format,
            offset,
        });
        offset += format.size();
    }

    // ── inter-stage interface ─────────────────────────────────────────────

    let outputs = match &vs.function.result {
        Some(result) => located_members(module, std::iter::once((None, result.ty, result.binding.as_ref()))),
        None => Vec::new(),
    };
    let fs_inputs = fs
        .function
        .arguments
        .iter()
        .map(|arg| (arg.name.as_deref(), arg.ty, arg.binding.as_ref()));
    for input in located_members(module, fs_inputs) {
        let Some(output) = outputs.iter().find(|o| o.location == input.location) else {
            return Err(format!(
                "fragment input location {} is not written by `{vertex_entry}`",
                input.location
            ));
        };
        if module.types[output.ty].inner != module.types[input.ty].inner {
            return Err(format!(
                "stage interface type mismatch at location {}",
                input.location
            ));
        }
    }

    // ── resource bindings ─────────────────────────────────────────────────

    let mut uniforms = Vec::new();
    let mut bindings = Vec::new();
    for (_, var) in module.global_variables.iter() {
        let Some(rb) = var.binding.as_ref() else { continue };
        let var_name = var.name.as_deref().unwrap_or("<unnamed>");
        if rb.group != 0 {
            return Err(format!("binding `{var_name}` uses group {}; only group 0 is supported", rb.group));
        }

        let inner = &module.types[var.ty].inner;
        let kind = match var.space {
            AddressSpace::Uniform => {
                if bindings.iter().any(|b: &BindingSlot| matches!(b.kind, BindingKind::UniformBlock { .. })) {
                    return Err("more than one uniform block".to_owned());
                }
                let TypeInner::Struct { members, span } = inner else {
                    return Err(format!("uniform `{var_name}` must be a struct"));
                };
                for member in members {
                    let name = member.name.as_deref().ok_or("unnamed uniform member")?;
                    let kind = uniform_kind(&module.types[member.ty].inner)
                        .ok_or_else(|| format!("uniform `{name}` has an unsupported type"))?;
                    uniforms.push(UniformSlot {
                        name: name.to_owned(),
                        location: UniformLocation::new(member.offset, kind),
                    });
                }
                BindingKind::UniformBlock { size: *span }
            }
            AddressSpace::Handle => match inner {
                TypeInner::Image {
                    dim: ImageDimension::D2,
                    arrayed: false,
                    class: ImageClass::Sampled { kind: naga::ScalarKind::Float, multi: false },
                } => BindingKind::Texture2d,
                TypeInner::Sampler { comparison: false } => BindingKind::Sampler,
                _ => return Err(format!("binding `{var_name}` has an unsupported handle type")),
            },
            _ => return Err(format!("binding `{var_name}` uses an unsupported address space")),
        };
        bindings.push(BindingSlot { binding: rb.binding, kind });
    }
    bindings.sort_by_key(|b| b.binding);

    Ok(ProgramLayout {
        attributes,
        vertex_stride: offset,
        uniforms,
        bindings,
    })
}

fn find_entry_point<'m>(
    module: &'m naga::Module,
    name: &str,
    stage: ShaderStage,
) -> Result<&'m naga::EntryPoint, String> {
    module
        .entry_points
        .iter()
        .find(|ep| ep.name == name && ep.stage == stage)
        .ok_or_else(|| format!("{stage:?} entry point `{name}` not found"))
}

struct Located<'m> {
    name: Option<&'m str>,
    location: u32,
    ty: Handle<Type>,
}

/// Flattens arguments/results into `@location` members, looking through
/// structs. Builtins are dropped.
fn located_members<'m>(
    module: &'m naga::Module,
    items: impl Iterator<Item = (Option<&'m str>, Handle<Type>, Option<&'m Binding>)>,
) -> Vec<Located<'m>> {
    let mut out = Vec::new();
    for (name, ty, binding) in items {
        match binding {
            Some(Binding::Location { location, .. }) => out.push(Located { name, location: *location, ty }),
            Some(Binding::BuiltIn(_)) => {}
            None => {
                if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                    for m in members {
                        if let Some(Binding::Location { location, .. }) = &m.binding {
                            out.push(Located {
                                name: m.name.as_deref(),
                                location: *location,
                                ty: m.ty,
                            });
                        }
                    }
                }
            }
        }
    }
    out
}

fn attribute_format(inner: &TypeInner) -> Option<AttributeFormat> {
    match *inner {
        TypeInner::Scalar(s) if s == Scalar::F32 => Some(AttributeFormat::Float),
        TypeInner::Vector { size, scalar } if scalar == Scalar::F32 => Some(match size {
            VectorSize::Bi => AttributeFormat::Vec2,
            VectorSize::Tri => AttributeFormat::Vec3,
            VectorSize::Quad => AttributeFormat::Vec4,
        }),
        _ => None,
    }
}

fn uniform_kind(inner: &TypeInner) -> Option<UniformKind> {
    match *inner {
        TypeInner::Scalar(s) if s == Scalar::F32 => Some(UniformKind::Float),
        TypeInner::Scalar(s) if s == Scalar::I32 => Some(UniformKind::Int),
        TypeInner::Vector { size, scalar } if scalar == Scalar::F32 => Some(match size {
            VectorSize::Bi => UniformKind::Vec2,
            VectorSize::Tri => UniformKind::Vec3,
            VectorSize::Quad => UniformKind::Vec4,
        }),
        TypeInner::Matrix {
            columns: VectorSize::Quad,
            rows: VectorSize::Quad,
            scalar,
        } if scalar == Scalar::F32 => Some(UniformKind::Mat4),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> naga::Module {
        naga::front::wgsl::parse_str(src).expect("test shader parses")
    }

    const MINIMAL: &str = r#"
struct U {
    tint: vec4<f32>,
    scale: f32,
    mode: i32,
};
@group(0) @binding(0) var<uniform> u: U;

struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@location(1) weight: f32, @location(0) p: vec3<f32>) -> VsOut {
    var out: VsOut;
    out.clip = vec4<f32>(p * u.scale * weight, 1.0);
    out.uv = p.xy;
    return out;
}

@fragment
fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
    return u.tint * uv.x;
}
"#;

    #[test]
    fn attributes_are_packed_in_location_order() {
        let layout = reflect(&parse(MINIMAL), "vs_main", "fs_main").unwrap();
        let names: Vec<_> = layout.attributes().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["p", "weight"]);
        assert_eq!(layout.attribute("weight").unwrap().offset, 12);
        assert_eq!(layout.vertex_stride(), 16);
    }

    #[test]
    fn uniform_members_resolve_to_offsets() {
        let layout = reflect(&parse(MINIMAL), "vs_main", "fs_main").unwrap();
        assert_eq!(layout.uniform("tint"), Some(UniformLocation::new(0, UniformKind::Vec4)));
        assert_eq!(layout.uniform("scale"), Some(UniformLocation::new(16, UniformKind::Float)));
        assert_eq!(layout.uniform("mode"), Some(UniformLocation::new(20, UniformKind::Int)));
        assert_eq!(layout.uniform("missing"), None);
        assert_eq!(layout.uniform_block_size(), Some(32));
    }

    #[test]
    fn unknown_entry_point_is_rejected() {
        let err = reflect(&parse(MINIMAL), "vs_nope", "fs_main").unwrap_err();
        assert!(err.contains("vs_nope"), "{err}");
    }

    #[test]
    fn unwritten_fragment_input_fails_link() {
        let src = r#"
@vertex
fn vs_main(@location(0) p: vec3<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(p, 1.0);
}

@fragment
fn fs_main(@location(3) c: vec4<f32>) -> @location(0) vec4<f32> {
    return c;
}
"#;
        let err = reflect(&parse(src), "vs_main", "fs_main").unwrap_err();
        assert!(err.contains("location 3"), "{err}");
    }

    #[test]
    fn texture_and_sampler_bindings_are_listed() {
        let src = r#"
@group(0) @binding(2) var s: sampler;
@group(0) @binding(1) var t: texture_2d<f32>;

@vertex
fn vs_main(@location(0) p: vec2<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(p, 0.0, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return textureSample(t, s, vec2<f32>(0.5, 0.5));
}
"#;
        let layout = reflect(&parse(src), "vs_main", "fs_main").unwrap();
        assert_eq!(
            layout.bindings(),
            &[
                BindingSlot { binding: 1, kind: BindingKind::Texture2d },
                BindingSlot { binding: 2, kind: BindingKind::Sampler },
            ]
        );
        assert_eq!(layout.uniform_block_size(), None);
    }
}
