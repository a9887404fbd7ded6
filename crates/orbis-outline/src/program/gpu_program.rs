use super::context::ProgramContext;
use super::error::ProgramError;
use super::reflect::ProgramLayout;
use super::source::ProgramSource;
use super::uniform::UniformLocation;

/// Compiled + linked program with name-based location lookup.
///
/// Program resources hold one of these rather than re-implementing
/// compile/link and location resolution.
#[derive(Debug)]
pub struct GpuProgram<P> {
    label: &'static str,
    handle: P,
    layout: ProgramLayout,
}

impl<P> GpuProgram<P> {
    /// Compiles and links `source` through `ctx`.
    pub fn build<C>(ctx: &mut C, source: &ProgramSource) -> Result<Self, ProgramError>
    where
        C: ProgramContext<Program = P>,
    {
        let module = ctx.compile_shader(source)?;
        let layout = module.layout().clone();
        let handle = ctx.link_program(module)?;

        log::debug!(
            "linked program `{}`: {} attributes, {} uniforms, stride {}",
            source.label,
            layout.attributes().len(),
            layout.uniforms().len(),
            layout.vertex_stride(),
        );

        Ok(Self {
            label: source.label,
            handle,
            layout,
        })
    }

    /// Shader location of the vertex attribute `name`.
    pub fn attribute_location(&self, name: &str) -> Result<u32, ProgramError> {
        self.layout
            .attribute(name)
            .map(|a| a.location)
            .ok_or_else(|| ProgramError::compilation(self.label, format!("attribute `{name}` not found")))
    }

    /// Location of the uniform block member `name`.
    pub fn uniform_location(&self, name: &str) -> Result<UniformLocation, ProgramError> {
        self.layout
            .uniform(name)
            .ok_or_else(|| ProgramError::compilation(self.label, format!("uniform `{name}` not found")))
    }

    #[inline]
    pub fn label(&self) -> &'static str {
        self.label
    }

    #[inline]
    pub fn handle(&self) -> &P {
        &self.handle
    }

    #[inline]
    pub fn layout(&self) -> &ProgramLayout {
        &self.layout
    }
}
