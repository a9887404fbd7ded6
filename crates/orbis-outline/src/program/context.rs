use super::error::ProgramError;
use super::source::{ProgramSource, ShaderModule};
use super::uniform::{UniformLocation, UniformValue};

/// Graphics context able to build and configure GPU programs.
///
/// Implemented by [`crate::backend::WgpuContext`]. Uniform uploads take
/// `&mut self`: a context is a single submission queue and uniform state is
/// not double-buffered, so setting uniforms and issuing the dependent draw
/// must not interleave with another caller.
pub trait ProgramContext {
    /// Linked program handle. Immutable once linked.
    type Program;

    /// Compiles and reflects the kernel pair.
    fn compile_shader(&mut self, source: &ProgramSource) -> Result<ShaderModule, ProgramError> {
        ShaderModule::compile(source)
    }

    /// Links a compiled module into a usable program.
    fn link_program(&mut self, module: ShaderModule) -> Result<Self::Program, ProgramError>;

    /// Uploads one uniform value. No validation beyond the type tag.
    fn set_uniform(&mut self, program: &Self::Program, location: UniformLocation, value: UniformValue);
}
