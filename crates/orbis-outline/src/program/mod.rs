//! GPU program plumbing.
//!
//! This module is responsible for:
//! - compiling WGSL kernel pairs and reflecting their interface (naga)
//! - the `ProgramContext` seam implemented by graphics backends
//! - name-based attribute/uniform location lookup (`GpuProgram`)
//! - caching compiled program resources under explicit keys

mod cache;
mod context;
mod error;
mod gpu_program;
mod reflect;
mod source;
mod uniform;

#[cfg(test)]
pub(crate) mod recording;

pub use cache::{ProgramCache, ProgramKey};
pub use context::ProgramContext;
pub use error::ProgramError;
pub use gpu_program::GpuProgram;
pub use reflect::{AttributeSlot, BindingKind, BindingSlot, ProgramLayout, UniformSlot};
pub use source::{ProgramSource, ShaderModule};
pub use uniform::{AttributeFormat, UniformKind, UniformLocation, UniformValue};
