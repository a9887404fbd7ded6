//! wgpu implementation of [`ProgramContext`](crate::program::ProgramContext).
//!
//! Linking turns a reflected [`ProgramLayout`](crate::program::ProgramLayout)
//! into a bind group layout, a uniform buffer and a triangle-strip render
//! pipeline. Textures are bound to numbered units; a program's texture-unit
//! uniform selects which unit its sampler reads at draw time.

mod config;
mod gpu_context;
mod layout;
mod texture;

pub use config::PipelineConfig;
pub use gpu_context::{WgpuContext, WgpuProgram};
pub use texture::BoundTexture;
