use naga::valid::{Capabilities, ValidationFlags, Validator};

use super::error::ProgramError;
use super::reflect::{self, ProgramLayout};

/// Embedded kernel pair: one WGSL module with a vertex and a fragment entry point.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ProgramSource {
    pub label: &'static str,
    pub wgsl: &'static str,
    pub vertex_entry: &'static str,
    pub fragment_entry: &'static str,
    /// Int uniform whose value selects the texture unit sampled by the program.
    pub texture_unit_uniform: Option<&'static str>,
}

/// WGSL that passed parsing, validation and interface reflection.
#[derive(Debug, Clone)]
pub struct ShaderModule {
    source: ProgramSource,
    layout: ProgramLayout,
}

impl ShaderModule {
    /// Compiles `source` with naga, the same front end + validator wgpu runs.
    pub fn compile(source: &ProgramSource) -> Result<Self, ProgramError> {
        let module = naga::front::wgsl::parse_str(source.wgsl)
            .map_err(|e| ProgramError::compilation(source.label, e.emit_to_string(source.wgsl)))?;

        Validator::new(ValidationFlags::all(), Capabilities::default())
            .validate(&module)
            .map_err(|e| ProgramError::compilation(source.label, e.emit_to_string(source.wgsl)))?;

        let layout = reflect::reflect(&module, source.vertex_entry, source.fragment_entry)
            .map_err(|msg| ProgramError::compilation(source.label, msg))?;

        Ok(Self { source: *source, layout })
    }

    pub fn source(&self) -> &ProgramSource {
        &self.source
    }

    pub fn layout(&self) -> &ProgramLayout {
        &self.layout
    }
}
