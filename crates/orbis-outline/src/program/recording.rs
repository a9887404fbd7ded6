//! Test-only [`ProgramContext`] that records uniform uploads instead of
//! touching a GPU. Compilation still goes through naga.

use super::context::ProgramContext;
use super::error::ProgramError;
use super::reflect::ProgramLayout;
use super::source::ShaderModule;
use super::uniform::{UniformLocation, UniformValue};

#[derive(Debug)]
pub(crate) struct RecordedProgram {
    pub label: &'static str,
    pub layout: ProgramLayout,
}

#[derive(Debug, Default)]
pub(crate) struct RecordingContext {
    pub uploads: Vec<(UniformLocation, UniformValue)>,
    pub links: usize,
    pub fail_link: Option<&'static str>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value uploaded to `location`, if any.
    pub fn last_upload(&self, location: UniformLocation) -> Option<UniformValue> {
        self.uploads
            .iter()
            .rev()
            .find(|(loc, _)| *loc == location)
            .map(|(_, v)| *v)
    }
}

impl ProgramContext for RecordingContext {
    type Program = RecordedProgram;

    fn link_program(&mut self, module: ShaderModule) -> Result<RecordedProgram, ProgramError> {
        if let Some(reason) = self.fail_link {
            return Err(ProgramError::compilation(module.source().label, reason));
        }
        self.links += 1;
        Ok(RecordedProgram {
            label: module.source().label,
            layout: module.layout().clone(),
        })
    }

    fn set_uniform(&mut self, _program: &RecordedProgram, location: UniformLocation, value: UniformValue) {
        assert_eq!(location.kind, value.kind(), "uniform type mismatch");
        self.uploads.push((location, value));
    }
}
