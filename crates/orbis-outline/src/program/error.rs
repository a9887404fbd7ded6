use std::fmt;

/// Host-visible failures of a GPU program resource.
///
/// Numeric misuse of the unvalidated setters is not represented here: it is
/// accepted and only shows up as wrong rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgramError {
    /// Kernel compilation, validation, reflection or linking failed.
    /// The program must not be used.
    Compilation { program: String, message: String },
    /// A required argument was absent. Nothing was uploaded.
    MissingArgument {
        component: &'static str,
        operation: &'static str,
        argument: &'static str,
    },
}

impl ProgramError {
    pub(crate) fn compilation(program: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Compilation {
            program: program.into(),
            message: message.into(),
        }
    }

    /// Builds a `MissingArgument` error and reports it at `error` level.
    pub(crate) fn missing_argument(
        component: &'static str,
        operation: &'static str,
        argument: &'static str,
    ) -> Self {
        let err = Self::MissingArgument { component, operation, argument };
        log::error!("{err}");
        err
    }
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramError::Compilation { program, message } => {
                write!(f, "failed to build GPU program `{program}`: {message}")
            }
            ProgramError::MissingArgument { component, operation, argument } => {
                write!(f, "{component}::{operation}: missing {argument}")
            }
        }
    }
}

impl std::error::Error for ProgramError {}
