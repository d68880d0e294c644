//! Error types for genchm.

use crate::compiler::CompileError;
use crate::output::OutputError;
use crate::project::ConfigError;
use crate::walker::WalkError;

/// Top-level error type for genchm operations.
#[derive(Debug, thiserror::Error)]
pub enum GenchmError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("walk error: {0}")]
    Walk(#[from] WalkError),

    #[error("compiler error: {0}")]
    Compile(#[from] CompileError),

    #[error("output error: {0}")]
    Output(#[from] OutputError),
}

impl GenchmError {
    /// Configuration problems are answered with usage help.
    pub fn is_config(&self) -> bool {
        matches!(self, GenchmError::Config(_))
    }
}

/// Map an error to its exit code.
pub fn exit_code(error: &GenchmError) -> i32 {
    match error {
        GenchmError::Config(_) => 2,
        GenchmError::Io(_) => 1,
        GenchmError::Walk(_) => 3,
        GenchmError::Compile(_) => 4,
        GenchmError::Output(_) => 1,
    }
}
