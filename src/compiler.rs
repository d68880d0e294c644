//! Runs the external help compiler on a generated project file.
//!
//! The compiler is started with the project file's directory as its working
//! directory; this process's own working directory is never touched. Its
//! output goes straight to the console and its exit status is only
//! reported: the stock compiler exits non-zero even on success.

use std::path::{Path, PathBuf};
use std::process::Command;

use log::info;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur when starting the compiler.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("not a project file: {0}")]
    InvalidProjectFile(PathBuf),
}

/// How a compiler run ended.
#[derive(Debug, Clone, Serialize)]
pub struct CompileOutcome {
    pub program: String,
    pub working_dir: PathBuf,
    /// Exit code, absent when the process was killed by a signal.
    pub exit_code: Option<i32>,
}

/// Run `program <project file name>` from the project file's directory and
/// wait for it to finish.
pub fn compile(program: &str, project_file: &Path) -> Result<CompileOutcome, CompileError> {
    let file_name = project_file
        .file_name()
        .ok_or_else(|| CompileError::InvalidProjectFile(project_file.to_path_buf()))?;
    let working_dir = match project_file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };

    info!(
        "running {program} {} in {}",
        file_name.to_string_lossy(),
        working_dir.display()
    );
    let status = Command::new(program)
        .arg(file_name)
        .current_dir(&working_dir)
        .status()
        .map_err(|source| CompileError::Spawn {
            program: program.to_string(),
            source,
        })?;
    info!("{program} finished with {status}");

    Ok(CompileOutcome {
        program: program.to_string(),
        working_dir,
        exit_code: status.code(),
    })
}
