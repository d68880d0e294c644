//! Console output for genchm runs.
//!
//! Summaries and contents previews render either as plain text or as JSON
//! for programmatic access.

use serde::Serialize;
use thiserror::Error;

use crate::compiler::CompileOutcome;
use crate::manifest::WrittenManifest;
use crate::project::Project;
use crate::tree::{render_toc, TocNode};

/// Errors that can occur during output formatting.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text (default).
    #[default]
    Text,
    /// JSON for programmatic access.
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// What a `generate` or `build` run produced.
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub source: &'a std::path::Path,
    pub title: &'a str,
    pub compiled_file: &'a str,
    pub default_topic: Option<&'a str>,
    pub manifests: &'a [WrittenManifest],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compile: Option<&'a CompileOutcome>,
}

impl<'a> RunSummary<'a> {
    pub fn new(project: &'a Project, manifests: &'a [WrittenManifest]) -> Self {
        Self {
            source: &project.source_dir,
            title: &project.title,
            compiled_file: &project.compiled_file,
            default_topic: project.default_topic.as_deref(),
            manifests,
            compile: None,
        }
    }

    pub fn with_compile(mut self, outcome: &'a CompileOutcome) -> Self {
        self.compile = Some(outcome);
        self
    }
}

/// Format a run summary.
pub fn format_summary(summary: &RunSummary<'_>, format: OutputFormat) -> Result<String, OutputError> {
    match format {
        OutputFormat::Text => Ok(format_summary_text(summary)),
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(summary)?)),
    }
}

fn format_summary_text(summary: &RunSummary<'_>) -> String {
    let mut output = String::with_capacity(512);

    output.push_str(&format!(
        "{} ({})\n",
        summary.title,
        summary.source.display()
    ));
    for manifest in summary.manifests {
        output.push_str(&format!(
            "  {:<9} {} ({} entries)\n",
            manifest.kind.to_string(),
            manifest.path.display(),
            manifest.entries
        ));
    }
    output.push_str(&format!(
        "  default topic: {}\n",
        summary.default_topic.unwrap_or("(none)")
    ));
    output.push_str(&format!("  compiled file: {}\n", summary.compiled_file));

    if let Some(outcome) = summary.compile {
        let status = match outcome.exit_code {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_string(),
        };
        output.push_str(&format!("  compiler: {} ({})\n", outcome.program, status));
    }

    output
}

/// Format the contents hierarchy.
pub fn format_toc(toc: &[TocNode], format: OutputFormat) -> Result<String, OutputError> {
    match format {
        OutputFormat::Text => Ok(render_toc(toc)),
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(toc)?)),
    }
}
