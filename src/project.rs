//! Run configuration and the top-level pipeline.
//!
//! [`ProjectBuilder`] collects optional settings, and `build` validates the
//! source directory and fills in every default to produce a [`Project`].

use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Serialize;
use thiserror::Error;

use crate::compiler::{self, CompileOutcome};
use crate::default_topic;
use crate::errors::GenchmError;
use crate::manifest::{self, WrittenManifest};
use crate::paths;
use crate::walker::WalkOptions;

/// Project file handed to the compiler.
pub const PROJECT_FILE: &str = "default_project.hhp";
/// Contents (table of contents) file.
pub const CONTENTS_FILE: &str = "default_contents.hhc";
/// Keyword index file.
pub const INDEX_FILE: &str = "default_index.hhk";
/// Extension of the compiled archive.
pub const ARCHIVE_EXTENSION: &str = "chm";
/// Locale written to the project file unless overridden.
pub const DEFAULT_LANGUAGE: &str = "0x804";
/// Compiler executable looked up on `PATH`.
pub const DEFAULT_COMPILER: &str = "hhc";

/// Problems with the requested configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no source directory given")]
    MissingSource,

    #[error("source directory not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("source is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("source directory has no parent to hold the manifests: {0}")]
    NoParent(PathBuf),

    #[error("cannot resolve {path}: {source}")]
    Resolve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Builder for a help project.
///
/// # Examples
///
/// ```no_run
/// use genchm::project::ProjectBuilder;
///
/// let project = ProjectBuilder::new()
///     .source("./site")
///     .title("My Manual")
///     .build()
///     .unwrap();
///
/// let written = project.generate().unwrap();
/// println!("wrote {} manifests", written.len());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProjectBuilder {
    source: Option<PathBuf>,
    title: Option<String>,
    default_topic: Option<String>,
    compiled_file: Option<String>,
    language: Option<String>,
    compiler: Option<String>,
    walk_options: WalkOptions,
}

impl ProjectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root of the HTML tree.
    pub fn source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Display title (default: the source directory's name).
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Archive address of the landing page (default: first index page found).
    pub fn default_topic(mut self, topic: impl Into<String>) -> Self {
        self.default_topic = Some(topic.into());
        self
    }

    /// Name of the compiled archive (default: `<source name>.chm`).
    pub fn compiled_file(mut self, name: impl Into<String>) -> Self {
        self.compiled_file = Some(name.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Compiler program to run (default: `hhc`).
    pub fn compiler(mut self, program: impl Into<String>) -> Self {
        self.compiler = Some(program.into());
        self
    }

    pub fn walk_options(mut self, options: WalkOptions) -> Self {
        self.walk_options = options;
        self
    }

    /// Validate the source directory and resolve every default.
    pub fn build(self) -> Result<Project, GenchmError> {
        let source = self.source.ok_or(ConfigError::MissingSource)?;
        let source_dir = resolve_source(&source)?;
        let name = paths::file_name(&source_dir);
        let manifest_dir = source_dir
            .parent()
            .ok_or_else(|| ConfigError::NoParent(source_dir.clone()))?
            .to_path_buf();

        let default_topic = match self.default_topic {
            Some(topic) => Some(topic),
            None => {
                let found = default_topic::resolve(&source_dir, &self.walk_options)?;
                match &found {
                    Some(topic) => info!("default topic: {topic}"),
                    None => warn!("no index page under {}, default topic left empty", source_dir.display()),
                }
                found
            }
        };

        Ok(Project {
            title: self.title.unwrap_or_else(|| name.clone()),
            compiled_file: self
                .compiled_file
                .unwrap_or_else(|| format!("{name}.{ARCHIVE_EXTENSION}")),
            default_topic,
            language: self.language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            compiler: self.compiler.unwrap_or_else(|| DEFAULT_COMPILER.to_string()),
            walk_options: self.walk_options,
            source_dir,
            manifest_dir,
        })
    }
}

fn resolve_source(source: &Path) -> Result<PathBuf, ConfigError> {
    if !source.exists() {
        return Err(ConfigError::SourceNotFound(source.to_path_buf()));
    }
    if !source.is_dir() {
        return Err(ConfigError::NotADirectory(source.to_path_buf()));
    }

    let resolve_err = |e| ConfigError::Resolve {
        path: source.to_path_buf(),
        source: e,
    };
    let absolute = paths::native_path(source).map_err(resolve_err)?;
    // `site/..` and friends have no final name to title the archive with.
    if absolute.file_name().is_some() {
        Ok(absolute)
    } else {
        absolute.canonicalize().map_err(resolve_err)
    }
}

/// A validated help project.
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    /// Absolute root of the HTML tree.
    pub source_dir: PathBuf,
    /// Directory receiving the manifests; the compiler runs here.
    pub manifest_dir: PathBuf,
    pub title: String,
    pub default_topic: Option<String>,
    pub compiled_file: String,
    pub language: String,
    pub compiler: String,
    #[serde(skip)]
    pub walk_options: WalkOptions,
}

/// Result of a full build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub manifests: Vec<WrittenManifest>,
    pub compile: CompileOutcome,
}

impl Project {
    pub fn project_file(&self) -> PathBuf {
        self.manifest_dir.join(PROJECT_FILE)
    }

    pub fn contents_file(&self) -> PathBuf {
        self.manifest_dir.join(CONTENTS_FILE)
    }

    pub fn index_file(&self) -> PathBuf {
        self.manifest_dir.join(INDEX_FILE)
    }

    /// Write the project, contents and index files.
    pub fn generate(&self) -> Result<Vec<WrittenManifest>, GenchmError> {
        manifest::write_manifests(self)
    }

    /// Write every manifest, then run the compiler on the project file.
    pub fn build(&self) -> Result<BuildReport, GenchmError> {
        let manifests = self.generate()?;
        let compile = compiler::compile(&self.compiler, &self.project_file())?;
        Ok(BuildReport { manifests, compile })
    }
}
