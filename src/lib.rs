//! genchm - Build HTML Help projects from a directory of HTML pages.
//!
//! genchm walks a tree of HTML pages and writes the three files the HTML
//! Help compiler needs (a project file, a table of contents and a keyword
//! index), then runs the compiler to produce a single `.chm` archive.
//!
//! # Quick Start
//!
//! ```no_run
//! use genchm::project::ProjectBuilder;
//!
//! let project = ProjectBuilder::new()
//!     .source("./manual")
//!     .title("User Manual")
//!     .build()
//!     .unwrap();
//!
//! let report = project.build().unwrap();
//! println!("compiler exit code: {:?}", report.compile.exit_code);
//! ```
//!
//! # Modules
//!
//! - [`paths`] - Address and file-name helpers
//! - [`tree`] - Filesystem nodes and the contents hierarchy
//! - [`walker`] - Sorted, filtered directory traversal
//! - [`classify`] - Per-manifest node classification and directory/page pairing
//! - [`sitemap`] - `text/sitemap` object serialization
//! - [`default_topic`] - Landing page discovery
//! - [`manifest`] - Project, contents and index generators
//! - [`project`] - Configuration and the top-level pipeline
//! - [`compiler`] - External compiler invocation
//! - [`output`] - Text and JSON run summaries

pub mod paths;
pub mod errors;
pub mod tree;
pub mod walker;
pub mod sitemap;
pub mod classify;
pub mod default_topic;
pub mod manifest;
pub mod project;
pub mod compiler;
pub mod output;

// Re-export key types at crate root for convenience
pub use classify::{Classifier, Contribution, ManifestKind};
pub use compiler::{CompileError, CompileOutcome};
pub use errors::GenchmError;
pub use manifest::WrittenManifest;
pub use output::OutputError;
pub use project::{BuildReport, ConfigError, Project, ProjectBuilder};
pub use sitemap::TopicEntry;
pub use tree::{FileNode, NodeKind, TocNode};
pub use walker::{WalkError, WalkOptions};
