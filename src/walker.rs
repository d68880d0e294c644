//! Directory traversal for manifest generation.
//!
//! Listings go through the `ignore` crate so hidden entries, `.gitignore`
//! and per-directory `.genchmignore` files can filter what the help archive
//! sees. Children are always visited in [`filename_compare`] order.
//!
//! Every listing loads ignore files from all of the listed directory's
//! ancestors, so an ignore file above the source root filters the tree too.
//!
//! Symbolic links are classified by their target. Links to directories are
//! walked like directories; a link back into a directory that is still being
//! walked is reported as [`WalkError::SymlinkLoop`].

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use thiserror::Error;

use crate::paths::{self, filename_compare};
use crate::tree::FileNode;

/// Per-directory ignore file, gitignore syntax. Never listed itself.
pub const IGNORE_FILENAME: &str = ".genchmignore";

/// Errors that can occur during directory walking.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("path not found: {path}")]
    NotFound { path: PathBuf },

    #[error("not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("symlink loop detected: {path}")]
    SymlinkLoop { path: PathBuf },
}

impl WalkError {
    pub(crate) fn from_io(path: &Path, source: std::io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            std::io::ErrorKind::NotFound => WalkError::NotFound { path },
            std::io::ErrorKind::PermissionDenied => WalkError::PermissionDenied { path },
            _ => WalkError::Io { path, source },
        }
    }
}

/// Options for directory walking.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Include hidden files and directories.
    pub include_hidden: bool,
    /// Respect .gitignore patterns.
    pub respect_gitignore: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            include_hidden: true,
            respect_gitignore: false,
        }
    }
}

impl WalkOptions {
    /// Skip hidden files and directories.
    pub fn without_hidden() -> Self {
        Self {
            include_hidden: false,
            ..Default::default()
        }
    }

    fn builder(&self, root: &Path) -> WalkBuilder {
        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .hidden(!self.include_hidden)
            .parents(true)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .follow_links(false)
            .add_custom_ignore_filename(IGNORE_FILENAME);
        builder
    }
}

/// What the walker reports to its callback.
#[derive(Debug, Clone, Copy)]
pub enum WalkEvent<'a> {
    /// A directory (before its children) or a file.
    Node(&'a FileNode),
    /// The previous directory's children follow, nested.
    EnterGroup,
    /// The nested children are done.
    LeaveGroup,
}

/// Convert an `ignore` error, dropping the ones that only concern
/// unreadable ignore files.
fn convert_error(path: &Path, error: ignore::Error) -> Option<WalkError> {
    match error {
        ignore::Error::WithPath { path, err } => convert_error(&path, *err),
        ignore::Error::WithDepth { err, .. } => convert_error(path, *err),
        ignore::Error::WithLineNumber { err, .. } => convert_error(path, *err),
        ignore::Error::Loop { child, .. } => Some(WalkError::SymlinkLoop { path: child }),
        ignore::Error::Io(source) => Some(WalkError::from_io(path, source)),
        _ => None,
    }
}

fn check_directory(path: &Path) -> Result<(), WalkError> {
    let metadata = path.metadata().map_err(|e| WalkError::from_io(path, e))?;
    if metadata.is_dir() {
        Ok(())
    } else {
        Err(WalkError::NotADirectory {
            path: path.to_path_buf(),
        })
    }
}

fn node_for(entry: &ignore::DirEntry) -> FileNode {
    let name = entry.file_name().to_string_lossy().into_owned();
    let is_dir = if entry.path_is_symlink() {
        // Dangling links are files.
        entry.path().is_dir()
    } else {
        entry.file_type().is_some_and(|ft| ft.is_dir())
    };
    if is_dir {
        FileNode::directory(name, entry.path())
    } else {
        FileNode::file(name, entry.path())
    }
}

/// List the direct children of a directory, sorted by name.
pub fn list_dir(dir: &Path, options: &WalkOptions) -> Result<Vec<FileNode>, WalkError> {
    check_directory(dir)?;

    let mut nodes = Vec::new();
    for result in options.builder(dir).max_depth(Some(1)).build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => match convert_error(dir, e) {
                Some(err) => return Err(err),
                None => continue,
            },
        };
        if entry.depth() == 0 || entry.file_name() == IGNORE_FILENAME {
            continue;
        }
        nodes.push(node_for(&entry));
    }

    nodes.sort_by(|a, b| filename_compare(&a.name, &b.name));
    Ok(nodes)
}

/// Check whether a directory directly contains an HTML page.
pub fn has_html_files(dir: &Path, options: &WalkOptions) -> Result<bool, WalkError> {
    Ok(list_dir(dir, options)?.iter().any(FileNode::is_html))
}

/// Walk a directory tree depth-first, reporting every node to `on_event`.
///
/// Each directory is reported before its children. When `group_when_html`
/// is set and a directory directly contains an HTML page, its children are
/// bracketed by [`WalkEvent::EnterGroup`] and [`WalkEvent::LeaveGroup`].
/// The first error, from the callback or from a listing, stops the walk.
///
/// # Examples
///
/// ```no_run
/// use genchm::walker::{walk_tree, WalkError, WalkEvent, WalkOptions};
/// use std::path::Path;
///
/// let mut files = 0;
/// walk_tree(Path::new("./site"), &WalkOptions::default(), false, &mut |event| {
///     if let WalkEvent::Node(node) = event {
///         if node.is_file() {
///             files += 1;
///         }
///     }
///     Ok::<(), WalkError>(())
/// })
/// .unwrap();
/// ```
pub fn walk_tree<F, E>(
    root: &Path,
    options: &WalkOptions,
    group_when_html: bool,
    on_event: &mut F,
) -> Result<(), E>
where
    F: FnMut(WalkEvent<'_>) -> Result<(), E>,
    E: From<WalkError>,
{
    check_directory(root)?;
    let node = FileNode::directory(paths::file_name(root), root);
    let mut ancestors = Vec::new();
    walk_directory(&node, options, group_when_html, &mut ancestors, on_event)
}

fn walk_directory<F, E>(
    dir: &FileNode,
    options: &WalkOptions,
    group_when_html: bool,
    ancestors: &mut Vec<PathBuf>,
    on_event: &mut F,
) -> Result<(), E>
where
    F: FnMut(WalkEvent<'_>) -> Result<(), E>,
    E: From<WalkError>,
{
    let real = dir
        .path
        .canonicalize()
        .map_err(|e| WalkError::from_io(&dir.path, e))?;
    if ancestors.contains(&real) {
        return Err(WalkError::SymlinkLoop {
            path: dir.path.clone(),
        }
        .into());
    }

    on_event(WalkEvent::Node(dir))?;

    let children = list_dir(&dir.path, options)?;
    let grouped = group_when_html && children.iter().any(FileNode::is_html);

    if grouped {
        on_event(WalkEvent::EnterGroup)?;
    }
    ancestors.push(real);
    for child in &children {
        if child.is_directory() {
            walk_directory(child, options, group_when_html, ancestors, on_event)?;
        } else {
            on_event(WalkEvent::Node(child))?;
        }
    }
    ancestors.pop();
    if grouped {
        on_event(WalkEvent::LeaveGroup)?;
    }
    Ok(())
}

/// Recursively collect the files under `root` accepted by `keep`, in walk
/// order.
pub fn find_files<P>(root: &Path, options: &WalkOptions, keep: P) -> Result<Vec<FileNode>, WalkError>
where
    P: Fn(&FileNode) -> bool,
{
    let mut found = Vec::new();
    walk_tree(root, options, false, &mut |event| {
        if let WalkEvent::Node(node) = event {
            if node.is_file() && keep(node) {
                found.push(node.clone());
            }
        }
        Ok::<(), WalkError>(())
    })?;
    Ok(found)
}
