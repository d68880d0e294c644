//! Filesystem nodes and the contents hierarchy.
//!
//! [`FileNode`] is what the walker hands to the classifier. [`TocNode`] is
//! the nested table of contents built from the classifier's output, which
//! can be written as a contents file or rendered with box-drawing characters.

use std::path::PathBuf;

use serde::Serialize;

use crate::paths;
use crate::sitemap::TopicEntry;

/// The type of a filesystem node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Directory,
    File { extension: Option<String> },
}

impl NodeKind {
    /// Check if this is a directory.
    pub fn is_directory(&self) -> bool {
        matches!(self, NodeKind::Directory)
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        matches!(self, NodeKind::File { .. })
    }
}

/// A file or directory met during a walk.
#[derive(Debug, Clone)]
pub struct FileNode {
    /// File or directory name (not full path).
    pub name: String,
    /// Full path.
    pub path: PathBuf,
    /// Type of node (file or directory).
    pub kind: NodeKind,
}

impl FileNode {
    /// Create a new directory node.
    pub fn directory(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::Directory,
        }
    }

    /// Create a new file node. The extension is taken from the path, lowercased.
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase());
        Self {
            name: name.into(),
            path,
            kind: NodeKind::File { extension },
        }
    }

    /// Check if this is a directory.
    pub fn is_directory(&self) -> bool {
        self.kind.is_directory()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Get file extension if this is a file.
    pub fn extension(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::File { extension } => extension.as_deref(),
            NodeKind::Directory => None,
        }
    }

    /// Check if this is a file with an HTML-family extension.
    pub fn is_html(&self) -> bool {
        self.extension().is_some_and(paths::is_html_extension)
    }

    /// Name without its last extension.
    pub fn stem(&self) -> String {
        paths::file_stem(&self.path)
    }
}

/// A topic in the table of contents with the topics nested under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocNode {
    #[serde(flatten)]
    pub entry: TopicEntry,
    /// Whether the topic opens a nested list, even an empty one.
    #[serde(skip)]
    pub grouped: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TocNode>,
}

impl TocNode {
    pub fn new(entry: TopicEntry) -> Self {
        Self {
            entry,
            grouped: false,
            children: Vec::new(),
        }
    }

    /// Count this topic and every topic below it.
    pub fn topic_count(&self) -> usize {
        1 + count_topics(&self.children)
    }
}

/// Count every topic in a forest.
pub fn count_topics(nodes: &[TocNode]) -> usize {
    nodes.iter().map(TocNode::topic_count).sum()
}

struct Level {
    owner: Option<TocNode>,
    children: Vec<TocNode>,
}

/// Builds a [`TocNode`] forest from a stream of entries and group markers.
///
/// A group opened right after an entry nests under that entry. A group
/// opened with no preceding entry is transparent: its children land at the
/// enclosing level.
pub struct TocBuilder {
    levels: Vec<Level>,
    last_was_entry: bool,
}

impl Default for TocBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TocBuilder {
    pub fn new() -> Self {
        Self {
            levels: vec![Level {
                owner: None,
                children: Vec::new(),
            }],
            last_was_entry: false,
        }
    }

    fn current(&mut self) -> &mut Vec<TocNode> {
        let last = self.levels.len() - 1;
        &mut self.levels[last].children
    }

    pub fn push(&mut self, entry: TopicEntry) {
        self.current().push(TocNode::new(entry));
        self.last_was_entry = true;
    }

    /// Note a node that contributed nothing.
    pub fn skip(&mut self) {
        self.last_was_entry = false;
    }

    pub fn open_group(&mut self) {
        let owner = if self.last_was_entry {
            self.current().pop()
        } else {
            None
        };
        self.levels.push(Level {
            owner,
            children: Vec::new(),
        });
        self.last_was_entry = false;
    }

    pub fn close_group(&mut self) {
        if self.levels.len() < 2 {
            return;
        }
        if let Some(level) = self.levels.pop() {
            match level.owner {
                Some(mut owner) => {
                    owner.grouped = true;
                    owner.children = level.children;
                    self.current().push(owner);
                }
                None => self.current().extend(level.children),
            }
        }
        self.last_was_entry = false;
    }

    /// Close any groups left open and return the top-level topics.
    pub fn finish(mut self) -> Vec<TocNode> {
        while self.levels.len() > 1 {
            self.close_group();
        }
        self.levels.pop().map(|l| l.children).unwrap_or_default()
    }
}

/// Box-drawing characters for tree rendering.
const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const VERTICAL: &str = "│   ";
const SPACE: &str = "    ";

/// Render a contents forest with box-drawing characters.
///
/// # Examples
///
/// ```
/// use genchm::sitemap::TopicEntry;
/// use genchm::tree::{render_toc, TocNode};
///
/// let mut root = TocNode::new(TopicEntry::page("site", "site/index.html"));
/// root.children.push(TocNode::new(TopicEntry::page("intro", "site/intro.html")));
///
/// let output = render_toc(&[root]);
/// assert!(output.contains("└── intro -> site/intro.html"));
/// ```
pub fn render_toc(nodes: &[TocNode]) -> String {
    let mut output = String::with_capacity(4096);
    for node in nodes {
        render_node(&mut output, node, "", true, true);
    }
    output
}

fn render_node(output: &mut String, node: &TocNode, prefix: &str, is_last: bool, is_root: bool) {
    let branch = if is_root {
        ""
    } else if is_last {
        LAST_BRANCH
    } else {
        BRANCH
    };

    output.push_str(prefix);
    output.push_str(branch);
    output.push_str(&node.entry.name);
    if let Some(local) = &node.entry.local {
        output.push_str(" -> ");
        output.push_str(local);
    }
    output.push('\n');

    let child_count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        let new_prefix = if is_root {
            String::new()
        } else {
            let continuation = if is_last { SPACE } else { VERTICAL };
            format!("{}{}", prefix, continuation)
        };
        render_node(output, child, &new_prefix, i == child_count - 1, false);
    }
}
