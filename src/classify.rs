//! Decides what each walked node contributes to each manifest.
//!
//! A directory and an HTML page often stand for the same topic: `guide/`
//! with `guide/index.html`, or `guide/` next to `guide.html`. The contents
//! file shows such a pair once, as the directory, addressed at the page.
//! Suppression only ever removes the page: a page is dropped whenever
//! [`Classifier::representative_directory`] finds a directory for it, even
//! if that directory ends up contributing nothing itself.

use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;

use crate::paths::{self, is_index_page, relative_address};
use crate::sitemap::TopicEntry;
use crate::tree::FileNode;
use crate::walker::{has_html_files, list_dir, WalkError, WalkOptions};

/// The three generated manifests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestKind {
    Project,
    Contents,
    Index,
}

impl ManifestKind {
    pub const ALL: [ManifestKind; 3] = [
        ManifestKind::Project,
        ManifestKind::Contents,
        ManifestKind::Index,
    ];

    /// Whether a walk for this manifest nests directory children.
    pub fn groups_children(self) -> bool {
        matches!(self, ManifestKind::Contents)
    }
}

impl std::fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ManifestKind::Project => "project",
            ManifestKind::Contents => "contents",
            ManifestKind::Index => "index",
        };
        f.write_str(name)
    }
}

/// What a single node adds to a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contribution {
    Nothing,
    /// A physical file for the project's file list.
    File(PathBuf),
    /// A contents or index entry.
    Topic(TopicEntry),
}

/// Classifies nodes found under one source root.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    root: &'a Path,
    options: &'a WalkOptions,
}

impl<'a> Classifier<'a> {
    pub fn new(root: &'a Path, options: &'a WalkOptions) -> Self {
        Self { root, options }
    }

    /// Archive address of a path under the root.
    pub fn address(&self, path: &Path) -> String {
        relative_address(self.root, path)
    }

    /// The page standing in for a directory: its first `index.htm`/`index.html` page,
    /// otherwise a sibling `<dir>.html`.
    pub fn representative_page(&self, dir: &Path) -> Result<Option<PathBuf>, WalkError> {
        // list_dir already sorts with filename_compare.
        let index = list_dir(dir, self.options)?
            .into_iter()
            .find(|node| node.is_file() && is_index_page(&node.name));
        if let Some(page) = index {
            return Ok(Some(page.path));
        }

        let sibling = dir.with_file_name(format!("{}.html", paths::file_name(dir)));
        Ok(sibling.is_file().then_some(sibling))
    }

    /// The directory a page stands in for: the parent of an index page,
    /// otherwise a sibling directory named after the page's stem.
    pub fn representative_directory(&self, file: &Path) -> Option<PathBuf> {
        if is_index_page(&paths::file_name(file)) {
            return file.parent().map(Path::to_path_buf);
        }

        let dir = file.with_file_name(paths::file_stem(file));
        dir.is_dir().then_some(dir)
    }

    /// Classify one node for one manifest.
    pub fn classify(&self, kind: ManifestKind, node: &FileNode) -> Result<Contribution, WalkError> {
        match kind {
            ManifestKind::Project => self.project_item(node),
            ManifestKind::Contents => self.contents_item(node),
            ManifestKind::Index => Ok(self.index_item(node)),
        }
    }

    fn project_item(&self, node: &FileNode) -> Result<Contribution, WalkError> {
        if node.is_directory() {
            return Ok(Contribution::Nothing);
        }
        let path = paths::native_path(&node.path).map_err(|e| WalkError::from_io(&node.path, e))?;
        Ok(Contribution::File(path))
    }

    fn contents_item(&self, node: &FileNode) -> Result<Contribution, WalkError> {
        if node.is_directory() {
            if !has_html_files(&node.path, self.options)? {
                return Ok(Contribution::Nothing);
            }
            // Named after the whole directory: `v1.2/` stays `v1.2`, no
            // extension is stripped from a directory name.
            let entry = match self.representative_page(&node.path)? {
                Some(page) => TopicEntry::page(&node.name, self.address(&page)),
                None => TopicEntry::header(&node.name),
            };
            return Ok(Contribution::Topic(entry));
        }

        if !node.is_html() {
            return Ok(Contribution::Nothing);
        }
        if let Some(dir) = self.representative_directory(&node.path) {
            debug!(
                "{} is represented by {}",
                node.path.display(),
                dir.display()
            );
            return Ok(Contribution::Nothing);
        }
        Ok(Contribution::Topic(TopicEntry::page(
            node.stem(),
            self.address(&node.path),
        )))
    }

    fn index_item(&self, node: &FileNode) -> Contribution {
        if node.is_html() {
            Contribution::Topic(TopicEntry::page(node.stem(), self.address(&node.path)))
        } else {
            Contribution::Nothing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Site {
        _dir: TempDir,
        root: PathBuf,
    }

    fn site(files: &[&str]) -> Site {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("docs");
        fs::create_dir_all(&root).unwrap();
        for file in files {
            let path = root.join(file);
            if file.ends_with('/') {
                fs::create_dir_all(&path).unwrap();
            } else {
                fs::create_dir_all(path.parent().unwrap()).unwrap();
                fs::write(&path, "").unwrap();
            }
        }
        Site { _dir: dir, root }
    }

    fn topic(c: Contribution) -> TopicEntry {
        match c {
            Contribution::Topic(entry) => entry,
            other => panic!("expected a topic, got {:?}", other),
        }
    }

    #[test]
    fn test_representative_page_prefers_index() {
        let s = site(&["topic/index.html", "topic/other.html", "topic.html"]);
        let options = WalkOptions::default();
        let c = Classifier::new(&s.root, &options);
        let page = c.representative_page(&s.root.join("topic")).unwrap().unwrap();
        assert!(page.ends_with("topic/index.html"));
    }

    #[test]
    fn test_representative_page_sorted_first_index() {
        let s = site(&["topic/index.html", "topic/INDEX.HTM"]);
        let options = WalkOptions::default();
        let c = Classifier::new(&s.root, &options);
        let page = c.representative_page(&s.root.join("topic")).unwrap().unwrap();
        assert!(page.ends_with("topic/INDEX.HTM"));
    }

    #[test]
    fn test_representative_page_falls_back_to_sibling() {
        let s = site(&["topic/a.html", "topic.html"]);
        let options = WalkOptions::default();
        let c = Classifier::new(&s.root, &options);
        let page = c.representative_page(&s.root.join("topic")).unwrap().unwrap();
        assert_eq!(page, s.root.join("topic.html"));

        let s = site(&["topic/a.html"]);
        let c = Classifier::new(&s.root, &options);
        assert!(c.representative_page(&s.root.join("topic")).unwrap().is_none());
    }

    #[test]
    fn test_representative_directory() {
        let s = site(&["index.html", "topic.html", "topic/", "alone.html"]);
        let options = WalkOptions::default();
        let c = Classifier::new(&s.root, &options);
        assert_eq!(
            c.representative_directory(&s.root.join("index.html")),
            Some(s.root.clone())
        );
        assert_eq!(
            c.representative_directory(&s.root.join("topic.html")),
            Some(s.root.join("topic"))
        );
        assert_eq!(c.representative_directory(&s.root.join("alone.html")), None);
    }

    #[test]
    fn test_contents_directory_with_index() {
        let s = site(&["topic/index.html"]);
        let options = WalkOptions::default();
        let c = Classifier::new(&s.root, &options);
        let node = FileNode::directory("topic", s.root.join("topic"));
        let entry = topic(c.classify(ManifestKind::Contents, &node).unwrap());
        assert_eq!(entry, TopicEntry::page("topic", "docs/topic/index.html"));
    }

    #[test]
    fn test_contents_directory_with_htm_index() {
        let s = site(&["topic/index.htm", "topic/other.html"]);
        let options = WalkOptions::default();
        let c = Classifier::new(&s.root, &options);
        let node = FileNode::directory("topic", s.root.join("topic"));
        let entry = topic(c.classify(ManifestKind::Contents, &node).unwrap());
        assert_eq!(entry, TopicEntry::page("topic", "docs/topic/index.htm"));

        let index = FileNode::file("index.htm", s.root.join("topic/index.htm"));
        assert_eq!(
            c.classify(ManifestKind::Contents, &index).unwrap(),
            Contribution::Nothing
        );
    }

    #[test]
    fn test_contents_directory_without_page_is_header() {
        let s = site(&["topic/a.html"]);
        let options = WalkOptions::default();
        let c = Classifier::new(&s.root, &options);
        let node = FileNode::directory("topic", s.root.join("topic"));
        let entry = topic(c.classify(ManifestKind::Contents, &node).unwrap());
        assert_eq!(entry, TopicEntry::header("topic"));
    }

    #[test]
    fn test_contents_directory_without_html_contributes_nothing() {
        let s = site(&["img/logo.png"]);
        let options = WalkOptions::default();
        let c = Classifier::new(&s.root, &options);
        let node = FileNode::directory("img", s.root.join("img"));
        assert_eq!(
            c.classify(ManifestKind::Contents, &node).unwrap(),
            Contribution::Nothing
        );
    }

    #[test]
    fn test_contents_suppresses_paired_page() {
        let s = site(&["topic.html", "topic/index.html", "other.html"]);
        let options = WalkOptions::default();
        let c = Classifier::new(&s.root, &options);

        let paired = FileNode::file("topic.html", s.root.join("topic.html"));
        assert_eq!(
            c.classify(ManifestKind::Contents, &paired).unwrap(),
            Contribution::Nothing
        );

        let index = FileNode::file("index.html", s.root.join("topic/index.html"));
        assert_eq!(
            c.classify(ManifestKind::Contents, &index).unwrap(),
            Contribution::Nothing
        );

        let plain = FileNode::file("other.html", s.root.join("other.html"));
        let entry = topic(c.classify(ManifestKind::Contents, &plain).unwrap());
        assert_eq!(entry, TopicEntry::page("other", "docs/other.html"));
    }

    #[test]
    fn test_page_beside_empty_directory_is_dropped() {
        // The page is claimed by a directory that has no pages of its own,
        // so neither appears in the contents.
        let s = site(&["topic.html", "topic/logo.png"]);
        let options = WalkOptions::default();
        let c = Classifier::new(&s.root, &options);
        let page = FileNode::file("topic.html", s.root.join("topic.html"));
        let dir = FileNode::directory("topic", s.root.join("topic"));
        assert_eq!(
            c.classify(ManifestKind::Contents, &page).unwrap(),
            Contribution::Nothing
        );
        assert_eq!(
            c.classify(ManifestKind::Contents, &dir).unwrap(),
            Contribution::Nothing
        );
    }

    #[test]
    fn test_index_lists_every_page() {
        let s = site(&["topic.html", "topic/index.html", "style.css"]);
        let options = WalkOptions::default();
        let c = Classifier::new(&s.root, &options);

        let paired = FileNode::file("topic.html", s.root.join("topic.html"));
        let entry = topic(c.classify(ManifestKind::Index, &paired).unwrap());
        assert_eq!(entry, TopicEntry::page("topic", "docs/topic.html"));

        let css = FileNode::file("style.css", s.root.join("style.css"));
        assert_eq!(c.classify(ManifestKind::Index, &css).unwrap(), Contribution::Nothing);

        let dir = FileNode::directory("topic", s.root.join("topic"));
        assert_eq!(c.classify(ManifestKind::Index, &dir).unwrap(), Contribution::Nothing);
    }

    #[test]
    fn test_project_lists_files_only() {
        let s = site(&["style.css"]);
        let options = WalkOptions::default();
        let c = Classifier::new(&s.root, &options);

        let css = FileNode::file("style.css", s.root.join("style.css"));
        match c.classify(ManifestKind::Project, &css).unwrap() {
            Contribution::File(path) => {
                assert!(path.is_absolute());
                assert!(path.ends_with("docs/style.css"));
            }
            other => panic!("expected a file, got {:?}", other),
        }

        let dir = FileNode::directory("docs", &s.root);
        assert_eq!(c.classify(ManifestKind::Project, &dir).unwrap(), Contribution::Nothing);
    }
}
