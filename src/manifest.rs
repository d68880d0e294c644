//! Generators for the project, contents and index files.
//!
//! Each generator performs its own walk of the source tree; nothing is
//! shared between them.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

use crate::classify::{Classifier, Contribution, ManifestKind};
use crate::errors::GenchmError;
use crate::project::{Project, CONTENTS_FILE, INDEX_FILE};
use crate::sitemap::{self, TopicEntry};
use crate::tree::{count_topics, TocBuilder, TocNode};
use crate::walker::{walk_tree, WalkEvent};

/// A manifest written to disk.
#[derive(Debug, Clone, Serialize)]
pub struct WrittenManifest {
    pub kind: ManifestKind,
    pub path: PathBuf,
    /// Files listed (project) or topics written (contents, index).
    pub entries: usize,
}

/// Write the `[OPTIONS]` header and the `[FILES]` list.
///
/// Returns the number of files listed.
pub fn write_project<W: Write>(project: &Project, out: &mut W) -> Result<usize, GenchmError> {
    writeln!(out, "[OPTIONS]")?;
    writeln!(out, "Compatibility=1.1 or later")?;
    writeln!(out, "Compiled file={}", project.compiled_file)?;
    writeln!(out, "Default topic={}", project.default_topic.as_deref().unwrap_or(""))?;
    writeln!(out, "Contents file={CONTENTS_FILE}")?;
    writeln!(out, "Index file={INDEX_FILE}")?;
    writeln!(out, "Title={}", project.title)?;
    writeln!(out, "Language={}", project.language)?;
    writeln!(out, "Display compile progress=Yes")?;
    writeln!(out)?;
    writeln!(out, "[FILES]")?;

    let classifier = Classifier::new(&project.source_dir, &project.walk_options);
    let mut count = 0;
    walk_tree(
        &project.source_dir,
        &project.walk_options,
        ManifestKind::Project.groups_children(),
        &mut |event| {
            if let WalkEvent::Node(node) = event {
                if let Contribution::File(path) = classifier.classify(ManifestKind::Project, node)? {
                    writeln!(out, "{}", path.display())?;
                    count += 1;
                }
            }
            Ok::<(), GenchmError>(())
        },
    )?;
    Ok(count)
}

/// Walk the source tree into the nested table of contents.
pub fn collect_contents(project: &Project) -> Result<Vec<TocNode>, GenchmError> {
    let classifier = Classifier::new(&project.source_dir, &project.walk_options);
    let mut builder = TocBuilder::new();
    walk_tree(
        &project.source_dir,
        &project.walk_options,
        ManifestKind::Contents.groups_children(),
        &mut |event| {
            match event {
                WalkEvent::Node(node) => match classifier.classify(ManifestKind::Contents, node)? {
                    Contribution::Topic(entry) if entry.is_contents_entry() => builder.push(entry),
                    _ => builder.skip(),
                },
                WalkEvent::EnterGroup => builder.open_group(),
                WalkEvent::LeaveGroup => builder.close_group(),
            }
            Ok::<(), GenchmError>(())
        },
    )?;
    Ok(builder.finish())
}

fn write_toc<W: Write>(nodes: &[TocNode], out: &mut W) -> std::io::Result<()> {
    for node in nodes {
        writeln!(out, "{}", node.entry.to_list_item())?;
        if node.grouped || !node.children.is_empty() {
            writeln!(out, "{}", sitemap::GROUP_OPEN)?;
            write_toc(&node.children, out)?;
            writeln!(out, "{}", sitemap::GROUP_CLOSE)?;
        }
    }
    Ok(())
}

/// Write the nested contents file. Returns the number of topics.
pub fn write_contents<W: Write>(project: &Project, out: &mut W) -> Result<usize, GenchmError> {
    let toc = collect_contents(project)?;
    writeln!(out, "{}", sitemap::CONTENTS_HEADER)?;
    write_toc(&toc, out)?;
    writeln!(out, "{}", sitemap::FOOTER)?;
    Ok(count_topics(&toc))
}

/// Write the flat keyword index. Returns the number of entries.
pub fn write_index<W: Write>(project: &Project, out: &mut W) -> Result<usize, GenchmError> {
    writeln!(out, "{}", sitemap::INDEX_HEADER)?;

    let classifier = Classifier::new(&project.source_dir, &project.walk_options);
    let mut count = 0;
    walk_tree(
        &project.source_dir,
        &project.walk_options,
        ManifestKind::Index.groups_children(),
        &mut |event| {
            if let WalkEvent::Node(node) = event {
                if let Contribution::Topic(entry) = classifier.classify(ManifestKind::Index, node)? {
                    count += write_index_entry(&entry, &mut *out)?;
                }
            }
            Ok::<(), GenchmError>(())
        },
    )?;

    writeln!(out, "{}", sitemap::FOOTER)?;
    Ok(count)
}

fn write_index_entry<W: Write>(entry: &TopicEntry, out: &mut W) -> std::io::Result<usize> {
    if !entry.is_index_entry() {
        return Ok(0);
    }
    writeln!(out, "{}", entry.to_list_item())?;
    Ok(1)
}

fn write_file<F>(kind: ManifestKind, path: &Path, generate: F) -> Result<WrittenManifest, GenchmError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<usize, GenchmError>,
{
    let mut out = BufWriter::new(File::create(path)?);
    let entries = generate(&mut out)?;
    out.flush()?;
    info!("wrote {kind} file {} ({entries} entries)", path.display());
    Ok(WrittenManifest {
        kind,
        path: path.to_path_buf(),
        entries,
    })
}

/// Write all three manifests into the project's manifest directory.
///
/// A failure leaves whatever was already written on disk.
pub fn write_manifests(project: &Project) -> Result<Vec<WrittenManifest>, GenchmError> {
    ManifestKind::ALL
        .iter()
        .map(|&kind| match kind {
            ManifestKind::Project => {
                write_file(kind, &project.project_file(), |out| write_project(project, out))
            }
            ManifestKind::Contents => {
                write_file(kind, &project.contents_file(), |out| write_contents(project, out))
            }
            ManifestKind::Index => {
                write_file(kind, &project.index_file(), |out| write_index(project, out))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ProjectBuilder;
    use std::fs;
    use tempfile::TempDir;

    fn build(files: &[&str]) -> (TempDir, Project) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("site");
        fs::create_dir_all(&root).unwrap();
        for file in files {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "").unwrap();
        }
        let project = ProjectBuilder::new().source(&root).build().unwrap();
        (dir, project)
    }

    fn render<F>(generate: F) -> (String, usize)
    where
        F: FnOnce(&mut Vec<u8>) -> Result<usize, GenchmError>,
    {
        let mut out = Vec::new();
        let count = generate(&mut out).unwrap();
        (String::from_utf8(out).unwrap(), count)
    }

    fn li(name: &str, local: &str) -> String {
        TopicEntry::page(name, local).to_list_item()
    }

    #[test]
    fn test_single_index_page() {
        let (_dir, project) = build(&["index.html"]);
        let (text, count) = render(|out| write_contents(&project, out));

        assert_eq!(count, 1);
        let expected = format!(
            "{}\n{}\n<UL>\n</UL>\n{}\n",
            sitemap::CONTENTS_HEADER,
            li("site", "site/index.html"),
            sitemap::FOOTER
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_directory_and_sibling_page_pair() {
        let (_dir, project) = build(&["docs/topic.html", "docs/topic/index.html"]);
        let toc = collect_contents(&project).unwrap();

        // site has no pages of its own, so docs is top-level.
        assert_eq!(toc.len(), 1);
        let docs = &toc[0];
        assert_eq!(docs.entry, TopicEntry::header("docs"));
        assert_eq!(docs.children.len(), 1);
        assert_eq!(
            docs.children[0].entry,
            TopicEntry::page("topic", "site/docs/topic/index.html")
        );
        assert!(docs.children[0].children.is_empty());
    }

    #[test]
    fn test_end_to_end_nesting() {
        let (_dir, project) = build(&["index.html", "guide/index.html", "guide/intro.html"]);

        let toc = collect_contents(&project).unwrap();
        assert_eq!(toc.len(), 1);
        assert_eq!(toc[0].entry, TopicEntry::page("site", "site/index.html"));
        let guide = &toc[0].children[0];
        assert_eq!(guide.entry, TopicEntry::page("guide", "site/guide/index.html"));
        assert_eq!(guide.children.len(), 1);
        assert_eq!(
            guide.children[0].entry,
            TopicEntry::page("intro", "site/guide/intro.html")
        );

        let (text, count) = render(|out| write_contents(&project, out));
        assert_eq!(count, 3);
        let body: Vec<&str> = text.lines().skip(4).collect();
        assert_eq!(
            body,
            vec![
                li("site", "site/index.html").as_str(),
                "<UL>",
                li("guide", "site/guide/index.html").as_str(),
                "<UL>",
                li("intro", "site/guide/intro.html").as_str(),
                "</UL>",
                "</UL>",
                sitemap::FOOTER,
            ]
        );

        let (text, count) = render(|out| write_index(&project, out));
        assert_eq!(count, 3);
        let body: Vec<&str> = text.lines().skip(4).collect();
        assert_eq!(
            body,
            vec![
                li("index", "site/guide/index.html").as_str(),
                li("intro", "site/guide/intro.html").as_str(),
                li("index", "site/index.html").as_str(),
                sitemap::FOOTER,
            ]
        );
    }

    #[test]
    fn test_directory_with_htm_index_page() {
        let (_dir, project) = build(&["guide/index.htm", "guide/intro.html"]);
        assert_eq!(project.default_topic.as_deref(), Some("site/guide/index.htm"));

        let toc = collect_contents(&project).unwrap();
        assert_eq!(toc.len(), 1);
        let guide = &toc[0];
        assert_eq!(guide.entry, TopicEntry::page("guide", "site/guide/index.htm"));
        assert_eq!(guide.children.len(), 1);
        assert_eq!(
            guide.children[0].entry,
            TopicEntry::page("intro", "site/guide/intro.html")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_project_lists_pages_behind_directory_link() {
        let (_dir, project) = build(&["real/page.html"]);
        let site = &project.source_dir;
        std::os::unix::fs::symlink(site.join("real"), site.join("link")).unwrap();

        let (text, count) = render(|out| write_project(&project, out));
        assert_eq!(count, 2);
        let files: Vec<&str> = text.lines().skip(11).collect();
        assert_eq!(
            files,
            vec![
                site.join("link").join("page.html").display().to_string(),
                site.join("real").join("page.html").display().to_string(),
            ]
        );
    }

    #[test]
    fn test_index_counts_every_html_page() {
        let (_dir, project) = build(&[
            "index.html",
            "a.htm",
            "b.HTML",
            "style.css",
            "sub/index.html",
            "sub/deeper/page.html",
            "sub/deeper/image.png",
        ]);
        let (text, count) = render(|out| write_index(&project, out));
        assert_eq!(count, 5);
        assert_eq!(text.matches("<LI>").count(), 5);
        assert!(!text.contains("\"sub\""));
    }

    #[test]
    fn test_project_file() {
        let (_dir, project) = build(&["index.html", "img/logo.png"]);
        let (text, count) = render(|out| write_project(&project, out));

        assert_eq!(count, 2);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            &lines[..11],
            &[
                "[OPTIONS]",
                "Compatibility=1.1 or later",
                "Compiled file=site.chm",
                "Default topic=site/index.html",
                "Contents file=default_contents.hhc",
                "Index file=default_index.hhk",
                "Title=site",
                "Language=0x804",
                "Display compile progress=Yes",
                "",
                "[FILES]",
            ]
        );
        let logo = project.source_dir.join("img").join("logo.png");
        let index = project.source_dir.join("index.html");
        assert_eq!(lines[11], logo.display().to_string());
        assert_eq!(lines[12], index.display().to_string());
    }

    #[test]
    fn test_header_without_page_still_nests() {
        let (_dir, project) = build(&["chapter/one.html", "chapter/two.html"]);
        let toc = collect_contents(&project).unwrap();
        assert_eq!(toc.len(), 1);
        assert_eq!(toc[0].entry, TopicEntry::header("chapter"));
        assert_eq!(toc[0].children.len(), 2);
    }

    #[test]
    fn test_write_manifests_to_parent_directory() {
        let (dir, project) = build(&["index.html"]);
        let written = project.generate().unwrap();

        assert_eq!(written.len(), 3);
        assert_eq!(written[0].kind, ManifestKind::Project);
        assert_eq!(written[1].kind, ManifestKind::Contents);
        assert_eq!(written[2].kind, ManifestKind::Index);
        for manifest in &written {
            assert!(manifest.path.exists());
            assert_eq!(manifest.path.parent(), Some(project.manifest_dir.as_path()));
        }
        assert!(dir.path().join(CONTENTS_FILE).exists());
        let hhk = fs::read_to_string(dir.path().join(INDEX_FILE)).unwrap();
        assert!(hhk.ends_with("</UL></BODY></HTML>\n"));
    }
}
