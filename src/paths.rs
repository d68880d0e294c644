//! Path helpers shared by the walker, the classifier and the generators.
//!
//! Two address forms exist: help-archive addresses (root-relative, forward
//! slashes, prefixed with the root's own name) and project-file paths
//! (absolute, platform separators).

use std::cmp::Ordering;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use glob::{MatchOptions, Pattern};

/// Extensions that make a file an HTML page.
pub const HTML_EXTENSIONS: [&str; 2] = ["htm", "html"];

/// Names of the pages that represent a directory, matched ignoring case.
pub const INDEX_PAGE_PATTERNS: [&str; 2] = ["index.htm", "index.html"];

const INDEX_MATCH: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

fn index_patterns() -> &'static [Pattern] {
    static PATTERNS: OnceLock<Vec<Pattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        INDEX_PAGE_PATTERNS
            .iter()
            .filter_map(|p| Pattern::new(p).ok())
            .collect()
    })
}

/// Check whether an extension belongs to the HTML family (case-insensitive).
pub fn is_html_extension(extension: &str) -> bool {
    HTML_EXTENSIONS
        .iter()
        .any(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Check whether a path names an HTML page.
pub fn is_html_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(is_html_extension)
}

/// Check whether a bare file name is `index.htm` or `index.html`, ignoring case.
///
/// ```
/// use genchm::paths::is_index_page;
///
/// assert!(is_index_page("index.html"));
/// assert!(is_index_page("INDEX.HTM"));
/// assert!(!is_index_page("index.md"));
/// ```
pub fn is_index_page(file_name: &str) -> bool {
    index_patterns()
        .iter()
        .any(|p| p.matches_with(file_name, INDEX_MATCH))
}

/// Final component of a path, or the whole path when it has none.
pub fn file_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.to_string_lossy().into_owned(),
        |n| n.to_string_lossy().into_owned(),
    )
}

/// File name without its last extension.
pub fn file_stem(path: &Path) -> String {
    path.file_stem().map_or_else(
        || file_name(path),
        |s| s.to_string_lossy().into_owned(),
    )
}

/// Order file names case-insensitively, falling back to exact byte order
/// so that names differing only in case still compare deterministically.
pub fn filename_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Render a path with forward slashes.
pub fn to_unix(path: &Path) -> String {
    let s = path.to_string_lossy();
    if cfg!(windows) {
        s.replace('\\', "/")
    } else {
        s.into_owned()
    }
}

/// Address of `path` inside the help archive.
///
/// Paths under `root` become `<root name>/<relative path>` with forward
/// slashes. Anything else is returned unchanged (in forward-slash form).
///
/// ```
/// use std::path::Path;
/// use genchm::paths::relative_address;
///
/// let root = Path::new("/docs/site");
/// assert_eq!(relative_address(root, Path::new("/docs/site/guide/a.html")), "site/guide/a.html");
/// assert_eq!(relative_address(root, Path::new("/elsewhere/b.html")), "/elsewhere/b.html");
/// ```
pub fn relative_address(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rest) if rest.as_os_str().is_empty() => file_name(root),
        Ok(rest) => format!("{}/{}", file_name(root), to_unix(rest)),
        Err(_) => to_unix(path),
    }
}

/// Absolute form of a path with platform separators, without resolving
/// symbolic links.
pub fn native_path(path: &Path) -> io::Result<PathBuf> {
    std::path::absolute(path)
}
