//! Picks the landing page when none is configured.

use std::cmp::Ordering;
use std::path::Path;

use crate::paths::{filename_compare, is_index_page, relative_address};
use crate::tree::FileNode;
use crate::walker::{find_files, WalkError, WalkOptions};

/// Order index pages: shallower pages first, then by [`filename_compare`]
/// on their archive addresses.
pub fn page_order(a: &str, b: &str) -> Ordering {
    let depth = |s: &str| s.matches('/').count();
    depth(a)
        .cmp(&depth(b))
        .then_with(|| filename_compare(a, b))
}

/// Find the first `index.htm`/`index.html` page anywhere under `source`, as an archive
/// address. Returns `None` when the tree has no index page at all.
pub fn resolve(source: &Path, options: &WalkOptions) -> Result<Option<String>, WalkError> {
    let mut addresses: Vec<String> = find_files(source, options, |node: &FileNode| {
        is_index_page(&node.name)
    })?
    .iter()
    .map(|node| relative_address(source, &node.path))
    .collect();

    addresses.sort_by(|a, b| page_order(a, b));
    Ok(addresses.into_iter().next())
}
