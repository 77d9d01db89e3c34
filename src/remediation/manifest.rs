//! Dependency-manifest discovery inside a cloned tree

use crate::core::config::MANIFEST_FILENAME;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Subtrees never searched for manifests
const SKIPPED_DIRS: &[&str] = &["node_modules", ".git"];

/// Recursively collect every directory containing a dependency manifest.
///
/// Directories come back deduplicated and lexically sorted so fix
/// invocations run in a deterministic order. Unreadable entries are
/// skipped silently; a missing root yields an empty list.
pub fn find_manifest_dirs(root: &Path) -> Vec<PathBuf> {
    let mut dirs = BTreeSet::new();

    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));

    for entry in walker.filter_map(Result::ok) {
        if entry.file_type().is_file()
            && entry.file_name() == MANIFEST_FILENAME
            && let Some(parent) = entry.path().parent()
        {
            dirs.insert(parent.to_path_buf());
        }
    }

    dirs.into_iter().collect()
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| SKIPPED_DIRS.contains(&name))
            .unwrap_or(false)
}
