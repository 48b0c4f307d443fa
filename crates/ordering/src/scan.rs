//! Directory scanning.

use std::path::{Path, PathBuf};

use crate::natural::natural_sort;

/// The ordered image filenames found in one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSet {
    dir: PathBuf,
    names: Vec<String>,
}

impl FileSet {
    /// Build a file set from names, applying natural order.
    pub fn new(dir: impl Into<PathBuf>, mut names: Vec<String>) -> Self {
        natural_sort(&mut names);
        Self {
            dir: dir.into(),
            names,
        }
    }

    /// An empty set for `dir`.
    pub fn empty(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            names: Vec::new(),
        }
    }

    /// Directory the names are relative to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Filenames in natural order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Full paths in natural order.
    pub fn paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.names.iter().map(|name| self.dir.join(name))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// List the immediate entries of `dir` whose extension matches `extension`
/// (case-insensitive, with or without a leading dot), in natural order.
///
/// Never fails: an unreadable or missing directory yields an empty set, and
/// callers report "no files" as an ordinary outcome.
pub fn list_images(dir: &Path, extension: &str) -> FileSet {
    let wanted = extension.trim_start_matches('.');

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "Directory unreadable, treating as empty");
            return FileSet::empty(dir);
        }
    };

    let mut names = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted));
        if !matches {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => {
                tracing::warn!(name = ?raw, "Skipping image with non UTF-8 filename");
            }
        }
    }

    let set = FileSet::new(dir, names);
    tracing::debug!(dir = %dir.display(), count = set.len(), "Scanned image directory");
    set
}
