//! Walking a directory tree for markdown files.
//!
//! The [`Directory`] collects the markdown files below a root and turns them
//! into a [`TocDocument`].

use std::{
    cmp::Ordering,
    ffi::OsStr,
    path::{Path, PathBuf},
};

use walkdir::{DirEntry, WalkDir};

use crate::domain::{Config, TocDocument, TocEntry};

/// Errors that can occur while building a table of contents.
#[derive(Debug, thiserror::Error)]
pub enum TocError {
    /// The root directory does not exist.
    #[error("root directory not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The root path exists but is not a directory.
    #[error("root is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

/// A directory tree of markdown files.
#[derive(Debug, Clone)]
pub struct Directory {
    root: PathBuf,
    config: Config,
}

impl Directory {
    /// Opens the directory at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`TocError::NotFound`] if `root` does not exist and
    /// [`TocError::NotADirectory`] if it is not a directory.
    pub fn new(root: PathBuf, config: Config) -> Result<Self, TocError> {
        if !root.exists() {
            return Err(TocError::NotFound(root));
        }
        if !root.is_dir() {
            return Err(TocError::NotADirectory(root));
        }
        Ok(Self { root, config })
    }

    /// The root of the tree.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The path of the output file.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.config.output)
    }

    /// Paths of every markdown file in the tree, in traversal order.
    ///
    /// Directories are visited top-down. Within a directory, files come before
    /// subdirectories and both are sorted by name. The output file is
    /// excluded, as are hidden and ignored directories.
    #[must_use]
    pub fn markdown_paths(&self) -> Vec<PathBuf> {
        let output = self.output_path();

        WalkDir::new(&self.root)
            .sort_by(files_first)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_skipped_dir(entry))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {e}");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| entry.path().extension() == Some(OsStr::new("md")))
            .filter(|entry| entry.path() != output)
            .map(DirEntry::into_path)
            .collect()
    }

    /// Build the table of contents for this tree.
    #[must_use]
    pub fn build_toc(&self) -> TocDocument {
        let entries: Vec<TocEntry> = self
            .markdown_paths()
            .into_iter()
            .filter_map(|path| self.entry_for(&path))
            .collect();

        tracing::debug!(
            "Collected {} markdown files below {}",
            entries.len(),
            self.root.display()
        );

        TocDocument::new(self.config.header.clone(), entries)
    }

    fn entry_for(&self, path: &Path) -> Option<TocEntry> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let components: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let depth = components.len().saturating_sub(1);
        let label = self.config.labels.label_for(path);

        tracing::trace!("{} -> {label}", relative.display());
        Some(TocEntry::new(label, components.join("/"), depth))
    }

    fn is_skipped_dir(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        let skipped = self.config.is_ignored_dir(&name);
        if skipped {
            tracing::debug!("Skipping directory {}", entry.path().display());
        }
        skipped
    }
}

/// Build the table of contents for the tree at `root`.
///
/// # Errors
///
/// Returns an error if `root` does not exist or is not a directory.
pub fn build_toc(root: &Path, config: &Config) -> Result<TocDocument, TocError> {
    Ok(Directory::new(root.to_path_buf(), config.clone())?.build_toc())
}

fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    let a_dir = a.file_type().is_dir();
    let b_dir = b.file_type().is_dir();
    a_dir
        .cmp(&b_dir)
        .then_with(|| a.file_name().cmp(b.file_name()))
}
