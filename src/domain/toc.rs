//! The table of contents model and its Markdown rendering.

use std::fmt::Write as _;

use serde::Serialize;

/// Comment line opening a generated table of contents block.
pub const START_MARKER: &str = "<!-- toc:start -->";

/// Comment line closing a generated table of contents block.
pub const END_MARKER: &str = "<!-- toc:end -->";

/// A single markdown file listed in the table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    label: String,
    relative_path: String,
    depth: usize,
}

impl TocEntry {
    /// Creates an entry.
    ///
    /// `relative_path` uses `/` separators and is relative to the root.
    /// `depth` is the number of directories between the root and the file.
    #[must_use]
    pub const fn new(label: String, relative_path: String, depth: usize) -> Self {
        Self {
            label,
            relative_path,
            depth,
        }
    }

    /// The display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The path of the file relative to the root, with `/` separators.
    #[must_use]
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// The number of directories between the root and this file.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// The directory components leading to this file.
    fn folders(&self) -> impl Iterator<Item = &str> {
        let mut parts: Vec<&str> = self.relative_path.split('/').collect();
        parts.pop();
        parts.into_iter()
    }
}

/// An ordered list of [`TocEntry`] in traversal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocDocument {
    header: String,
    entries: Vec<TocEntry>,
}

impl TocDocument {
    /// Creates a document with the given heading text.
    ///
    /// Entries are expected in traversal order: a directory's files before its
    /// subdirectories, and all of a directory's descendants contiguous.
    #[must_use]
    pub const fn new(header: String, entries: Vec<TocEntry>) -> Self {
        Self { header, entries }
    }

    /// The entries, in traversal order.
    #[must_use]
    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    /// The number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the document lists no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the document as a Markdown block.
    ///
    /// The block is wrapped in [`START_MARKER`] and [`END_MARKER`] so that it
    /// can be found again when the README is next updated. Folder lines are
    /// indented two spaces per level of depth, and file lines two spaces
    /// deeper than their folder.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!("{START_MARKER}\n# {}\n\n", self.header);
        let mut open: Vec<&str> = Vec::new();

        for entry in &self.entries {
            let folders: Vec<&str> = entry.folders().collect();
            let shared = open
                .iter()
                .zip(&folders)
                .take_while(|(a, b)| a == b)
                .count();

            for (level, folder) in folders.iter().enumerate().skip(shared) {
                let indent = "  ".repeat(level + 1);
                let _ = writeln!(out, "{indent}- {folder}/");
            }
            open = folders;

            let indent = "  ".repeat(entry.depth + 1);
            let _ = writeln!(
                out,
                "{indent}- [{}]({})",
                escape_label(&entry.label),
                encode_link(&entry.relative_path)
            );
        }

        out.push_str(END_MARKER);
        out.push('\n');
        out
    }
}

fn escape_label(label: &str) -> String {
    label.replace('[', "\\[").replace(']', "\\]")
}

fn encode_link(path: &str) -> String {
    path.replace(' ', "%20")
        .replace('(', "%28")
        .replace(')', "%29")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(label: &str, path: &str) -> TocEntry {
        let depth = path.matches('/').count();
        TocEntry::new(label.to_string(), path.to_string(), depth)
    }

    #[test]
    fn renders_nested_folders() {
        let doc = TocDocument::new(
            "Table of Contents".to_string(),
            vec![
                entry("a", "a.md"),
                entry("Sub B", "sub/b.md"),
                entry("c", "sub/deeper/c.md"),
                entry("d", "z/d.md"),
            ],
        );

        let expected = "\
<!-- toc:start -->
# Table of Contents

  - [a](a.md)
  - sub/
    - [Sub B](sub/b.md)
    - deeper/
      - [c](sub/deeper/c.md)
  - z/
    - [d](z/d.md)
<!-- toc:end -->
";
        assert_eq!(doc.render(), expected);
    }

    #[test]
    fn emits_ancestor_folders_without_files() {
        let doc = TocDocument::new(
            "Contents".to_string(),
            vec![entry("x", "docs/api/x.md"), entry("y", "docs/guide/y.md")],
        );

        let expected = "\
<!-- toc:start -->
# Contents

  - docs/
    - api/
      - [x](docs/api/x.md)
    - guide/
      - [y](docs/guide/y.md)
<!-- toc:end -->
";
        assert_eq!(doc.render(), expected);
    }

    #[test]
    fn empty_document_renders_header_only() {
        let doc = TocDocument::new("Table of Contents".to_string(), Vec::new());
        assert!(doc.is_empty());
        assert_eq!(
            doc.render(),
            "<!-- toc:start -->\n# Table of Contents\n\n<!-- toc:end -->\n"
        );
    }

    #[test]
    fn escapes_labels_and_links() {
        let doc = TocDocument::new(
            "Table of Contents".to_string(),
            vec![entry("[draft] notes", "my notes (old).md")],
        );
        assert!(
            doc.render()
                .contains("  - [\\[draft\\] notes](my%20notes%20%28old%29.md)\n")
        );
    }
}
