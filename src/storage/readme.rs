//! Merging a generated table of contents into README content.

use std::{
    io,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;

use crate::domain::toc::{END_MARKER, START_MARKER};

static LEGACY_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^# Table of Contents[ \t]*\r?$").expect("valid regex"));

static TOP_LEVEL_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^# ").expect("valid regex"));

/// Errors that can occur reading or writing the README.
#[derive(Debug, thiserror::Error)]
pub enum ReadmeError {
    /// The existing README could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// The README path.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// The README could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// The README path.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
}

/// The persisted README document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readme {
    path: PathBuf,
    content: String,
}

impl Readme {
    /// Reads the README at `path`.
    ///
    /// A missing file is treated as empty content.
    ///
    /// # Errors
    ///
    /// Returns [`ReadmeError::Read`] if the file exists but cannot be read.
    pub fn load(path: PathBuf) -> Result<Self, ReadmeError> {
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("{} does not exist yet", path.display());
                String::new()
            }
            Err(source) => return Err(ReadmeError::Read { path, source }),
        };
        Ok(Self { path, content })
    }

    /// Creates a README with the given content, not yet written to disk.
    #[must_use]
    pub const fn new(path: PathBuf, content: String) -> Self {
        Self { path, content }
    }

    /// The current content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Merge `toc` into the content, see [`update_readme`].
    ///
    /// Returns `true` if the content changed.
    pub fn apply_toc(&mut self, toc: &str) -> bool {
        let updated = update_readme(toc, &self.content);
        let changed = updated != self.content;
        self.content = updated;
        changed
    }

    /// Overwrites the file with the current content.
    ///
    /// # Errors
    ///
    /// Returns [`ReadmeError::Write`] if the file cannot be written.
    pub fn save(&self) -> Result<(), ReadmeError> {
        std::fs::write(&self.path, &self.content).map_err(|source| ReadmeError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// Merge a table of contents block into existing README content.
///
/// An existing block is located by the comment markers that
/// [`TocDocument::render`](crate::TocDocument::render) emits. READMEs written
/// before the markers existed are matched from a `# Table of Contents` line up
/// to the next level-one heading. A matched block is replaced in place; with
/// no match, `toc` is prepended followed by a blank line.
///
/// Applying the same `toc` twice gives the same result as applying it once.
#[must_use]
pub fn update_readme(toc: &str, existing: &str) -> String {
    if let Some((start, end)) = find_marked_block(existing) {
        return splice(&existing[..start], toc, &existing[end..]);
    }
    match find_legacy_block(existing) {
        // A start marker before the legacy block has no end marker, and would
        // otherwise pair with the end marker of the new block on the next run.
        Some((start, end)) => splice(
            &without_start_markers(&existing[..start]),
            toc,
            &existing[end..],
        ),
        None => splice("", toc, existing),
    }
}

fn find_marked_block(content: &str) -> Option<(usize, usize)> {
    let start = find_line(content, START_MARKER, 0)?;
    let end_marker = find_line(content, END_MARKER, start)?;
    let end = content[end_marker..]
        .find('\n')
        .map_or(content.len(), |i| end_marker + i + 1);
    Some((start, end))
}

fn find_legacy_block(content: &str) -> Option<(usize, usize)> {
    let header = LEGACY_HEADER.find(content)?;
    tracing::debug!("Found table of contents heading without markers");
    let end = TOP_LEVEL_HEADING
        .find_at(content, header.end())
        .map_or(content.len(), |m| m.start());
    Some((header.start(), end))
}

/// Byte offset of the first line at or after `from` whose trimmed text is
/// `needle`.
fn find_line(content: &str, needle: &str, from: usize) -> Option<usize> {
    let mut offset = from;
    for line in content[from..].split_inclusive('\n') {
        if line.trim() == needle {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}

fn without_start_markers(content: &str) -> String {
    content
        .split_inclusive('\n')
        .filter(|line| line.trim() != START_MARKER)
        .collect()
}

fn splice(before: &str, toc: &str, after: &str) -> String {
    let mut out = String::with_capacity(before.len() + toc.len() + after.len() + 2);
    out.push_str(before);
    out.push_str(toc.trim_end_matches('\n'));
    out.push('\n');

    let after = after.trim_start_matches(['\n', '\r']);
    if !after.is_empty() {
        out.push('\n');
        out.push_str(after);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOC: &str = "<!-- toc:start -->\n# Table of Contents\n\n  - [a](a.md)\n<!-- toc:end -->\n";

    #[test]
    fn prepends_when_no_block_exists() {
        let content = "Intro paragraph.\n\n# Project\n\nDetails.\n";
        let updated = update_readme(TOC, content);

        assert!(updated.starts_with(TOC));
        assert_eq!(updated, format!("{TOC}\n{content}"));
    }

    #[test]
    fn prepends_to_empty_content() {
        assert_eq!(update_readme(TOC, ""), TOC);
    }

    #[test]
    fn replaces_marked_block_in_place() {
        let content = "# Project\n\nIntro.\n\n<!-- toc:start -->\n# Table of Contents\n\n  - [old](old.md)\n<!-- toc:end -->\n\n## Usage\n\nRun it.\n";
        let updated = update_readme(TOC, content);

        assert_eq!(
            updated,
            format!("# Project\n\nIntro.\n\n{TOC}\n## Usage\n\nRun it.\n")
        );
    }

    #[test]
    fn replaces_legacy_block_up_to_next_heading() {
        let content = "# Table of Contents\n\n  - [old](old.md)\n\n# Notes\n\nKeep me.\n";
        let updated = update_readme(TOC, content);

        assert_eq!(updated, format!("{TOC}\n# Notes\n\nKeep me.\n"));
    }

    #[test]
    fn legacy_block_runs_to_end_of_content() {
        let content = "# Title\n\n# Table of Contents\n\n  - [old](old.md)\n";
        let updated = update_readme(TOC, content);

        assert_eq!(updated, format!("# Title\n\n{TOC}"));
    }

    #[test]
    fn update_is_idempotent() {
        let contents = [
            "",
            "plain text without headings\n",
            "# Project\n\nBody\n",
            "# Table of Contents\n\n  - [old](old.md)\n\n# Notes\n",
            "<!-- toc:start -->\n# Table of Contents\n<!-- toc:end -->\ntrailing",
            "no trailing newline",
            "<!-- toc:start -->\n# Table of Contents\n\n  - [old](old.md)\n\n# Notes\n",
            "# Project\n\n<!-- toc:start -->\nstray\n# Table of Contents\n\n# Notes\n",
        ];

        for content in contents {
            let once = update_readme(TOC, content);
            let twice = update_readme(TOC, &once);
            assert_eq!(once, twice, "not idempotent for {content:?}");
        }
    }

    #[test]
    fn unmatched_start_marker_before_legacy_block_is_dropped() {
        let content = "<!-- toc:start -->\n# Table of Contents\n\n  - [old](old.md)\n\n# Notes\n";
        let updated = update_readme(TOC, content);

        assert_eq!(updated, format!("{TOC}\n# Notes\n"));
        assert_eq!(updated.matches(START_MARKER).count(), 1);
    }

    #[test]
    fn start_marker_without_end_is_not_a_block() {
        let content = "<!-- toc:start -->\nstray\n";
        let updated = update_readme(TOC, content);
        assert_eq!(updated, format!("{TOC}\n{content}"));
    }

    #[test]
    fn load_missing_readme_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let readme = Readme::load(tmp.path().join("README.md")).unwrap();
        assert_eq!(readme.content(), "");
    }

    #[test]
    fn apply_and_save_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("README.md");
        std::fs::write(&path, "# Project\n").unwrap();

        let mut readme = Readme::load(path.clone()).unwrap();
        assert!(readme.apply_toc(TOC));
        readme.save().unwrap();

        let mut reloaded = Readme::load(path).unwrap();
        assert_eq!(reloaded.content(), format!("{TOC}\n# Project\n"));
        assert!(!reloaded.apply_toc(TOC));
    }

    #[test]
    fn save_to_missing_directory_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let readme = Readme::new(
            tmp.path().join("missing").join("README.md"),
            String::new(),
        );
        assert!(matches!(readme.save(), Err(ReadmeError::Write { .. })));
    }
}
