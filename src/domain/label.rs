use std::{
    fmt,
    io::{self, BufRead},
    path::Path,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// How the display label of a table of contents entry is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPolicy {
    /// The file name without its extension.
    Filename,

    /// The text of the first level-one heading in the file.
    ///
    /// Falls back to the file name when the file has no such heading, or when
    /// it cannot be read.
    #[default]
    Heading,
}

impl LabelPolicy {
    /// Derive the label for the markdown file at `path`.
    ///
    /// Under [`LabelPolicy::Heading`] a read failure is logged and the
    /// filename label is used instead, so this never fails.
    #[must_use]
    pub fn label_for(self, path: &Path) -> String {
        match self {
            Self::Filename => file_stem_label(path),
            Self::Heading => match read_heading(path) {
                Ok(Some(heading)) => heading,
                Ok(None) => file_stem_label(path),
                Err(e) => {
                    tracing::warn!(
                        "Failed to read {}, falling back to filename label: {e}",
                        path.display()
                    );
                    file_stem_label(path)
                }
            },
        }
    }
}

impl fmt::Display for LabelPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filename => f.write_str("filename"),
            Self::Heading => f.write_str("heading"),
        }
    }
}

/// Error returned when parsing an unknown [`LabelPolicy`] name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown label policy '{0}' (expected 'filename' or 'heading')")]
pub struct UnknownPolicy(String);

impl FromStr for LabelPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "filename" => Ok(Self::Filename),
            "heading" => Ok(Self::Heading),
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}

/// The file name of `path` without its extension.
#[must_use]
pub fn file_stem_label(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Find the first line beginning with `# ` and return the text after it.
///
/// Deeper headings (`## `) and `#` without a following space do not match.
/// A matching heading with no text is ignored.
#[must_use]
pub fn first_heading(content: &str) -> Option<String> {
    content.lines().find_map(heading_text)
}

fn read_heading(path: &Path) -> io::Result<Option<String>> {
    let reader = io::BufReader::new(std::fs::File::open(path)?);
    for line in reader.lines() {
        if let Some(heading) = heading_text(&line?) {
            return Ok(Some(heading));
        }
    }
    Ok(None)
}

fn heading_text(line: &str) -> Option<String> {
    let text = line.strip_prefix("# ")?.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn first_heading_returns_title_text() {
        let content = "some preamble\n# My Title\n\n# Second\n";
        assert_eq!(first_heading(content).as_deref(), Some("My Title"));
    }

    #[test]
    fn deeper_headings_are_not_matched() {
        let content = "## Subsection\n#NoSpace\n### Deeper\n";
        assert_eq!(first_heading(content), None);
    }

    #[test]
    fn empty_heading_is_skipped() {
        let content = "# \n# Real Title\n";
        assert_eq!(first_heading(content).as_deref(), Some("Real Title"));
    }

    #[test]
    fn heading_with_crlf_line_endings() {
        let content = "# Windows Title\r\nbody\r\n";
        assert_eq!(first_heading(content).as_deref(), Some("Windows Title"));
    }

    #[test]
    fn heading_policy_reads_first_heading() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("notes.md");
        std::fs::write(&path, "# My Title\n\nBody text\n").unwrap();

        assert_eq!(LabelPolicy::Heading.label_for(&path), "My Title");
    }

    #[test]
    fn heading_policy_falls_back_to_file_stem() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("notes.md");
        std::fs::write(&path, "no headings here\n## not level one\n").unwrap();

        assert_eq!(LabelPolicy::Heading.label_for(&path), "notes");
    }

    #[test]
    fn unreadable_file_falls_back_to_file_stem() {
        let path = PathBuf::from("/definitely/not/here/missing.md");
        assert_eq!(LabelPolicy::Heading.label_for(&path), "missing");
    }

    #[test]
    fn filename_policy_ignores_heading() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("notes.md");
        std::fs::write(&path, "# My Title\n").unwrap();

        assert_eq!(LabelPolicy::Filename.label_for(&path), "notes");
    }

    #[test]
    fn parse_policy_names() {
        assert_eq!("heading".parse::<LabelPolicy>(), Ok(LabelPolicy::Heading));
        assert_eq!("Filename".parse::<LabelPolicy>(), Ok(LabelPolicy::Filename));
        assert!("title".parse::<LabelPolicy>().is_err());
    }
}
