//! Markdown Table of Contents Generation
//!
//! Walks a directory of markdown files and maintains a table of contents in
//! its README.

pub mod domain;
pub use domain::{Config, ConfigError, LabelPolicy, TocDocument, TocEntry};

/// Filesystem traversal and README persistence.
pub mod storage;
pub use storage::{Directory, Readme, ReadmeError, TocError, build_toc, update_readme};
