//! Domain models for table of contents generation.
//!
//! This module contains the core types: the generated table of contents,
//! label derivation policies, and configuration.

mod config;
pub use config::{CONFIG_FILE_NAME, Config, ConfigError};

/// Label derivation for table of contents entries.
pub mod label;
pub use label::LabelPolicy;

pub mod toc;
pub use toc::{TocDocument, TocEntry};
