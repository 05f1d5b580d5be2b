use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::LabelPolicy;

/// The name of the optional configuration file in the root directory.
pub const CONFIG_FILE_NAME: &str = ".readme-toc.toml";

/// Configuration for table of contents generation.
///
/// This struct controls how the directory tree is walked, how labels are
/// derived, and where the result is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// How entry labels are derived.
    pub labels: LabelPolicy,

    /// The name of the output file, relative to the root.
    ///
    /// This file is excluded from the table of contents.
    pub output: PathBuf,

    /// The text of the table of contents heading.
    ///
    /// Rendered as a level-one heading, for example `# Table of Contents`.
    pub header: String,

    /// Whether to descend into directories whose names start with `.`.
    pub include_hidden: bool,

    /// Directory names that are never descended into.
    pub ignore: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            labels: LabelPolicy::default(),
            output: default_output(),
            header: default_header(),
            include_hidden: false,
            ignore: Vec::new(),
        }
    }
}

/// Errors that can occur loading or saving a [`Config`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file exists but could not be read or written.
    #[error("failed to access config file {path}: {source}")]
    Io {
        /// The config file path.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has the wrong shape.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// The config file path.
        path: PathBuf,
        /// The underlying error.
        source: toml::de::Error,
    },

    /// The config could not be serialised.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the configuration from the config file in `root`.
    ///
    /// A missing config file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed.
    pub fn load_from_root(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE_NAME);
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Checks whether a directory with the given name should be skipped.
    #[must_use]
    pub fn is_ignored_dir(&self, name: &str) -> bool {
        (!self.include_hidden && name.starts_with('.')) || self.ignore.iter().any(|i| i == name)
    }
}

fn default_output() -> PathBuf {
    PathBuf::from("README.md")
}

fn default_header() -> String {
    "Table of Contents".to_string()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        labels: LabelPolicy,

        #[serde(default = "default_output")]
        output: PathBuf,

        #[serde(default = "default_header")]
        header: String,

        #[serde(default)]
        include_hidden: bool,

        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        ignore: Vec<String>,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                labels,
                output,
                header,
                include_hidden,
                ignore,
            } => Self {
                labels,
                output,
                header,
                include_hidden,
                ignore,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            labels: config.labels,
            output: config.output,
            header: config.header,
            include_hidden: config.include_hidden,
            ignore: config.ignore,
        }
    }
}
