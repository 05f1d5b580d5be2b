pub mod directory;
/// Reading, merging and writing the README.
pub mod readme;

pub use directory::{Directory, TocError, build_toc};
pub use readme::{Readme, ReadmeError, update_readme};
