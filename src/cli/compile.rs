use std::fmt::Write as _;

use clap::Parser;
use readme_toc::Readme;
use tracing::instrument;

use super::{Options, display_name, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Concatenate every markdown file into the README")]
pub struct Compile {
    /// The level-one heading placed at the top of the README
    #[arg(long, short, default_value = "Today I Learned")]
    title: String,
}

impl Compile {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, options: &Options) -> anyhow::Result<()> {
        let directory = options.directory()?;
        let paths = directory.markdown_paths();

        let mut content = format!("# {}\n\n", self.title);
        let mut included = 0usize;
        for path in &paths {
            match std::fs::read_to_string(path) {
                Ok(entry) => {
                    let _ = write!(content, "{}\n\n", entry.trim_end());
                    included += 1;
                }
                Err(e) => tracing::warn!("Skipping {}: {e}", path.display()),
            }
        }

        let readme = Readme::new(directory.output_path(), content);
        readme.save()?;

        println!(
            "{}",
            format!(
                "Compiled {included} of {} files into {}.",
                paths.len(),
                display_name(readme.path())
            )
            .success()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn compiles_entries_in_traversal_order() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("b.md"), "# B\n\nSecond\n").unwrap();
        std::fs::write(tmp.path().join("a.md"), "# A\n\nFirst\n").unwrap();
        std::fs::write(tmp.path().join("README.md"), "stale\n").unwrap();

        let options = Options {
            root: tmp.path().to_path_buf(),
            output: None,
            labels: None,
        };
        Compile {
            title: "Today I Learned".to_string(),
        }
        .run(&options)
        .unwrap();

        let readme = std::fs::read_to_string(tmp.path().join("README.md")).unwrap();
        assert_eq!(
            readme,
            "# Today I Learned\n\n# A\n\nFirst\n\n# B\n\nSecond\n\n"
        );
    }
}
