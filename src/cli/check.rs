use std::process;

use clap::Parser;
use readme_toc::{Readme, update_readme};
use tracing::instrument;

use super::{Options, display_name, terminal::Colorize};

#[derive(Debug, Parser, Default)]
#[command(about = "Check whether the README's table of contents is up to date")]
pub struct Check {
    /// Suppress output, only set the exit code
    #[arg(long, short)]
    quiet: bool,
}

impl Check {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, options: &Options) -> anyhow::Result<()> {
        let directory = options.directory()?;
        let toc = directory.build_toc().render();
        let readme = Readme::load(directory.output_path())?;
        let name = display_name(readme.path());

        if is_current(&toc, readme.content()) {
            if !self.quiet {
                println!("{}", format!("{name} is up to date.").success());
            }
            return Ok(());
        }

        if !self.quiet {
            println!(
                "{}",
                format!("{name} is out of date. Run 'readme-toc update' to refresh it.").warning()
            );
        }
        process::exit(1);
    }
}

fn is_current(toc: &str, content: &str) -> bool {
    update_readme(toc, content) == content
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOC: &str = "<!-- toc:start -->\n# Table of Contents\n\n  - [a](a.md)\n<!-- toc:end -->\n";

    #[test]
    fn current_readme_is_detected() {
        let content = update_readme(TOC, "# Project\n");
        assert!(is_current(TOC, &content));
    }

    #[test]
    fn stale_readme_is_detected() {
        let content = update_readme(TOC, "# Project\n");
        let newer = TOC.replace("[a](a.md)", "[b](b.md)");
        assert!(!is_current(&newer, &content));
        assert!(!is_current(TOC, "# Project\n"));
    }
}
