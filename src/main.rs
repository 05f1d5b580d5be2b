//! Command-line entry point for `readme-toc`.

use clap::Parser;

mod cli;

use cli::Cli;

fn main() -> anyhow::Result<()> {
    Cli::parse().run()
}
