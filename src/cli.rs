use std::path::{Path, PathBuf};

mod check;
mod compile;
mod print;
mod terminal;

use anyhow::Context;
use check::Check;
use clap::ArgAction;
use compile::Compile;
use print::Print;
use readme_toc::{Config, Directory, LabelPolicy, Readme, domain::CONFIG_FILE_NAME};
use terminal::Colorize;
use tracing::instrument;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    options: Options,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_default()
            .run(&self.options)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false)
            .with_writer(std::io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// Options shared by every command.
#[derive(Debug, Clone, clap::Args)]
struct Options {
    /// The root of the markdown tree
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    /// The output file, relative to the root [default: README.md]
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// How entry labels are derived (filename, heading) [default: heading]
    #[arg(short, long, value_name = "POLICY", global = true)]
    labels: Option<LabelPolicy>,
}

impl Options {
    /// Load the config file from the root and apply command-line overrides.
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = Config::load_from_root(&self.root)?;
        if let Some(output) = &self.output {
            config.output.clone_from(output);
        }
        if let Some(labels) = self.labels {
            config.labels = labels;
        }
        Ok(config)
    }

    fn directory(&self) -> anyhow::Result<Directory> {
        let config = self.config()?;
        Ok(Directory::new(self.root.clone(), config)?)
    }
}

#[derive(Debug, Default, clap::Parser)]
pub enum Command {
    /// Generate the table of contents and merge it into the README (default)
    ///
    /// A previously generated table of contents is replaced in place. If
    /// there is none, the table of contents is added to the top of the file.
    #[default]
    Update,

    /// Overwrite the README with a freshly generated table of contents
    Generate,

    /// Print the table of contents without touching the README
    Print(Print),

    /// Check whether the README's table of contents is up to date
    ///
    /// Exits with status 1 when the README would change.
    Check(Check),

    /// Concatenate every markdown file into the README
    Compile(Compile),

    /// Write a default configuration file to the root
    Init,
}

impl Command {
    fn run(self, options: &Options) -> anyhow::Result<()> {
        match self {
            Self::Update => Update::run(options)?,
            Self::Generate => Generate::run(options)?,
            Self::Print(command) => command.run(options)?,
            Self::Check(command) => command.run(options)?,
            Self::Compile(command) => command.run(options)?,
            Self::Init => Init::run(&options.root)?,
        }
        Ok(())
    }
}

struct Update;

impl Update {
    #[instrument(level = "debug")]
    fn run(options: &Options) -> anyhow::Result<()> {
        let directory = options.directory()?;
        let toc = directory.build_toc();

        let mut readme = Readme::load(directory.output_path())?;
        let changed = readme.apply_toc(&toc.render());

        let name = display_name(readme.path());
        if changed {
            readme.save()?;
            println!(
                "{}",
                format!("Table of Contents generated and {name} updated.").success()
            );
        } else {
            println!("{}", format!("{name} is already up to date.").dim());
        }
        println!("  {} entries", toc.len());
        Ok(())
    }
}

struct Generate;

impl Generate {
    #[instrument(level = "debug")]
    fn run(options: &Options) -> anyhow::Result<()> {
        let directory = options.directory()?;
        let toc = directory.build_toc();

        let readme = Readme::new(directory.output_path(), toc.render());
        readme.save()?;

        println!(
            "{}",
            format!(
                "{} with Table of Contents has been generated.",
                display_name(readme.path())
            )
            .success()
        );
        Ok(())
    }
}

struct Init;

impl Init {
    #[instrument]
    fn run(root: &Path) -> anyhow::Result<()> {
        let path = root.join(CONFIG_FILE_NAME);
        if path.exists() {
            anyhow::bail!(
                "Configuration already exists (found {})",
                path.display()
            );
        }

        Config::default()
            .save(&path)
            .with_context(|| format!("Failed to create {CONFIG_FILE_NAME}"))?;

        println!("Initialized configuration in {}", root.display());
        println!("  Created: {CONFIG_FILE_NAME}");
        Ok(())
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
