use clap::Parser;
use readme_toc::TocDocument;
use tracing::instrument;

use super::Options;

#[derive(Debug, Parser, Default)]
#[command(about = "Print the table of contents to stdout")]
pub struct Print {
    /// Output format (markdown, json)
    #[arg(long, short, value_name = "FORMAT", default_value = "markdown")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

impl Print {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, options: &Options) -> anyhow::Result<()> {
        let toc = options.directory()?.build_toc();
        print!("{}", Self::format(&toc, self.format)?);
        Ok(())
    }

    fn format(toc: &TocDocument, format: OutputFormat) -> anyhow::Result<String> {
        Ok(match format {
            OutputFormat::Markdown => toc.render(),
            OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(toc)?),
        })
    }
}
