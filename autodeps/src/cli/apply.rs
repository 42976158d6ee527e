//! Contains the logic for the `apply` command.
use autodeps_common::config::Config;
use autodeps_common::error::Result;
use autodeps_core::{Configurations, Manifest, RecordingSink};
use clap::{Args, ValueEnum};

use super::ManifestArgs;

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Gradle Kotlin DSL declarations
    #[default]
    Dsl,
    Json,
}

#[derive(Args, Debug)]
pub struct Apply {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Dsl)]
    pub format: OutputFormat,
}

impl Apply {
    pub fn run(&self, config: &Config) -> Result<()> {
        let manifest = self.manifest.load(config)?;
        let output = render(&manifest, config, self.format)?;
        print!("{output}");
        Ok(())
    }
}

pub fn render(manifest: &Manifest, config: &Config, format: OutputFormat) -> Result<String> {
    let configurations = Configurations::new(RecordingSink::new(), config.log_level);
    manifest.apply(&configurations)?;
    let report = configurations.sink().report();
    tracing::debug!("Recorded {} configurations", report.configurations.len());
    match format {
        OutputFormat::Dsl => Ok(report.to_string()),
        OutputFormat::Json => Ok(format!("{}\n", report.to_json()?)),
    }
}
