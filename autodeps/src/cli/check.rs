//! Contains the logic for the `check` command.
use autodeps_common::config::Config;
use autodeps_common::error::Result;
use autodeps_core::{Configurations, Manifest, RecordingSink};
use clap::Args;
use colored::Colorize;

use super::ManifestArgs;

#[derive(Args, Debug)]
pub struct Check {
    #[command(flatten)]
    pub manifest: ManifestArgs,
}

/// What a successful check registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckSummary {
    pub configurations: usize,
    pub registrations: usize,
}

impl Check {
    pub fn run(&self, config: &Config) -> Result<()> {
        let manifest = self.manifest.load(config)?;
        let summary = check(&manifest, config)?;
        println!(
            "{} {} registrations across {} configurations",
            "ok:".green().bold(),
            summary.registrations,
            summary.configurations
        );
        Ok(())
    }
}

pub fn check(manifest: &Manifest, config: &Config) -> Result<CheckSummary> {
    let configurations = Configurations::new(RecordingSink::new(), config.log_level);
    manifest.apply(&configurations)?;
    let names = configurations.names();
    let registrations = names.iter().map(|n| configurations.get(n).len()).sum();
    Ok(CheckSummary {
        configurations: names.len(),
        registrations,
    })
}
