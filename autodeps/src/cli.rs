// autodeps/src/cli.rs
//! Defines the command-line argument structure using clap.
use std::path::PathBuf;

use autodeps_common::config::Config;
use autodeps_common::error::{AutodepsError, Result};
use autodeps_common::log::LogLevel;
use autodeps_core::Manifest;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::debug;

// Module declarations
pub mod apply;
pub mod check;
pub mod list;

use crate::cli::apply::Apply;
use crate::cli::check::Check;
use crate::cli::list::List;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "autodeps", bin_name = "autodeps")]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Level each registration is reported at [env: AUTODEPS_LOG_LEVEL]
    #[arg(long, global = true, value_parser = parse_log_level)]
    pub log_level: Option<LogLevel>,

    /// Disable coloured output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register every dependency and print the resulting declarations
    Apply(Apply),
    /// Register every dependency and report conflicts only
    Check(Check),
    /// Show every declared dependency
    List(List),
}

impl Command {
    pub fn run(&self, config: &Config) -> Result<()> {
        match self {
            Self::Apply(command) => command.run(config),
            Self::Check(command) => command.run(config),
            Self::List(command) => command.run(config),
        }
    }
}

/// Manifest selection shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ManifestArgs {
    /// Manifest to read [env: AUTODEPS_MANIFEST] [default: autodeps.toml]
    pub manifest: Option<PathBuf>,

    /// Override a named version from the manifest's [versions] table
    #[arg(long = "set-version", value_name = "NAME=VALUE", value_parser = parse_version_override)]
    pub set_version: Vec<(String, String)>,
}

impl ManifestArgs {
    pub fn load(&self, config: &Config) -> Result<Manifest> {
        let path = self
            .manifest
            .as_deref()
            .unwrap_or_else(|| config.manifest_path());
        let manifest = Manifest::load(path).map_err(|e| match e {
            AutodepsError::Io(io) => AutodepsError::Manifest(format!(
                "could not read manifest {}: {io}",
                path.display()
            )),
            other => other,
        })?;
        for (name, value) in &self.set_version {
            debug!("Overriding version '{}' with '{}'", name, value);
            manifest.set_version(name, value.as_str())?;
        }
        Ok(manifest)
    }
}

fn parse_log_level(s: &str) -> std::result::Result<LogLevel, String> {
    s.parse().map_err(|e: AutodepsError| e.to_string())
}

fn parse_version_override(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{s}'")),
    }
}
