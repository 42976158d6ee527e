// autodeps/src/main.rs
use std::process;

use autodeps_common::config::Config;
use autodeps_common::error::Result as adResult;
use autodeps_common::style;
use clap::Parser;
use colored::Colorize;
use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod cli;
use cli::CliArgs;

fn main() -> adResult<()> {
    let cli_args = CliArgs::parse();

    if cli_args.no_color {
        style::set_enabled(false);
    }

    let level_filter = match cli_args.verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("AUTODEPS_LOG")
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(!cli_args.no_color)
        .with_target(false)
        .without_time()
        .try_init();

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            process::exit(1);
        }
    };
    if let Some(level) = cli_args.log_level {
        config.log_level = level;
    }
    debug!("Effective configuration: {:?}", config);

    if let Err(e) = cli_args.command.run(&config) {
        tracing::error!("Command failed: {:#}", e);
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        process::exit(1);
    }

    debug!("Command completed successfully.");
    Ok(())
}
