//! Contains the logic for the `list` command.
use autodeps_common::config::Config;
use autodeps_common::error::Result;
use autodeps_core::Manifest;
use clap::Args;
use colored::Colorize;
use prettytable::{format, Cell, Row, Table};

use super::ManifestArgs;

#[derive(Args, Debug)]
pub struct List {
    #[command(flatten)]
    pub manifest: ManifestArgs,
}

impl List {
    pub fn run(&self, config: &Config) -> Result<()> {
        let manifest = self.manifest.load(config)?;
        if manifest.dependencies().next().is_none() {
            println!("{}", "0 dependencies declared".yellow());
            return Ok(());
        }
        table(&manifest).printstd();
        Ok(())
    }
}

fn table(manifest: &Manifest) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.add_row(Row::new(vec![
        Cell::new("Name").style_spec("b"),
        Cell::new("Notation").style_spec("b"),
        Cell::new("Transitive").style_spec("b"),
        Cell::new("Exclusions").style_spec("b"),
    ]));
    for (name, dependency) in manifest.dependencies() {
        let exclusions: Vec<String> = dependency
            .exclusions()
            .iter()
            .map(|rule| match rule.module_name() {
                Some(module) => format!("{}:{module}", rule.group_name()),
                None => rule.group_name().to_string(),
            })
            .collect();
        table.add_row(Row::new(vec![
            Cell::new(name),
            Cell::new(&dependency.notation()),
            Cell::new(if dependency.transitive() { "yes" } else { "no" }),
            Cell::new(&exclusions.join(", ")),
        ]));
    }
    table
}
