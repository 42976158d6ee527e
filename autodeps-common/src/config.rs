// autodeps-common/src/config.rs
use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::Result;
use crate::log::LogLevel;

const DEFAULT_MANIFEST_FILENAME: &str = "autodeps.toml";
pub const LOG_LEVEL_ENV: &str = "AUTODEPS_LOG_LEVEL";
pub const MANIFEST_ENV: &str = "AUTODEPS_MANIFEST";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Level at which each registration is reported.
    pub log_level: LogLevel,
    pub manifest_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_FILENAME),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        debug!("Loading autodeps configuration");
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let lookup = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());
        let mut config = Self::default();

        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            config.log_level = level.parse()?;
        } else {
            debug!(
                "{} not set, falling back to default: {}",
                LOG_LEVEL_ENV, config.log_level
            );
        }

        if let Some(path) = lookup(MANIFEST_ENV) {
            config.manifest_path = PathBuf::from(path);
        }
        debug!(
            "Effective manifest path set to: {}",
            config.manifest_path.display()
        );

        debug!("Configuration loaded successfully.");
        Ok(config)
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }
}
