// autodeps-common/src/log.rs
//! Runtime-selectable log level for registration diagnostics.
//!
//! `tracing` macros take their level as a constant, so [`emit`] dispatches the
//! runtime [`LogLevel`] onto the matching static event.
use std::fmt;
use std::str::FromStr;

use tracing::{debug, error, info, trace, warn};

use crate::error::AutodepsError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LogLevel {
    /// Registration diagnostics are dropped.
    Quiet,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Quiet,
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quiet => "quiet",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = AutodepsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == wanted)
            .ok_or_else(|| {
                AutodepsError::Config(format!(
                    "unknown log level '{s}', expected one of: quiet, error, warn, info, debug, trace"
                ))
            })
    }
}

/// Emits `message` as a `tracing` event at `level`.
pub fn emit(level: LogLevel, message: &str) {
    match level {
        LogLevel::Quiet => {}
        LogLevel::Error => error!("{message}"),
        LogLevel::Warn => warn!("{message}"),
        LogLevel::Info => info!("{message}"),
        LogLevel::Debug => debug!("{message}"),
        LogLevel::Trace => trace!("{message}"),
    }
}
