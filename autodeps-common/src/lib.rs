// autodeps-common/src/lib.rs
pub mod config;
pub mod dependency;
pub mod error;
pub mod log;
pub mod style;

// Re-export key types
pub use config::Config;
pub use dependency::{Dependency, DependencyKey, Exclusion};
pub use error::{AutodepsError, Result};
pub use log::LogLevel;
