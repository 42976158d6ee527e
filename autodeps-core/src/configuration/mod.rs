// autodeps-core/src/configuration/mod.rs
pub mod catalog;
pub mod registry;

pub use catalog::Configurations;
pub use registry::Configuration;
