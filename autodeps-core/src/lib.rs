// autodeps-core/src/lib.rs

// Declare the top-level modules within the library crate
pub mod configuration;
pub mod manifest;
pub mod scope;
pub mod sink;

// Re-export key types for easier use by the CLI crate
pub use configuration::{Configuration, Configurations};
pub use manifest::Manifest;
pub use scope::Scope;
pub use sink::{BuildSink, HostDependency, RecordingSink};
