// autodeps-common/src/dependency/mod.rs
pub mod descriptor;
pub mod exclusion;

pub use descriptor::{Dependency, DependencyKey, VersionProvider};
pub use exclusion::Exclusion;
