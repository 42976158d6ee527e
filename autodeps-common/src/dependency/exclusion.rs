// autodeps-common/src/dependency/exclusion.rs
use std::fmt;

use serde::Serialize;

/// A rule removing matching modules from a dependency's transitive closure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Exclusion {
    /// Narrower than [`Exclusion::Group`]: only `module` within `group`.
    Module { group: String, module: String },
    Group { group: String },
}

impl Exclusion {
    pub fn group(group: impl Into<String>) -> Self {
        Self::Group {
            group: group.into(),
        }
    }

    pub fn module(group: impl Into<String>, module: impl Into<String>) -> Self {
        Self::Module {
            group: group.into(),
            module: module.into(),
        }
    }

    pub fn group_name(&self) -> &str {
        match self {
            Self::Group { group } | Self::Module { group, .. } => group,
        }
    }

    pub fn module_name(&self) -> Option<&str> {
        match self {
            Self::Group { .. } => None,
            Self::Module { module, .. } => Some(module),
        }
    }
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Group { group } => write!(f, "group = \"{group}\""),
            Self::Module { group, module } => {
                write!(f, "group = \"{group}\", module = \"{module}\"")
            }
        }
    }
}
