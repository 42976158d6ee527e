// autodeps-core/src/sink.rs
//! The build tool side of registration.
//!
//! [`BuildSink`] is what a configuration forwards accepted dependencies to.
//! [`RecordingSink`] keeps every call in memory so the result can be inspected
//! or printed.
use std::cell::{Ref, RefCell};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::rc::Rc;

use autodeps_common::dependency::Exclusion;
use autodeps_common::error::{AutodepsError, Result};
use serde::Serialize;
use tracing::debug;

/// A dependency object created by the build tool from a notation.
pub trait HostDependency {
    fn notation(&self) -> String;
    fn set_transitive(&mut self, transitive: bool);
}

pub trait BuildSink {
    type Handle: HostDependency;

    /// Creates a dependency object from `notation` without attaching it anywhere.
    fn create_dependency(&mut self, notation: &str) -> Result<Self::Handle>;

    /// Attaches `dependency` to `configuration`.
    fn add_dependency(&mut self, configuration: &str, dependency: &Self::Handle) -> Result<()>;

    /// Adds an exclusion rule to `configuration`.
    fn exclude(&mut self, configuration: &str, rule: &Exclusion) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedDependency {
    pub notation: String,
    pub transitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub because: Option<String>,
}

/// Shared handle onto a [`RecordedDependency`]; changes made after attaching
/// show up in the sink's records.
#[derive(Debug, Clone)]
pub struct RecordedHandle(Rc<RefCell<RecordedDependency>>);

impl RecordedHandle {
    fn new(notation: &str) -> Self {
        Self(Rc::new(RefCell::new(RecordedDependency {
            notation: notation.to_string(),
            transitive: true,
            because: None,
        })))
    }

    pub fn get(&self) -> Ref<'_, RecordedDependency> {
        self.0.borrow()
    }

    /// Records why this dependency was added.
    pub fn because(&mut self, reason: impl Into<String>) {
        self.0.borrow_mut().because = Some(reason.into());
    }
}

impl HostDependency for RecordedHandle {
    fn notation(&self) -> String {
        self.0.borrow().notation.clone()
    }

    fn set_transitive(&mut self, transitive: bool) {
        self.0.borrow_mut().transitive = transitive;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SinkEvent {
    Created {
        notation: String,
    },
    Added {
        configuration: String,
        notation: String,
    },
    Excluded {
        configuration: String,
        rule: Exclusion,
    },
}

#[derive(Debug, Default)]
struct RecordedConfiguration {
    dependencies: Vec<RecordedHandle>,
    exclusions: Vec<Exclusion>,
}

/// In-memory [`BuildSink`].
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Vec<SinkEvent>,
    configurations: BTreeMap<String, RecordedConfiguration>,
    rejected: HashSet<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes [`create_dependency`](BuildSink::create_dependency) fail for `notation`.
    pub fn reject(&mut self, notation: impl Into<String>) {
        self.rejected.insert(notation.into());
    }

    /// Every call received, in order.
    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    pub fn dependencies(&self, configuration: &str) -> Vec<RecordedDependency> {
        self.configurations
            .get(configuration)
            .map(|c| c.dependencies.iter().map(|h| h.get().clone()).collect())
            .unwrap_or_default()
    }

    pub fn exclusions(&self, configuration: &str) -> Vec<Exclusion> {
        self.configurations
            .get(configuration)
            .map(|c| c.exclusions.clone())
            .unwrap_or_default()
    }

    /// Current state of every configuration that received a call, by name.
    pub fn report(&self) -> SinkReport {
        SinkReport {
            configurations: self
                .configurations
                .iter()
                .map(|(name, c)| ConfigurationReport {
                    name: name.clone(),
                    dependencies: c.dependencies.iter().map(|h| h.get().clone()).collect(),
                    exclusions: c.exclusions.clone(),
                })
                .collect(),
        }
    }
}

impl BuildSink for RecordingSink {
    type Handle = RecordedHandle;

    fn create_dependency(&mut self, notation: &str) -> Result<Self::Handle> {
        if self.rejected.contains(notation) {
            return Err(AutodepsError::HostRejected {
                configuration: String::new(),
                notation: notation.to_string(),
                message: "notation rejected by recording sink".to_string(),
            });
        }
        debug!("Creating host dependency for '{}'", notation);
        self.events.push(SinkEvent::Created {
            notation: notation.to_string(),
        });
        Ok(RecordedHandle::new(notation))
    }

    fn add_dependency(&mut self, configuration: &str, dependency: &Self::Handle) -> Result<()> {
        self.events.push(SinkEvent::Added {
            configuration: configuration.to_string(),
            notation: dependency.notation(),
        });
        self.configurations
            .entry(configuration.to_string())
            .or_default()
            .dependencies
            .push(dependency.clone());
        Ok(())
    }

    fn exclude(&mut self, configuration: &str, rule: &Exclusion) -> Result<()> {
        self.events.push(SinkEvent::Excluded {
            configuration: configuration.to_string(),
            rule: rule.clone(),
        });
        self.configurations
            .entry(configuration.to_string())
            .or_default()
            .exclusions
            .push(rule.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationReport {
    pub name: String,
    pub dependencies: Vec<RecordedDependency>,
    pub exclusions: Vec<Exclusion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SinkReport {
    pub configurations: Vec<ConfigurationReport>,
}

impl SinkReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Renders the report as Gradle Kotlin DSL declarations.
impl fmt::Display for SinkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, configuration) in self.configurations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for dep in &configuration.dependencies {
                let mut body = Vec::new();
                if !dep.transitive {
                    body.push("isTransitive = false".to_string());
                }
                if let Some(reason) = &dep.because {
                    body.push(format!("because(\"{reason}\")"));
                }
                if body.is_empty() {
                    writeln!(f, "{}(\"{}\")", configuration.name, dep.notation)?;
                } else {
                    writeln!(f, "{}(\"{}\") {{", configuration.name, dep.notation)?;
                    for line in body {
                        writeln!(f, "    {line}")?;
                    }
                    writeln!(f, "}}")?;
                }
            }
            for rule in &configuration.exclusions {
                writeln!(
                    f,
                    "configurations[\"{}\"].exclude({rule})",
                    configuration.name
                )?;
            }
        }
        Ok(())
    }
}
