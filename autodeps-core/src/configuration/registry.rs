// autodeps-core/src/configuration/registry.rs
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use autodeps_common::dependency::Dependency;
use autodeps_common::error::{AutodepsError, Result};
use autodeps_common::log::{self, LogLevel};
use autodeps_common::style;
use tracing::debug;

use crate::sink::{BuildSink, HostDependency};

/// One named configuration of the build tool, e.g. `implementation`.
///
/// Tracks which dependencies have been registered into it and refuses any
/// dependency that is incompatible, in either declared direction, with one
/// already registered. Obtained through
/// [`Configurations::get`](super::Configurations::get).
pub struct Configuration<S: BuildSink> {
    name: String,
    log_level: Rc<Cell<LogLevel>>,
    sink: Rc<RefCell<S>>,
    // Hash and Eq only read the immutable `DependencyKey`.
    #[allow(clippy::mutable_key_type)]
    applied: RefCell<HashSet<Dependency>>,
}

#[allow(clippy::mutable_key_type)]
impl<S: BuildSink> Configuration<S> {
    pub(crate) fn new(name: String, log_level: Rc<Cell<LogLevel>>, sink: Rc<RefCell<S>>) -> Self {
        Self {
            name,
            log_level,
            sink,
            applied: RefCell::new(HashSet::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The level registrations are currently reported at, shared with the owning catalog.
    pub fn log_level(&self) -> LogLevel {
        self.log_level.get()
    }

    /// Adds `dependency` to this configuration.
    ///
    /// See [`register_with`](Self::register_with).
    pub fn register(&self, dependency: &Dependency) -> Result<()> {
        self.register_with(dependency, |_| {})
    }

    /// Adds `dependency` to this configuration, then invokes `post_apply` on
    /// the dependency object created by the build tool.
    ///
    /// Registering a dependency that is already present is a no-op; the
    /// first registration stays authoritative even if the descriptor has
    /// changed since. A dependency that conflicts with one already present
    /// fails with [`AutodepsError::MutualExclusionConflict`] and leaves this
    /// configuration untouched. Once the conflict check passes the dependency
    /// counts as registered, even if the build tool then rejects it.
    pub fn register_with(
        &self,
        dependency: &Dependency,
        post_apply: impl FnOnce(&mut S::Handle),
    ) -> Result<()> {
        if self.applied.borrow().contains(dependency) {
            debug!(
                "'{}' already registered in '{}', skipping",
                dependency.key(),
                self.name
            );
            return Ok(());
        }

        self.check_conflicts(dependency)?;
        self.applied.borrow_mut().insert(dependency.clone());

        let notation = dependency.notation();
        log::emit(self.log_level.get(), &self.diagnostic(&notation));

        let mut handle = self
            .forward(dependency, &notation)
            .map_err(|e| self.attribute(e))?;
        post_apply(&mut handle);
        Ok(())
    }

    /// Whether a dependency with the same coordinates has been registered here.
    pub fn contains(&self, dependency: &Dependency) -> bool {
        self.applied.borrow().contains(dependency)
    }

    /// Registered dependencies, ordered by coordinates.
    pub fn applied(&self) -> Vec<Dependency> {
        let mut applied: Vec<Dependency> = self.applied.borrow().iter().cloned().collect();
        applied.sort_by(|a, b| a.key().cmp(b.key()));
        applied
    }

    pub fn len(&self) -> usize {
        self.applied.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.applied.borrow().is_empty()
    }

    /// The candidate's own declarations are checked first, so its reason
    /// wins when both sides declared the pair.
    fn check_conflicts(&self, candidate: &Dependency) -> Result<()> {
        let applied = self.applied.borrow();
        for present in applied.iter() {
            if let Some(reason) = candidate.incompatibility_with(present) {
                return Err(conflict(candidate, present, reason));
            }
        }
        for present in applied.iter() {
            if let Some(reason) = present.incompatibility_with(candidate) {
                return Err(conflict(present, candidate, reason));
            }
        }
        Ok(())
    }

    fn forward(&self, dependency: &Dependency, notation: &str) -> Result<S::Handle> {
        let mut sink = self.sink.borrow_mut();
        let mut handle = sink.create_dependency(notation)?;
        handle.set_transitive(dependency.transitive());
        sink.add_dependency(&self.name, &handle)?;
        for rule in dependency.exclusions() {
            sink.exclude(&self.name, &rule)?;
        }
        Ok(handle)
    }

    fn diagnostic(&self, notation: &str) -> String {
        format!("{}({})", style::sym(&self.name), style::string(notation))
    }

    /// Fills in this configuration's name on host errors raised before the
    /// sink knew which configuration it was working for.
    fn attribute(&self, err: AutodepsError) -> AutodepsError {
        match err {
            AutodepsError::HostRejected {
                configuration,
                notation,
                message,
            } if configuration.is_empty() => AutodepsError::HostRejected {
                configuration: self.name.clone(),
                notation,
                message,
            },
            other => other,
        }
    }
}

fn conflict(first: &Dependency, second: &Dependency, reason: Option<String>) -> AutodepsError {
    AutodepsError::MutualExclusionConflict {
        first: first.notation(),
        second: second.notation(),
        reason,
    }
}

impl<S: BuildSink> fmt::Display for Configuration<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl<S: BuildSink> fmt::Debug for Configuration<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("name", &self.name)
            .field("applied", &self.applied())
            .finish()
    }
}
