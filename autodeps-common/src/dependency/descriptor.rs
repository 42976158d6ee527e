// autodeps-common/src/dependency/descriptor.rs
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use super::exclusion::Exclusion;

/// Supplies a version whenever no explicit override has been set. Called on
/// every read, so the fallback may change over the descriptor's lifetime.
pub type VersionProvider = Rc<dyn Fn() -> String>;

/// The identity of a [`Dependency`]: its `group:artifact` coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DependencyKey {
    pub group: String,
    pub artifact: String,
}

impl fmt::Display for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.artifact)
    }
}

struct Inner {
    key: DependencyKey,
    default_version: VersionProvider,
    version: RefCell<Option<String>>,
    force: Cell<bool>,
    transitive: Cell<bool>,
    exclusions: RefCell<Vec<Exclusion>>,
    incompatible: RefCell<HashMap<DependencyKey, Option<String>>>,
}

/// Describes one library dependency and the policy it is added with.
///
/// A `Dependency` is a shared handle: clones refer to the same descriptor and
/// see each other's changes. Equality and hashing only look at the
/// `group:artifact` pair, so changing the version, flags or exclusions never
/// changes which set entry a descriptor matches.
///
/// The [`Display`](fmt::Display) output is the notation handed to the build
/// tool:
///
/// - `group:artifact:version`
/// - `group:artifact` when the version is empty
/// - `group:artifact:version!!` when [`force`](Dependency::force) is set,
///   which asks the build tool to enforce the version strictly
#[derive(Clone)]
pub struct Dependency(Rc<Inner>);

impl Dependency {
    /// Creates a descriptor pinned to `version`.
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        let version = version.into();
        Self::with_default_version(group, artifact, move || version.clone())
    }

    /// Creates a descriptor whose version falls back to `provider`.
    pub fn with_default_version(
        group: impl Into<String>,
        artifact: impl Into<String>,
        provider: impl Fn() -> String + 'static,
    ) -> Self {
        Self(Rc::new(Inner {
            key: DependencyKey {
                group: group.into(),
                artifact: artifact.into(),
            },
            default_version: Rc::new(provider),
            version: RefCell::new(None),
            force: Cell::new(false),
            transitive: Cell::new(true),
            exclusions: RefCell::new(Vec::new()),
            incompatible: RefCell::new(HashMap::new()),
        }))
    }

    /// Runs `f` against this descriptor immediately and hands it back.
    pub fn configure(self, f: impl FnOnce(&Dependency)) -> Self {
        f(&self);
        self
    }

    /// Overrides the version, then runs `f` against this descriptor.
    pub fn versioned(&self, version: impl Into<String>, f: impl FnOnce(&Dependency)) -> &Self {
        self.set_version(version);
        f(self);
        self
    }

    pub fn key(&self) -> &DependencyKey {
        &self.0.key
    }

    pub fn group(&self) -> &str {
        &self.0.key.group
    }

    pub fn artifact(&self) -> &str {
        &self.0.key.artifact
    }

    /// The explicit override if one was set, otherwise the provider's current value.
    pub fn version(&self) -> String {
        match self.0.version.borrow().as_ref() {
            Some(version) => version.clone(),
            None => (self.0.default_version)(),
        }
    }

    /// Last write wins. An empty version drops the version segment from the notation.
    pub fn set_version(&self, version: impl Into<String>) -> &Self {
        *self.0.version.borrow_mut() = Some(version.into());
        self
    }

    pub fn has_version_override(&self) -> bool {
        self.0.version.borrow().is_some()
    }

    pub fn force(&self) -> bool {
        self.0.force.get()
    }

    pub fn set_force(&self, force: bool) -> &Self {
        self.0.force.set(force);
        self
    }

    /// Whether transitive dependencies should be pulled in. True by default.
    pub fn transitive(&self) -> bool {
        self.0.transitive.get()
    }

    pub fn set_transitive(&self, transitive: bool) -> &Self {
        self.0.transitive.set(transitive);
        self
    }

    /// Excludes every module of `group` from this dependency's transitive dependencies.
    pub fn exclude_group(&self, group: impl Into<String>) -> &Self {
        self.0.exclusions.borrow_mut().push(Exclusion::group(group));
        self
    }

    /// Excludes a single module of `group` from this dependency's transitive dependencies.
    pub fn exclude_module(&self, group: impl Into<String>, module: impl Into<String>) -> &Self {
        self.0
            .exclusions
            .borrow_mut()
            .push(Exclusion::module(group, module));
        self
    }

    /// Exclusion rules in the order they were added, duplicates included.
    pub fn exclusions(&self) -> Vec<Exclusion> {
        self.0.exclusions.borrow().clone()
    }

    /// Declares that this must never share a configuration with `other`.
    ///
    /// Only recorded on this side; registration checks both directions.
    /// Declaring the same pair again replaces the reason.
    pub fn incompatible_with(&self, other: &Dependency, reason: Option<&str>) -> &Self {
        self.0
            .incompatible
            .borrow_mut()
            .insert(other.key().clone(), reason.map(str::to_owned));
        self
    }

    /// `Some(reason)` if this descriptor declared itself incompatible with `other`.
    pub fn incompatibility_with(&self, other: &Dependency) -> Option<Option<String>> {
        self.0.incompatible.borrow().get(other.key()).cloned()
    }

    /// The notation handed to the build tool. Re-reads the version each call.
    pub fn notation(&self) -> String {
        self.to_string()
    }

    /// Whether both handles refer to the same descriptor instance.
    pub fn ptr_eq(&self, other: &Dependency) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Dependency {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.key() == other.key()
    }
}

impl Eq for Dependency {}

impl Hash for Dependency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())?;
        let version = self.version();
        if !version.is_empty() {
            write!(f, ":{version}")?;
            if self.force() {
                f.write_str("!!")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dependency")
            .field("notation", &self.notation())
            .field("transitive", &self.transitive())
            .field("exclusions", &self.0.exclusions.borrow())
            .field("incompatible", &self.0.incompatible.borrow().len())
            .finish()
    }
}
