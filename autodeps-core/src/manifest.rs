// autodeps-core/src/manifest.rs
//! TOML description of dependencies and the configurations they go into.
//!
//! ```toml
//! [versions]
//! kotlin = "2.3.0"
//!
//! [dependencies.stdlib]
//! group = "org.jetbrains.kotlin"
//! artifact = "kotlin-stdlib"
//! version-ref = "kotlin"
//! exclude = ["org.jetbrains"]
//! incompatible-with = [{ dependency = "stdlib-jdk7", reason = "merged into stdlib" }]
//!
//! [[apply]]
//! configuration = "implementation"
//! dependencies = ["stdlib"]
//! ```
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use autodeps_common::dependency::Dependency;
use autodeps_common::error::{AutodepsError, Result};
use serde::Deserialize;
use tracing::debug;

use crate::configuration::Configurations;
use crate::sink::BuildSink;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ManifestFile {
    #[serde(default)]
    versions: BTreeMap<String, String>,
    #[serde(default)]
    dependencies: BTreeMap<String, DependencySpec>,
    #[serde(default)]
    apply: Vec<Application>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct DependencySpec {
    group: String,
    artifact: String,
    version: Option<String>,
    version_ref: Option<String>,
    #[serde(default)]
    force: bool,
    #[serde(default = "default_transitive")]
    transitive: bool,
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    exclude_modules: Vec<ModuleExclusion>,
    #[serde(default)]
    incompatible_with: Vec<Incompatibility>,
}

fn default_transitive() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModuleExclusion {
    group: String,
    module: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Incompatibility {
    dependency: String,
    reason: Option<String>,
}

/// One `[[apply]]` entry: dependencies to register into a configuration, in order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Application {
    pub configuration: String,
    pub dependencies: Vec<String>,
}

pub struct Manifest {
    versions: Rc<RefCell<BTreeMap<String, String>>>,
    dependencies: BTreeMap<String, Dependency>,
    applications: Vec<Application>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading manifest from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let file: ManifestFile = toml::from_str(content)?;
        let versions = Rc::new(RefCell::new(file.versions));

        let mut dependencies = BTreeMap::new();
        for (name, spec) in &file.dependencies {
            let dependency = build_dependency(name, spec, &versions)?;
            dependencies.insert(name.clone(), dependency);
        }

        // Edges need every descriptor to exist first.
        for (name, spec) in &file.dependencies {
            let dependency = &dependencies[name];
            for edge in &spec.incompatible_with {
                let other = dependencies.get(&edge.dependency).ok_or_else(|| {
                    AutodepsError::Manifest(format!(
                        "dependency '{name}' is declared incompatible with unknown dependency '{}'",
                        edge.dependency
                    ))
                })?;
                dependency.incompatible_with(other, edge.reason.as_deref());
            }
        }

        for application in &file.apply {
            if let Some(unknown) = application
                .dependencies
                .iter()
                .find(|d| !dependencies.contains_key(*d))
            {
                return Err(AutodepsError::Manifest(format!(
                    "configuration '{}' applies unknown dependency '{unknown}'",
                    application.configuration
                )));
            }
        }

        debug!(
            "Manifest declares {} dependencies and {} applications",
            dependencies.len(),
            file.apply.len()
        );
        Ok(Self {
            versions,
            dependencies,
            applications: file.apply,
        })
    }

    /// Changes a named version. Dependencies referring to it without an
    /// explicit override pick the new value up on their next read.
    pub fn set_version(&self, name: &str, value: impl Into<String>) -> Result<()> {
        let mut versions = self.versions.borrow_mut();
        match versions.get_mut(name) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(AutodepsError::Manifest(format!("unknown version '{name}'"))),
        }
    }

    pub fn version(&self, name: &str) -> Option<String> {
        self.versions.borrow().get(name).cloned()
    }

    pub fn dependency(&self, name: &str) -> Option<&Dependency> {
        self.dependencies.get(name)
    }

    /// Declared dependencies by manifest name.
    pub fn dependencies(&self) -> impl Iterator<Item = (&str, &Dependency)> {
        self.dependencies.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    /// Registers every `[[apply]]` entry in document order, stopping at the first error.
    pub fn apply<S: BuildSink>(&self, configurations: &Configurations<S>) -> Result<()> {
        for application in &self.applications {
            let configuration = configurations.get(&application.configuration);
            for name in &application.dependencies {
                configuration.register(&self.dependencies[name])?;
            }
        }
        Ok(())
    }
}

fn build_dependency(
    name: &str,
    spec: &DependencySpec,
    versions: &Rc<RefCell<BTreeMap<String, String>>>,
) -> Result<Dependency> {
    let dependency = match (&spec.version, &spec.version_ref) {
        (Some(_), Some(_)) => {
            return Err(AutodepsError::Manifest(format!(
                "dependency '{name}' sets both 'version' and 'version-ref'"
            )))
        }
        (Some(version), None) => Dependency::new(&spec.group, &spec.artifact, version),
        (None, Some(reference)) => {
            if !versions.borrow().contains_key(reference) {
                return Err(AutodepsError::Manifest(format!(
                    "dependency '{name}' refers to unknown version '{reference}'"
                )));
            }
            let versions = Rc::clone(versions);
            let reference = reference.clone();
            Dependency::with_default_version(&spec.group, &spec.artifact, move || {
                versions.borrow().get(&reference).cloned().unwrap_or_default()
            })
        }
        (None, None) => Dependency::new(&spec.group, &spec.artifact, ""),
    };

    dependency
        .set_force(spec.force)
        .set_transitive(spec.transitive);
    for group in &spec.exclude {
        dependency.exclude_group(group);
    }
    for rule in &spec.exclude_modules {
        dependency.exclude_module(&rule.group, &rule.module);
    }
    Ok(dependency)
}

#[cfg(test)]
mod tests {
    use autodeps_common::dependency::Exclusion;
    use pretty_assertions::assert_eq;

    use super::*;

    const SAMPLE: &str = r#"
        [versions]
        kotlin = "2.3.0"

        [dependencies.stdlib]
        group = "org.jetbrains.kotlin"
        artifact = "kotlin-stdlib"
        version-ref = "kotlin"
        exclude = ["org.jetbrains"]
        exclude-modules = [{ group = "org.jetbrains", module = "annotations" }]

        [dependencies.bom]
        group = "org.example"
        artifact = "bom"

        [dependencies.pinned]
        group = "org.example"
        artifact = "pinned"
        version = "1.0"
        force = true
        transitive = false
        incompatible-with = [{ dependency = "bom", reason = "bom pins its own" }]

        [[apply]]
        configuration = "implementation"
        dependencies = ["stdlib", "pinned"]
    "#;

    #[test]
    fn builds_descriptors() {
        let manifest = Manifest::parse(SAMPLE).unwrap();
        let stdlib = manifest.dependency("stdlib").unwrap();
        assert_eq!(stdlib.notation(), "org.jetbrains.kotlin:kotlin-stdlib:2.3.0");
        assert_eq!(
            stdlib.exclusions(),
            vec![
                Exclusion::group("org.jetbrains"),
                Exclusion::module("org.jetbrains", "annotations"),
            ]
        );

        let pinned = manifest.dependency("pinned").unwrap();
        assert_eq!(pinned.notation(), "org.example:pinned:1.0!!");
        assert!(!pinned.transitive());
        let bom = manifest.dependency("bom").unwrap();
        assert_eq!(bom.notation(), "org.example:bom");
        assert_eq!(
            pinned.incompatibility_with(bom),
            Some(Some("bom pins its own".to_string()))
        );
        assert_eq!(manifest.applications().len(), 1);
    }

    #[test]
    fn version_ref_follows_later_overrides() {
        let manifest = Manifest::parse(SAMPLE).unwrap();
        manifest.set_version("kotlin", "2.4.0").unwrap();
        assert_eq!(manifest.dependency("stdlib").unwrap().version(), "2.4.0");
        assert_eq!(manifest.version("kotlin").as_deref(), Some("2.4.0"));
    }

    #[test]
    fn unknown_version_override_is_rejected() {
        let manifest = Manifest::parse(SAMPLE).unwrap();
        assert!(matches!(
            manifest.set_version("scala", "3"),
            Err(AutodepsError::Manifest(_))
        ));
    }

    #[test]
    fn rejects_both_version_forms() {
        let err = Manifest::parse(
            r#"
            [versions]
            v = "1"
            [dependencies.a]
            group = "g"
            artifact = "a"
            version = "1"
            version-ref = "v"
            "#,
        )
        .err()
        .unwrap();
        assert!(err.to_string().contains("both"));
    }

    #[test]
    fn rejects_unknown_references() {
        let unknown_version = Manifest::parse(
            r#"
            [dependencies.a]
            group = "g"
            artifact = "a"
            version-ref = "missing"
            "#,
        );
        assert!(matches!(unknown_version, Err(AutodepsError::Manifest(_))));

        let unknown_edge = Manifest::parse(
            r#"
            [dependencies.a]
            group = "g"
            artifact = "a"
            incompatible-with = [{ dependency = "ghost" }]
            "#,
        );
        assert!(matches!(unknown_edge, Err(AutodepsError::Manifest(_))));

        let unknown_apply = Manifest::parse(
            r#"
            [[apply]]
            configuration = "api"
            dependencies = ["ghost"]
            "#,
        );
        assert!(matches!(unknown_apply, Err(AutodepsError::Manifest(_))));
    }

    #[test]
    fn syntax_errors_surface_as_toml_errors() {
        let result = Manifest::parse("[dependencies.a\ngroup = ");
        assert!(matches!(result, Err(AutodepsError::Toml(_))));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = Manifest::parse(
            r#"
            [dependencies.a]
            group = "g"
            artifact = "a"
            transitiv = false
            "#,
        );
        assert!(matches!(result, Err(AutodepsError::Toml(_))));
    }
}
