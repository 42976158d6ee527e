use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use autodeps_common::dependency::{Dependency, Exclusion};
use autodeps_common::error::AutodepsError;
use autodeps_common::log::LogLevel;
use autodeps_core::sink::{RecordedDependency, SinkEvent};
use autodeps_core::{Configurations, Manifest, RecordingSink};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn catalog() -> Configurations<RecordingSink> {
    Configurations::new(RecordingSink::new(), LogLevel::Quiet)
}

#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn exclusive_pair() -> (Dependency, Dependency) {
    let x = Dependency::new("org.example", "x", "1.0");
    let y = Dependency::new("org.example", "y", "1.0");
    x.incompatible_with(&y, Some("reason"));
    (x, y)
}

#[test]
fn end_to_end_single_dependency() {
    let configurations = catalog();
    let lib = Dependency::new("org.example", "lib", "1.0");

    configurations.get("implementation").register(&lib).unwrap();
    configurations.get("implementation").register(&lib).unwrap();

    let sink = configurations.sink();
    assert_eq!(
        sink.dependencies("implementation"),
        vec![RecordedDependency {
            notation: "org.example:lib:1.0".to_string(),
            transitive: true,
            because: None,
        }]
    );
    assert!(sink.exclusions("implementation").is_empty());
    assert_eq!(sink.events().len(), 2);
}

#[test]
fn log_level_changes_reach_existing_configurations() {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let configurations = catalog();
        let api = configurations.get("api");

        api.register(&Dependency::new("g", "q", "1")).unwrap();
        assert_eq!(log.contents(), "");

        configurations.set_log_level(LogLevel::Warn);
        api.register(&Dependency::new("g", "w", "1")).unwrap();
    });

    let output = log.contents();
    let line = output
        .lines()
        .find(|line| line.contains("g:w:1"))
        .unwrap_or_else(|| panic!("no diagnostic for g:w:1 in {output:?}"));
    assert!(line.contains("WARN"), "{line}");
    assert!(line.contains("api"), "{line}");
    assert!(!output.contains("g:q:1"), "{output}");
}

#[rstest]
#[case::declaring_side_first(true)]
#[case::declaring_side_second(false)]
fn conflicts_are_detected_in_either_order(#[case] declaring_first: bool) {
    let configurations = catalog();
    let (x, y) = exclusive_pair();
    let (first, second) = if declaring_first { (&x, &y) } else { (&y, &x) };

    let api = configurations.get("api");
    api.register(first).unwrap();
    let err = api.register(second).unwrap_err();

    match err {
        AutodepsError::MutualExclusionConflict {
            first,
            second,
            reason,
        } => {
            assert_eq!(first, "org.example:x:1.0");
            assert_eq!(second, "org.example:y:1.0");
            assert_eq!(reason.as_deref(), Some("reason"));
        }
        other => panic!("expected a conflict, got {other:?}"),
    }
    assert_eq!(api.len(), 1);
}

#[test]
fn conflicts_are_scoped_to_one_configuration() {
    let configurations = catalog();
    let (x, y) = exclusive_pair();

    configurations.get("api").register(&x).unwrap();
    assert!(configurations.get("api").register(&y).is_err());

    let runtime = configurations.get("runtimeOnly");
    runtime.register(&x).unwrap();
    configurations.get("implementation").register(&y).unwrap();
    assert!(runtime.contains(&x));
}

#[test]
fn exclusions_are_replayed_in_insertion_order() {
    let configurations = catalog();
    let dep = Dependency::new("g", "a", "1").configure(|d| {
        d.exclude_group("foo").exclude_group("bar");
    });
    configurations.get("implementation").register(&dep).unwrap();

    let excluded: Vec<Exclusion> = configurations
        .sink()
        .events()
        .iter()
        .filter_map(|e| match e {
            SinkEvent::Excluded { rule, .. } => Some(rule.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(excluded, vec![Exclusion::group("foo"), Exclusion::group("bar")]);
}

#[test]
fn notation_is_taken_at_registration_time() {
    let configurations = catalog();
    let fallback = Rc::new(RefCell::new("9.9.9".to_string()));
    let source = Rc::clone(&fallback);
    let dep = Dependency::with_default_version("g", "a", move || source.borrow().clone());

    configurations.get("api").register(&dep).unwrap();
    *fallback.borrow_mut() = "10.0.0".to_string();
    configurations.get("implementation").register(&dep).unwrap();

    let sink = configurations.sink();
    assert_eq!(sink.dependencies("api")[0].notation, "g:a:9.9.9");
    assert_eq!(sink.dependencies("implementation")[0].notation, "g:a:10.0.0");
}

#[test]
fn manifest_applies_in_document_order() {
    let manifest = Manifest::parse(
        r#"
        [versions]
        core = "3.1"

        [dependencies.core]
        group = "org.example"
        artifact = "core"
        version-ref = "core"

        [dependencies.legacy]
        group = "org.example"
        artifact = "legacy"
        version = "0.9"
        incompatible-with = [{ dependency = "core", reason = "legacy shades core" }]

        [[apply]]
        configuration = "implementation"
        dependencies = ["core"]

        [[apply]]
        configuration = "testImplementation"
        dependencies = ["legacy"]
        "#,
    )
    .unwrap();
    manifest.set_version("core", "3.2").unwrap();

    let configurations = catalog();
    manifest.apply(&configurations).unwrap();

    assert_eq!(configurations.names(), vec!["implementation", "testImplementation"]);
    assert_eq!(
        configurations.sink().report().to_string(),
        "implementation(\"org.example:core:3.2\")\n\ntestImplementation(\"org.example:legacy:0.9\")\n"
    );
}

#[test]
fn manifest_conflict_stops_application() {
    let manifest = Manifest::parse(
        r#"
        [dependencies.core]
        group = "org.example"
        artifact = "core"
        version = "3.1"

        [dependencies.legacy]
        group = "org.example"
        artifact = "legacy"
        version = "0.9"
        incompatible-with = [{ dependency = "core" }]

        [dependencies.late]
        group = "org.example"
        artifact = "late"
        version = "1"

        [[apply]]
        configuration = "implementation"
        dependencies = ["core", "legacy", "late"]
        "#,
    )
    .unwrap();

    let configurations = catalog();
    let err = manifest.apply(&configurations).unwrap_err();
    assert_eq!(
        err.to_string(),
        "found mutually exclusive dependencies:\n\"org.example:legacy:0.9\" is mutually exclusive with \"org.example:core:3.1\""
    );
    assert_eq!(configurations.get("implementation").len(), 1);
}

#[test]
fn manifest_loads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("autodeps.toml");
    std::fs::write(
        &path,
        "[dependencies.a]\ngroup = \"g\"\nartifact = \"a\"\nversion = \"1\"\n",
    )
    .unwrap();

    let manifest = Manifest::load(&path).unwrap();
    assert_eq!(manifest.dependency("a").unwrap().notation(), "g:a:1");

    let missing = Manifest::load(&dir.path().join("missing.toml"));
    assert!(matches!(missing, Err(AutodepsError::Io(_))));
}
