// autodeps-core/src/scope.rs
//! Named accessors for the configurations every JVM project has.
use std::rc::Rc;

use autodeps_common::log::LogLevel;

use crate::configuration::{Configuration, Configurations};
use crate::sink::BuildSink;

pub const IMPLEMENTATION: &str = "implementation";
pub const API: &str = "api";
pub const RUNTIME_ONLY: &str = "runtimeOnly";
pub const COMPILE_ONLY: &str = "compileOnly";
pub const TEST_IMPLEMENTATION: &str = "testImplementation";
pub const TEST_RUNTIME_ONLY: &str = "testRuntimeOnly";
pub const TEST_COMPILE_ONLY: &str = "testCompileOnly";

pub const STANDARD_CONFIGURATIONS: [&str; 7] = [
    IMPLEMENTATION,
    API,
    RUNTIME_ONLY,
    COMPILE_ONLY,
    TEST_IMPLEMENTATION,
    TEST_RUNTIME_ONLY,
    TEST_COMPILE_ONLY,
];

pub struct Scope<S: BuildSink> {
    configurations: Configurations<S>,
}

impl<S: BuildSink> Scope<S> {
    pub fn new(sink: S, log_level: LogLevel) -> Self {
        Self {
            configurations: Configurations::new(sink, log_level),
        }
    }

    /// Runs `f` with this scope.
    pub fn run<R>(&self, f: impl FnOnce(&Self) -> R) -> R {
        f(self)
    }

    pub fn configurations(&self) -> &Configurations<S> {
        &self.configurations
    }

    pub fn log_level(&self) -> LogLevel {
        self.configurations.log_level()
    }

    pub fn set_log_level(&self, level: LogLevel) {
        self.configurations.set_log_level(level);
    }

    pub fn implementation(&self) -> Rc<Configuration<S>> {
        self.configurations.get(IMPLEMENTATION)
    }

    pub fn api(&self) -> Rc<Configuration<S>> {
        self.configurations.get(API)
    }

    pub fn runtime_only(&self) -> Rc<Configuration<S>> {
        self.configurations.get(RUNTIME_ONLY)
    }

    pub fn compile_only(&self) -> Rc<Configuration<S>> {
        self.configurations.get(COMPILE_ONLY)
    }

    pub fn test_implementation(&self) -> Rc<Configuration<S>> {
        self.configurations.get(TEST_IMPLEMENTATION)
    }

    pub fn test_runtime_only(&self) -> Rc<Configuration<S>> {
        self.configurations.get(TEST_RUNTIME_ONLY)
    }

    pub fn test_compile_only(&self) -> Rc<Configuration<S>> {
        self.configurations.get(TEST_COMPILE_ONLY)
    }
}
