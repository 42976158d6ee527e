// autodeps-core/src/configuration/catalog.rs
use std::cell::{Cell, Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use autodeps_common::log::LogLevel;
use tracing::debug;

use super::registry::Configuration;
use crate::sink::BuildSink;

/// Creates and caches [`Configuration`]s by name.
///
/// All configurations handed out share this catalog's sink and log level.
pub struct Configurations<S: BuildSink> {
    sink: Rc<RefCell<S>>,
    log_level: Rc<Cell<LogLevel>>,
    configurations: RefCell<HashMap<String, Rc<Configuration<S>>>>,
}

impl<S: BuildSink> Configurations<S> {
    pub fn new(sink: S, log_level: LogLevel) -> Self {
        Self {
            sink: Rc::new(RefCell::new(sink)),
            log_level: Rc::new(Cell::new(log_level)),
            configurations: RefCell::new(HashMap::new()),
        }
    }

    /// Cached lookup by exact name; the configuration is created on first use.
    pub fn get(&self, name: &str) -> Rc<Configuration<S>> {
        if let Some(existing) = self.configurations.borrow().get(name) {
            return Rc::clone(existing);
        }
        debug!("Creating configuration '{}'", name);
        let created = Rc::new(Configuration::new(
            name.to_string(),
            Rc::clone(&self.log_level),
            Rc::clone(&self.sink),
        ));
        self.configurations
            .borrow_mut()
            .insert(name.to_string(), Rc::clone(&created));
        created
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level.get()
    }

    /// Applies to every configuration from this catalog, including existing ones.
    pub fn set_log_level(&self, level: LogLevel) {
        self.log_level.set(level);
    }

    /// Names of the configurations created so far, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.configurations.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// Must not be held across a registration.
    pub fn sink(&self) -> Ref<'_, S> {
        self.sink.borrow()
    }
}

impl<S: BuildSink + Default> Default for Configurations<S> {
    fn default() -> Self {
        Self::new(S::default(), LogLevel::default())
    }
}
