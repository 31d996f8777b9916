//! Ordered collection of suites, looked up by name.

use crate::suite::RegisteredSuite;
use crate::suites;
use mtfs_core::{Error, Result, SuiteSelection};

/// Suites in registration order.
pub struct Registry {
    suites: Vec<Box<dyn RegisteredSuite>>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self { suites: Vec::new() }
    }

    /// The six filesystem race suites, in their canonical order.
    pub fn builtin() -> Self {
        Self {
            suites: suites::builtin(),
        }
    }

    /// Append a suite. Names must be non-empty and unique (case-insensitive).
    pub fn register(&mut self, suite: impl RegisteredSuite + 'static) -> Result<()> {
        let name = suite.name();
        if name.is_empty() {
            return Err(Error::Config("suite name must not be empty".to_string()));
        }
        if self.lookup(name).is_some() {
            return Err(Error::Config(format!("suite {} registered twice", name)));
        }
        self.suites.push(Box::new(suite));
        Ok(())
    }

    /// Find a suite by name, ignoring ASCII case.
    pub fn lookup(&self, name: &str) -> Option<&dyn RegisteredSuite> {
        self.suites
            .iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
            .map(|s| s.as_ref())
    }

    /// Resolve a selection to the suites it covers.
    pub fn select(&self, selection: &SuiteSelection) -> Result<Vec<&dyn RegisteredSuite>> {
        match selection {
            SuiteSelection::All => Ok(self.iter().collect()),
            SuiteSelection::Named(name) => self
                .lookup(name)
                .map(|suite| vec![suite])
                .ok_or_else(|| Error::UnknownSuite(name.clone())),
        }
    }

    /// Suites in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn RegisteredSuite> + '_ {
        self.suites.iter().map(|s| s.as_ref())
    }

    /// Suite names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.suites.iter().map(|s| s.name())
    }

    /// Number of registered suites.
    pub fn len(&self) -> usize {
        self.suites.len()
    }

    /// True when no suite is registered.
    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}
