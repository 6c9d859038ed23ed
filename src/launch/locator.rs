// src/launch/locator.rs

//! Interpreter discovery ("where python").

use std::collections::HashMap;
use std::fmt::Debug;
use std::path::PathBuf;

use tracing::trace;

/// Looks an executable up by name on the system search path.
///
/// Production code uses [`SystemLocator`]; tests can pin results with
/// [`FixedLocator`].
pub trait ExecutableLocator: Send + Sync + Debug {
    fn locate(&self, name: &str) -> Option<PathBuf>;
}

/// Real lookup backed by the `which` crate (honours `PATHEXT` on Windows).
#[derive(Debug, Clone, Default)]
pub struct SystemLocator;

impl ExecutableLocator for SystemLocator {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        match which::which(name) {
            Ok(path) => {
                trace!(name, path = %path.display(), "located executable");
                Some(path)
            }
            Err(e) => {
                trace!(name, error = %e, "executable not found");
                None
            }
        }
    }
}

/// Locator answering from a fixed table.
#[derive(Debug, Clone, Default)]
pub struct FixedLocator {
    entries: HashMap<String, PathBuf>,
}

impl FixedLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, path: impl Into<PathBuf>) -> Self {
        self.entries.insert(name.to_string(), path.into());
        self
    }
}

impl ExecutableLocator for FixedLocator {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        self.entries.get(name).cloned()
    }
}
