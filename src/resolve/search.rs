// src/resolve/search.rs

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::trace;

use crate::fs::FileSystem;

/// Snapshot of the process state a lookup depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEnv {
    pub current_dir: PathBuf,
    /// Raw `PATH` value, split with the platform list separator.
    pub path_var: Option<OsString>,
}

impl SearchEnv {
    /// Read the current directory and `PATH` of this process.
    pub fn from_process() -> Self {
        Self {
            current_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            path_var: env::var_os("PATH"),
        }
    }

    /// Non-empty `PATH` entries in listed order.
    pub fn search_dirs(&self) -> Vec<PathBuf> {
        match self.path_var {
            Some(ref raw) => env::split_paths(raw)
                .filter(|dir| !dir.as_os_str().is_empty())
                .collect(),
            None => Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
enum EnvSource {
    Process,
    Fixed(SearchEnv),
}

impl EnvSource {
    fn snapshot(&self) -> SearchEnv {
        match self {
            EnvSource::Process => SearchEnv::from_process(),
            EnvSource::Fixed(env) => env.clone(),
        }
    }
}

/// Finds a file by name in the current directory or along `PATH`.
#[derive(Debug, Clone)]
pub struct PathResolver {
    fs: Arc<dyn FileSystem>,
    env: EnvSource,
}

impl PathResolver {
    /// Resolver reading the live process environment on every lookup.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            env: EnvSource::Process,
        }
    }

    /// Resolver pinned to a fixed environment snapshot.
    pub fn with_env(fs: Arc<dyn FileSystem>, env: SearchEnv) -> Self {
        Self {
            fs,
            env: EnvSource::Fixed(env),
        }
    }

    /// Return the first existing `dir/filename`, checking the current
    /// directory before each `PATH` entry in order.
    ///
    /// Not finding the file is a normal outcome and yields `None`.
    pub fn find_path(&self, filename: impl AsRef<Path>) -> Option<PathBuf> {
        let filename = filename.as_ref();
        let env = self.env.snapshot();

        let in_current = env.current_dir.join(filename);
        if self.fs.is_file(&in_current) {
            trace!(path = %in_current.display(), "found in current directory");
            return Some(in_current);
        }

        let found = env
            .search_dirs()
            .into_iter()
            .map(|dir| dir.join(filename))
            .find(|candidate| self.fs.is_file(candidate));

        if let Some(ref path) = found {
            trace!(path = %path.display(), "found on PATH");
        }
        found
    }

    /// Join a relative path that has a directory part onto the current
    /// directory. The child runs inside that directory, where the relative
    /// form would no longer point at the file.
    ///
    /// Bare names and absolute paths come back unchanged.
    pub fn anchor_to_current_dir(&self, path: &Path) -> PathBuf {
        let has_dir = path.parent().is_some_and(|dir| !dir.as_os_str().is_empty());
        if path.is_absolute() || !has_dir {
            return path.to_path_buf();
        }

        let anchored = self.env.snapshot().current_dir.join(path);
        trace!(path = %anchored.display(), "anchored relative path");
        anchored
    }
}
