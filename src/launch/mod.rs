// src/launch/mod.rs

//! Choosing how to start a script.
//!
//! [`LauncherSelector`] maps the script's extension to an interpreter and
//! the argument string that interpreter receives:
//!
//! | extension      | launcher                      | command                     |
//! |----------------|-------------------------------|-----------------------------|
//! | `.bat`, `.cmd` | the script itself             | arguments, unchanged        |
//! | `.py`          | `python` from the search path | `"<script>" <arguments>`    |
//! | `.ps1`         | `powershell`, or the default install | `-file "<script>" <arguments>` |

pub mod locator;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::fs::FileSystem;
use crate::resolve::batch::lowercase_extension;

pub use locator::{ExecutableLocator, FixedLocator, SystemLocator};

/// Where Windows installs Windows PowerShell by default.
pub const DEFAULT_POWERSHELL_PATH: &str =
    r"C:\Windows\System32\WindowsPowerShell\v1.0\powershell.exe";

/// Interpreter plus the argument string handed to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub launcher: PathBuf,
    pub command: String,
}

/// Outcome of launcher selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Ready(LaunchPlan),
    /// No launcher is configured for this extension.
    Unsupported,
    /// The extension is known but its interpreter could not be found.
    LauncherNotFound,
}

impl Selection {
    pub fn plan(&self) -> Option<&LaunchPlan> {
        match self {
            Selection::Ready(plan) => Some(plan),
            _ => None,
        }
    }
}

/// Maps a script to its [`LaunchPlan`].
#[derive(Debug, Clone)]
pub struct LauncherSelector {
    fs: Arc<dyn FileSystem>,
    locator: Arc<dyn ExecutableLocator>,
}

impl LauncherSelector {
    pub fn new(fs: Arc<dyn FileSystem>, locator: Arc<dyn ExecutableLocator>) -> Self {
        Self { fs, locator }
    }

    pub fn select(&self, batch_file: &Path, arguments: &str) -> Selection {
        let ext = lowercase_extension(batch_file);

        let selection = match ext.as_deref() {
            Some("bat") | Some("cmd") => Selection::Ready(LaunchPlan {
                launcher: batch_file.to_path_buf(),
                command: arguments.to_string(),
            }),
            Some("py") => match self.locate_existing("python") {
                Some(launcher) => Selection::Ready(LaunchPlan {
                    launcher,
                    command: quoted_command("", batch_file, arguments),
                }),
                None => Selection::LauncherNotFound,
            },
            Some("ps1") => match self.locate_powershell() {
                Some(launcher) => Selection::Ready(LaunchPlan {
                    launcher,
                    command: quoted_command("-file ", batch_file, arguments),
                }),
                None => Selection::LauncherNotFound,
            },
            _ => Selection::Unsupported,
        };

        debug!(
            file = %batch_file.display(),
            extension = ?ext,
            ?selection,
            "launcher selected"
        );
        selection
    }

    /// Locator hit that actually exists on disk.
    fn locate_existing(&self, name: &str) -> Option<PathBuf> {
        self.locator
            .locate(name)
            .filter(|path| self.fs.is_file(path))
    }

    fn locate_powershell(&self) -> Option<PathBuf> {
        self.locate_existing("powershell").or_else(|| {
            let fallback = PathBuf::from(DEFAULT_POWERSHELL_PATH);
            self.fs.is_file(&fallback).then_some(fallback)
        })
    }
}

fn quoted_command(prefix: &str, batch_file: &Path, arguments: &str) -> String {
    let quoted = format!("{prefix}\"{}\"", batch_file.display());
    if arguments.is_empty() {
        quoted
    } else {
        format!("{quoted} {arguments}")
    }
}
