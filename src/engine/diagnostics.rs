// src/engine/diagnostics.rs

//! Per-execution diagnostic trail.
//!
//! Every execution appends exactly one block of `key : value` lines to the
//! diagnostic file, followed by a blank line:
//!
//! ```text
//! Timestamp : 2026-10-19 03:00:00
//! Filename  : C:\jobs\nightly.bat
//! Arguments : --full
//! Directory : C:\jobs
//! Exit code : 0
//! ```
//!
//! The block is written by [`DiagnosticTrail::finish`], or by `Drop` when the
//! trail is abandoned (early return, panic), so it is never lost.

use std::fmt::Display;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use tracing::{trace, warn};

use crate::fs::FileSystem;

pub const KEY_TIMESTAMP: &str = "Timestamp";
pub const KEY_UNSUPPORTED: &str = "Unsupported";
pub const KEY_ERROR: &str = "Error";
pub const KEY_FILENAME: &str = "Filename";
pub const KEY_ARGUMENTS: &str = "Arguments";
pub const KEY_DIRECTORY: &str = "Directory";
pub const KEY_EXIT_CODE: &str = "Exit code";
pub const KEY_EXCEPTION: &str = "Exception";

/// `<current executable>` with its extension replaced by `.log`.
pub fn default_diagnostic_path() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .map(|exe| exe.with_extension("log"))
}

#[derive(Debug)]
pub struct DiagnosticTrail {
    fs: Arc<dyn FileSystem>,
    path: Option<PathBuf>,
    entries: Vec<(&'static str, String)>,
    written: bool,
}

impl DiagnosticTrail {
    /// Start a trail stamped with the current local time.
    ///
    /// With `path == None` the block is rendered but not persisted.
    pub fn new(fs: Arc<dyn FileSystem>, path: Option<PathBuf>) -> Self {
        let mut trail = Self {
            fs,
            path,
            entries: Vec::new(),
            written: false,
        };
        trail.record(KEY_TIMESTAMP, Local::now().format("%Y-%m-%d %H:%M:%S"));
        trail
    }

    pub fn record(&mut self, key: &'static str, value: impl Display) {
        self.entries.push((key, value.to_string()));
    }

    /// The block as it will be written, including the trailing blank line.
    pub fn render(&self) -> String {
        let width = self.entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        let mut out = String::new();
        for (key, value) in &self.entries {
            out.push_str(&format!("{key:<width$} : {value}\n"));
        }
        out.push('\n');
        out
    }

    /// Append the block to the diagnostic file and return it.
    pub fn finish(mut self) -> String {
        self.write_out()
    }

    fn write_out(&mut self) -> String {
        let text = self.render();
        self.written = true;

        if let Some(ref path) = self.path {
            match self.fs.append(path, text.as_bytes()) {
                Ok(()) => trace!(path = %path.display(), "diagnostic block appended"),
                Err(e) => warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to append diagnostic block"
                ),
            }
        }
        text
    }
}

impl Drop for DiagnosticTrail {
    fn drop(&mut self) {
        if !self.written {
            self.write_out();
        }
    }
}
