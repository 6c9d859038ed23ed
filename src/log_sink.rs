// src/log_sink.rs

//! Line-oriented user log.
//!
//! Receives the launcher's own status lines plus every line the script
//! prints on stdout or stderr. Output readers run as separate tasks, so
//! `write_line` takes a lock; clones share the same file.

use std::fs::{File, OpenOptions};
use std::io::{LineWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::errors::Result;

#[derive(Debug, Clone, Default)]
pub struct LogWriter {
    file: Arc<Mutex<Option<LineWriter<File>>>>,
}

impl LogWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `path` for writing, appending or truncating as requested.
    ///
    /// Without a path the writer stays closed and lines are dropped.
    pub fn initialize(&self, path: Option<&Path>, append: bool) -> Result<()> {
        let Some(path) = path else {
            debug!("no log file configured; script output is not persisted");
            return Ok(());
        };

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)?;

        debug!(path = %path.display(), append, "log file opened");
        *self.lock() = Some(LineWriter::new(file));
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.lock().is_some()
    }

    /// Append one line. Failures are traced, never returned.
    pub fn write_line(&self, line: impl AsRef<str>) {
        let mut guard = self.lock();
        if let Some(writer) = guard.as_mut() {
            if let Err(e) = writeln!(writer, "{}", line.as_ref()) {
                warn!(error = %e, "failed to write to log file");
            }
        }
    }

    /// Flush and close. Safe to call repeatedly, or without `initialize`.
    pub fn dispose(&self) {
        if let Some(mut writer) = self.lock().take() {
            if let Err(e) = writer.flush() {
                warn!(error = %e, "failed to flush log file");
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<LineWriter<File>>> {
        self.file.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
