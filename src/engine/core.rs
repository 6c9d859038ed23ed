// src/engine/core.rs

//! Execution engine.
//!
//! One call to [`ExecutionEngine::execute`] walks:
//!
//! `INIT -> (help -> DONE) | DELAY -> RESOLVE_PATH -> SELECT_LAUNCHER
//!  -> (no launcher -> DONE) -> RUN -> DONE`
//!
//! Any error between opening the log and the child's exit ends the run with
//! [`EXIT_INTERNAL_ERROR`]. Whatever happens, the run guard logs the
//! "finished" line, closes the user log and appends the diagnostic block.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::config::{Configuration, LogTarget};
use crate::engine::diagnostics::{
    DiagnosticTrail, KEY_ARGUMENTS, KEY_DIRECTORY, KEY_ERROR, KEY_EXCEPTION, KEY_EXIT_CODE,
    KEY_FILENAME, KEY_UNSUPPORTED,
};
use crate::errors::{Result, SilentCmdError};
use crate::exec::ProcessRunner;
use crate::fs::FileSystem;
use crate::help;
use crate::launch::{ExecutableLocator, LauncherSelector, Selection};
use crate::log_sink::LogWriter;
use crate::resolve::{PathResolver, SearchEnv};
use crate::types::{EXIT_INTERNAL_ERROR, EXIT_NO_LAUNCHER, EXIT_SUCCESS, ExecutionResult};

/// Orchestrates a single launcher invocation.
pub struct ExecutionEngine {
    fs: Arc<dyn FileSystem>,
    resolver: PathResolver,
    selector: LauncherSelector,
    runner: Arc<dyn ProcessRunner>,
    diagnostic_file: Option<PathBuf>,
    show_help: fn(),
}

impl ExecutionEngine {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        locator: Arc<dyn ExecutableLocator>,
        runner: Arc<dyn ProcessRunner>,
        diagnostic_file: Option<PathBuf>,
    ) -> Self {
        Self {
            resolver: PathResolver::new(Arc::clone(&fs)),
            selector: LauncherSelector::new(Arc::clone(&fs), locator),
            fs,
            runner,
            diagnostic_file,
            show_help: help::print_usage,
        }
    }

    /// Pin path resolution to a fixed directory and `PATH`.
    pub fn with_search_env(mut self, env: SearchEnv) -> Self {
        self.resolver = PathResolver::with_env(Arc::clone(&self.fs), env);
        self
    }

    /// Replace the help presenter (printing to stdout by default).
    pub fn with_help_presenter(mut self, show_help: fn()) -> Self {
        self.show_help = show_help;
        self
    }

    /// Run the configured script and report how it went.
    ///
    /// Never fails: every error is folded into the exit code, the user log
    /// and the diagnostic block.
    pub async fn execute(&self, config: &Configuration) -> ExecutionResult {
        let sink = LogWriter::new();
        let mut guard = RunGuard::new(
            &sink,
            &config.batch_file_path,
            DiagnosticTrail::new(Arc::clone(&self.fs), self.diagnostic_file.clone()),
        );

        let (exit_code, error) = match self.execute_inner(config, &sink, &mut guard).await {
            Ok(code) => (code, None),
            Err(e) => {
                let message = e.to_string();
                error!(error = %message, "execution failed");
                sink.write_line(format!("Error: {message}"));
                guard.record(KEY_EXCEPTION, &message);
                (EXIT_INTERNAL_ERROR, Some(message))
            }
        };

        ExecutionResult {
            exit_code,
            diagnostic_text: guard.finish(),
            error,
        }
    }

    /// Report a configuration that could not be built at all.
    ///
    /// The error goes to the user log when `log` names one, and always to
    /// the diagnostic block.
    pub fn reject(&self, err: &SilentCmdError, log: Option<&LogTarget>) -> ExecutionResult {
        let message = err.to_string();
        error!(error = %message, "invalid arguments");

        if let Some(target) = log {
            let sink = LogWriter::new();
            match sink.initialize(Some(&target.path), target.append) {
                Ok(()) => sink.write_line(format!("Error: {message}")),
                Err(e) => warn!(
                    path = %target.path.display(),
                    error = %e,
                    "failed to open log file"
                ),
            }
            sink.dispose();
        }

        let mut trail = DiagnosticTrail::new(Arc::clone(&self.fs), self.diagnostic_file.clone());
        trail.record(KEY_EXCEPTION, &message);

        ExecutionResult {
            exit_code: EXIT_INTERNAL_ERROR,
            diagnostic_text: trail.finish(),
            error: Some(message),
        }
    }

    async fn execute_inner(
        &self,
        config: &Configuration,
        sink: &LogWriter,
        guard: &mut RunGuard<'_>,
    ) -> Result<i32> {
        sink.initialize(config.log_file_path.as_deref(), config.log_append)?;

        if config.show_help {
            (self.show_help)();
            return Ok(EXIT_SUCCESS);
        }

        delay_if_necessary(config.delay, sink).await;

        let batch_file = self.resolver.resolve_batch_file_path(&config.batch_file_path);
        let batch_file = self.resolver.anchor_to_current_dir(&batch_file);
        guard.set_target(&batch_file);

        let plan = match self.selector.select(&batch_file, &config.batch_file_arguments) {
            Selection::Ready(plan) => plan,
            selection => {
                if selection == Selection::Unsupported {
                    warn!(file = %batch_file.display(), "file type launcher not configured");
                    sink.write_line(format!(
                        "Error: File type launcher not configured: {}",
                        batch_file.display()
                    ));
                    guard.record(KEY_UNSUPPORTED, batch_file.display());
                }

                error!(file = %batch_file.display(), "unable to find launcher for file type");
                sink.write_line(format!(
                    "Error: Unable to find launcher for file type: {}",
                    batch_file.display()
                ));
                guard.record(KEY_ERROR, batch_file.display());
                return Ok(EXIT_NO_LAUNCHER);
            }
        };

        sink.write_line(format!("Starting command {}", batch_file.display()));

        let working_dir = batch_file
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty());

        guard.record(KEY_FILENAME, plan.launcher.display());
        guard.record(KEY_ARGUMENTS, &plan.command);
        guard.record(
            KEY_DIRECTORY,
            working_dir.map(|d| d.display().to_string()).unwrap_or_default(),
        );

        let code = self.runner.run(&plan, working_dir, sink).await?;
        guard.record(KEY_EXIT_CODE, code);
        Ok(code)
    }
}

/// Sleep for `delay` when it is positive; zero means no delay and no log line.
pub async fn delay_if_necessary(delay: Duration, sink: &LogWriter) {
    if delay.is_zero() {
        return;
    }

    info!(seconds = delay.as_secs_f64(), "delaying execution");
    sink.write_line(format!(
        "Delaying execution by {} seconds",
        delay.as_secs_f64()
    ));
    tokio::time::sleep(delay).await;
}

/// Always-run end of an execution: "finished" line, log close, diagnostic
/// block. Runs from `finish` on the normal path and from `Drop` otherwise.
struct RunGuard<'a> {
    sink: &'a LogWriter,
    target: String,
    trail: Option<DiagnosticTrail>,
}

impl<'a> RunGuard<'a> {
    fn new(sink: &'a LogWriter, target: &str, trail: DiagnosticTrail) -> Self {
        Self {
            sink,
            target: target.to_string(),
            trail: Some(trail),
        }
    }

    fn set_target(&mut self, path: &Path) {
        self.target = path.display().to_string();
    }

    fn record(&mut self, key: &'static str, value: impl std::fmt::Display) {
        if let Some(trail) = self.trail.as_mut() {
            trail.record(key, value);
        }
    }

    fn finish(mut self) -> String {
        self.close()
    }

    fn close(&mut self) -> String {
        let Some(trail) = self.trail.take() else {
            return String::new();
        };

        info!(file = %self.target, "finished command");
        self.sink
            .write_line(format!("Finished command {}", self.target));
        self.sink.dispose();
        trail.finish()
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.close();
    }
}
