// src/exec/runner.rs

//! Pluggable process runner abstraction.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use crate::errors::Result;
use crate::launch::LaunchPlan;
use crate::log_sink::LogWriter;

/// Trait abstracting how a launch plan is executed.
///
/// Production code uses [`super::TokioProcessRunner`]; tests can provide an
/// implementation that records the plan and reports a canned exit code.
pub trait ProcessRunner: Send + Sync {
    /// Start `plan.launcher` with `plan.command`, forward every output line
    /// to `sink` and resolve to the child's exit code once it has exited.
    ///
    /// `working_dir` of `None` means "inherit the current directory".
    fn run<'a>(
        &'a self,
        plan: &'a LaunchPlan,
        working_dir: Option<&'a Path>,
        sink: &'a LogWriter,
    ) -> Pin<Box<dyn Future<Output = Result<i32>> + Send + 'a>>;
}
