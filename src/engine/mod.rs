// src/engine/mod.rs

//! Orchestration of a single launcher invocation.
//!
//! - [`core`] holds [`ExecutionEngine`], which drives resolution, launcher
//!   selection and the child process, and maps the outcome to an exit code.
//! - [`diagnostics`] holds [`DiagnosticTrail`], the append-only record of
//!   what each execution did.

pub mod core;
pub mod diagnostics;

use std::sync::Arc;

pub use self::core::{ExecutionEngine, delay_if_necessary};
pub use self::diagnostics::{DiagnosticTrail, default_diagnostic_path};

use crate::exec::TokioProcessRunner;
use crate::fs::RealFileSystem;
use crate::launch::SystemLocator;

/// Engine wired to the real filesystem, `which` lookups and child processes,
/// writing diagnostics beside the running executable.
pub fn system_engine() -> ExecutionEngine {
    ExecutionEngine::new(
        Arc::new(RealFileSystem),
        Arc::new(SystemLocator),
        Arc::new(TokioProcessRunner::new()),
        default_diagnostic_path(),
    )
}
