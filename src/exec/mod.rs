// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`runner`] provides the `ProcessRunner` trait the engine talks to, so
//!   tests can swap in a fake that never spawns anything.
//! - [`process`] is the production runner built on `tokio::process`: hidden
//!   window, stdout/stderr merged line by line into the user log.

pub mod process;
pub mod runner;

pub use process::TokioProcessRunner;
pub use runner::ProcessRunner;
