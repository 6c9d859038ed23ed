// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod help;
pub mod launch;
pub mod log_sink;
pub mod logging;
pub mod resolve;
pub mod types;

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::{Configuration, DefaultsFile};
use crate::engine::ExecutionEngine;

/// High-level entry point used by `main.rs`.
///
/// Turns the raw arguments into a [`Configuration`] and executes it with
/// `engine`, returning the process exit code.
pub async fn run(args: &CliArgs, defaults: &DefaultsFile, engine: &ExecutionEngine) -> i32 {
    let result = match Configuration::parse_arguments(args.args.as_slice(), defaults) {
        Ok(config) => {
            debug!(?config, "configuration parsed");
            engine.execute(&config).await
        }
        Err(err) => {
            let log = Configuration::scan_log_target(args.args.as_slice(), defaults);
            engine.reject(&err, log.as_ref())
        }
    };

    debug!(exit_code = result.exit_code, "execution complete");
    result.exit_code
}
