// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! `clap` only owns the launcher's own flags (`--log-level`, `--defaults`).
//! Everything else is collected verbatim and handed to
//! [`crate::config::Configuration::parse_arguments`], which understands the
//! Windows-style `/LOG:`, `/LOG+:`, `/DELAY:` and `/?` options.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `silentcmd`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "silentcmd",
    version,
    about = "Run a batch or script file without a console window, logging its output.",
    long_about = None
)]
pub struct CliArgs {
    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, the defaults file, `SILENTCMD_LOG` or `info` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Path to a TOML defaults file.
    ///
    /// Default: the executable path with a `.toml` extension, if it exists.
    #[arg(long, value_name = "PATH")]
    pub defaults: Option<PathBuf>,

    /// `[BatchFile [BatchArguments]] [/LOG:file | /LOG+:file] [/DELAY:seconds] [/?]`
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub args: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
