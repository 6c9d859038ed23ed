// src/config/args.rs

//! Parsing of the classic launcher syntax:
//!
//! `[BatchFile [BatchArguments]] [/LOG:file | /LOG+:file] [/DELAY:seconds] [/?]`
//!
//! Options are recognised case-insensitively wherever they appear. The first
//! other token is the batch file; the remaining ones become the raw argument
//! string passed to the script.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::model::{Configuration, DefaultsFile, LogTarget};
use crate::errors::{Result, SilentCmdError};

const LOG_OPTION: &str = "/log:";
const LOG_APPEND_OPTION: &str = "/log+:";
const DELAY_OPTION: &str = "/delay:";
const HELP_OPTION: &str = "/?";

impl Configuration {
    /// Build a configuration from the launcher's argument list, falling back
    /// to `defaults` for options that are not given.
    pub fn parse_arguments<S: AsRef<str>>(args: &[S], defaults: &DefaultsFile) -> Result<Self> {
        let mut cfg = Configuration {
            log_file_path: defaults.log_file.clone(),
            log_append: defaults.log_append,
            delay: match defaults.delay_seconds {
                Some(secs) => delay_from_seconds(secs)?,
                None => Duration::ZERO,
            },
            ..Configuration::default()
        };

        let mut script_args: Vec<&str> = Vec::new();

        for arg in args {
            let arg: &str = arg.as_ref();
            if arg == HELP_OPTION {
                cfg.show_help = true;
            } else if let Some(value) = strip_option(arg, LOG_APPEND_OPTION) {
                cfg.log_file_path = Some(option_path(value, LOG_APPEND_OPTION)?);
                cfg.log_append = true;
            } else if let Some(value) = strip_option(arg, LOG_OPTION) {
                cfg.log_file_path = Some(option_path(value, LOG_OPTION)?);
                cfg.log_append = false;
            } else if let Some(value) = strip_option(arg, DELAY_OPTION) {
                cfg.delay = parse_delay(value)?;
            } else if cfg.batch_file_path.is_empty() {
                cfg.batch_file_path = arg.to_string();
            } else {
                script_args.push(arg);
            }
        }

        if cfg.batch_file_path.is_empty() {
            cfg.show_help = true;
        }

        cfg.batch_file_arguments = join_arguments(&script_args);
        Ok(cfg)
    }
}

impl Configuration {
    /// The user log named by `args` (or `defaults`), found without
    /// validating anything else, so argument errors can still be logged.
    pub fn scan_log_target<S: AsRef<str>>(
        args: &[S],
        defaults: &DefaultsFile,
    ) -> Option<LogTarget> {
        let mut target = defaults.log_file.clone().map(|path| LogTarget {
            path,
            append: defaults.log_append,
        });

        for arg in args {
            let arg: &str = arg.as_ref();
            let (value, append) = if let Some(value) = strip_option(arg, LOG_APPEND_OPTION) {
                (value, true)
            } else if let Some(value) = strip_option(arg, LOG_OPTION) {
                (value, false)
            } else {
                continue;
            };
            if let Ok(path) = option_path(value, LOG_OPTION) {
                target = Some(LogTarget { path, append });
            }
        }

        target
    }
}

/// Case-insensitive prefix match returning the option's value.
fn strip_option<'a>(arg: &'a str, option: &str) -> Option<&'a str> {
    let head = arg.get(..option.len())?;
    head.eq_ignore_ascii_case(option)
        .then(|| &arg[option.len()..])
}

fn option_path(value: &str, option: &str) -> Result<PathBuf> {
    let value = value.trim_matches('"');
    if value.is_empty() {
        return Err(SilentCmdError::ConfigError(format!(
            "option '{}' requires a file name",
            option.to_uppercase()
        )));
    }
    Ok(PathBuf::from(value))
}

fn parse_delay(value: &str) -> Result<Duration> {
    let secs: f64 = value.trim().parse().map_err(|_| {
        SilentCmdError::ConfigError(format!(
            "invalid /DELAY value '{value}' (expected a number of seconds)"
        ))
    })?;
    delay_from_seconds(secs)
}

/// Zero and negative delays mean "no delay".
pub(crate) fn delay_from_seconds(secs: f64) -> Result<Duration> {
    if !secs.is_finite() {
        return Err(SilentCmdError::ConfigError(format!(
            "delay must be a finite number of seconds (got {secs})"
        )));
    }
    if secs <= 0.0 {
        return Ok(Duration::ZERO);
    }
    Duration::try_from_secs_f64(secs).map_err(|_| {
        SilentCmdError::ConfigError(format!("delay of {secs} seconds is too large"))
    })
}

/// Rebuild a single argument string, quoting tokens the shell split on
/// whitespace so the script receives them intact.
fn join_arguments(args: &[&str]) -> String {
    args.iter()
        .map(|a| {
            if a.is_empty() || a.chars().any(char::is_whitespace) {
                format!("\"{a}\"")
            } else {
                (*a).to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
