// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Everything the engine needs to know about one invocation.
///
/// Built once from the command line (plus the optional defaults file) and
/// treated as read-only afterwards. Path resolution hands back a new path
/// instead of rewriting `batch_file_path`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Configuration {
    /// Script to run, as given on the command line (may be a bare name).
    pub batch_file_path: String,

    /// Raw argument string forwarded to the script.
    pub batch_file_arguments: String,

    /// Wait this long before resolving and starting the script.
    pub delay: Duration,

    /// User log receiving the script's stdout/stderr.
    pub log_file_path: Option<PathBuf>,

    /// Append to `log_file_path` instead of truncating it.
    pub log_append: bool,

    /// Print usage and exit with code 0.
    pub show_help: bool,
}

/// User log destination and open mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogTarget {
    pub path: PathBuf,
    pub append: bool,
}

/// Optional TOML file supplying defaults for options not given on the
/// command line.
///
/// ```toml
/// log_file = "C:\\Logs\\nightly.txt"
/// log_append = true
/// delay_seconds = 5
/// log_level = "debug"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DefaultsFile {
    /// Log file used when no `/LOG:` or `/LOG+:` option is given.
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Append mode for `log_file`.
    #[serde(default)]
    pub log_append: bool,

    /// Delay used when no `/DELAY:` option is given.
    #[serde(default)]
    pub delay_seconds: Option<f64>,

    /// Tracing level used when `--log-level` is absent.
    #[serde(default)]
    pub log_level: Option<String>,
}
