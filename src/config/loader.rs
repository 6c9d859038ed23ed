// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::DefaultsFile;
use crate::config::validate::validate_defaults;
use crate::errors::{Result, SilentCmdError};

/// Load a defaults file from a given path and return the raw `DefaultsFile`.
///
/// This only performs TOML deserialization. Use [`load_defaults`] for the
/// validated, "missing is fine" variant used at startup.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<DefaultsFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let defaults: DefaultsFile = toml::from_str(&contents)?;

    Ok(defaults)
}

/// Load the defaults used to fill in options missing from the command line.
///
/// - `explicit` (from `--defaults`) must exist.
/// - Otherwise the file next to the executable is used when present, and
///   an empty `DefaultsFile` when it is not.
pub fn load_defaults(explicit: Option<&Path>) -> Result<DefaultsFile> {
    let defaults = match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(SilentCmdError::ConfigError(format!(
                    "defaults file {} does not exist",
                    path.display()
                )));
            }
            load_from_path(path)?
        }
        None => match default_defaults_path() {
            Some(path) if path.is_file() => {
                debug!(path = %path.display(), "loading defaults file");
                load_from_path(&path)?
            }
            _ => DefaultsFile::default(),
        },
    };

    validate_defaults(&defaults)?;
    Ok(defaults)
}

/// `<executable without extension>.toml`, if the executable path is known.
pub fn default_defaults_path() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .map(|exe| exe.with_extension("toml"))
}
