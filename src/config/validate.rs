// src/config/validate.rs

use crate::config::args::delay_from_seconds;
use crate::config::model::DefaultsFile;
use crate::errors::{Result, SilentCmdError};
use crate::logging::parse_level_str;

/// Check values `serde` cannot reject on its own.
pub fn validate_defaults(defaults: &DefaultsFile) -> Result<()> {
    if let Some(secs) = defaults.delay_seconds {
        delay_from_seconds(secs)?;
    }

    if let Some(ref level) = defaults.log_level {
        if parse_level_str(level).is_none() {
            return Err(SilentCmdError::ConfigError(format!(
                "unknown log_level '{level}' (expected error, warn, info, debug or trace)"
            )));
        }
    }

    if let Some(ref path) = defaults.log_file {
        if path.as_os_str().is_empty() {
            return Err(SilentCmdError::ConfigError(
                "log_file must not be empty".to_string(),
            ));
        }
    }

    Ok(())
}
