#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use silentcmd::config::Configuration;

/// Builder for `Configuration` to simplify test setup.
pub struct ConfigurationBuilder {
    config: Configuration,
}

impl ConfigurationBuilder {
    pub fn new(batch_file: &str) -> Self {
        Self {
            config: Configuration {
                batch_file_path: batch_file.to_string(),
                ..Configuration::default()
            },
        }
    }

    pub fn help() -> Self {
        Self {
            config: Configuration {
                show_help: true,
                ..Configuration::default()
            },
        }
    }

    pub fn arguments(mut self, args: &str) -> Self {
        self.config.batch_file_arguments = args.to_string();
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.config.delay = delay;
        self
    }

    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.log_file_path = Some(path.into());
        self
    }

    pub fn append(mut self, val: bool) -> Self {
        self.config.log_append = val;
        self
    }

    pub fn build(self) -> Configuration {
        self.config
    }
}
