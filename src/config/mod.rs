// src/config/mod.rs

//! Configuration for a single launcher invocation.
//!
//! Responsibilities:
//! - Define the run configuration and the TOML defaults file (`model.rs`).
//! - Turn the launcher's own argument list into a [`Configuration`] (`args.rs`).
//! - Load the optional defaults file from disk (`loader.rs`).
//! - Validate the defaults file (`validate.rs`).

pub mod args;
pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_defaults_path, load_defaults, load_from_path};
pub use model::{Configuration, DefaultsFile, LogTarget};
pub use validate::validate_defaults;
