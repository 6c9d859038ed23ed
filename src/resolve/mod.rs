// src/resolve/mod.rs

//! Locating the script to run.
//!
//! - [`search`] holds [`PathResolver`], which looks a file name up in the
//!   current directory and then along `PATH`.
//! - [`batch`] turns the user-supplied batch file path into the path that
//!   is actually launched (extension inference for bare names).

pub mod batch;
pub mod search;

pub use search::{PathResolver, SearchEnv};
