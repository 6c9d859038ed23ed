#![allow(dead_code)]

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use silentcmd::engine::ExecutionEngine;
use silentcmd::fs::mock::MockFileSystem;
use silentcmd::launch::FixedLocator;
use silentcmd::resolve::SearchEnv;
use silentcmd_test_utils::fake_runner::RecordingRunner;

pub use silentcmd_test_utils::{init_tracing, with_timeout};

/// Root used for every mock filesystem path in these tests.
pub fn root() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(r"C:\")
    } else {
        PathBuf::from("/")
    }
}

pub fn work_dir() -> PathBuf {
    root().join("work")
}

pub fn diag_file() -> PathBuf {
    root().join("tools").join("silentcmd.log")
}

/// `PATH` value listing `dirs` in order.
pub fn path_var(dirs: &[&Path]) -> OsString {
    std::env::join_paths(dirs).expect("test PATH entries must not contain the separator")
}

pub fn search_env(dirs: &[&Path]) -> SearchEnv {
    SearchEnv {
        current_dir: work_dir(),
        path_var: Some(path_var(dirs)),
    }
}

/// Engine over a mock filesystem, a fixed locator and a recording runner,
/// with `PATH` pinned to `path_dirs`.
pub fn mock_engine(
    fs: &MockFileSystem,
    locator: FixedLocator,
    runner: &RecordingRunner,
    path_dirs: &[&Path],
) -> ExecutionEngine {
    ExecutionEngine::new(
        Arc::new(fs.clone()),
        Arc::new(locator),
        Arc::new(runner.clone()),
        Some(diag_file()),
    )
    .with_search_env(search_env(path_dirs))
    .with_help_presenter(|| {})
}

/// Diagnostic blocks written so far, without their trailing blank line.
pub fn diagnostic_blocks(fs: &MockFileSystem) -> Vec<String> {
    fs.contents(diag_file())
        .unwrap_or_default()
        .split("\n\n")
        .filter(|block| !block.trim().is_empty())
        .map(str::to_string)
        .collect()
}
