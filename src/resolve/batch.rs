// src/resolve/batch.rs

use std::path::{Path, PathBuf};

use tracing::debug;

use super::search::PathResolver;

/// Extensions tried, in order, for a bare name without one.
pub const IMPLICIT_EXTENSIONS: [&str; 2] = ["bat", "cmd"];

impl PathResolver {
    /// Work out which file a user-supplied batch path refers to.
    ///
    /// - Paths with a directory component are used as-is.
    /// - `name` (no extension) resolves to `name.bat`, then `name.cmd`.
    /// - `name.ext` is looked up as given.
    ///
    /// When nothing is found the input comes back unchanged; launcher
    /// selection reports the failure later.
    pub fn resolve_batch_file_path(&self, batch_file_path: &str) -> PathBuf {
        let given = PathBuf::from(batch_file_path);

        if batch_file_path.is_empty() || has_directory(&given) {
            return given;
        }

        let resolved = if has_extension(&given) {
            self.find_path(&given)
        } else {
            IMPLICIT_EXTENSIONS
                .iter()
                .find_map(|ext| self.find_path(format!("{batch_file_path}.{ext}")))
        };

        match resolved {
            Some(path) => {
                debug!(
                    from = %batch_file_path,
                    to = %path.display(),
                    "resolved batch file path"
                );
                path
            }
            None => given,
        }
    }
}

fn has_directory(path: &Path) -> bool {
    path.parent()
        .is_some_and(|parent| !parent.as_os_str().is_empty())
}

fn has_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| !ext.is_empty())
}

/// Lower-cased extension of `path`, without the dot.
pub fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .filter(|ext| !ext.is_empty())
        .map(|ext| ext.to_string_lossy().to_lowercase())
}
