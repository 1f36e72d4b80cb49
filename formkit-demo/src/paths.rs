//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "formkit";
const APPLICATION: &str = "formkit-demo";

/// Get project directories, or None if home directory cannot be determined.
fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the cache directory for temporary/regenerable data.
///
/// - Linux: `$XDG_CACHE_HOME/formkit-demo` or `~/.cache/formkit-demo`
/// - macOS: `~/Library/Caches/dev.formkit.formkit-demo`
/// - Windows: `C:\Users\<User>\AppData\Local\formkit\formkit-demo\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path of the session log. Falls back to the working directory when no
/// home directory is known.
pub fn log_file() -> PathBuf {
    match cache_dir() {
        Some(dir) => dir.join("latest.log"),
        None => PathBuf::from("formkit-demo.log"),
    }
}
