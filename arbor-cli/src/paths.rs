//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "arbor";
const APPLICATION: &str = "arbor";

/// Get project directories, or None if home directory cannot be determined.
fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the cache directory for temporary/regenerable data.
///
/// - Linux: `$XDG_CACHE_HOME/arbor` or `~/.cache/arbor`
/// - macOS: `~/Library/Caches/dev.arbor.arbor`
/// - Windows: `C:\Users\<User>\AppData\Local\arbor\arbor\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the config directory for configuration files.
///
/// - Linux: `$XDG_CONFIG_HOME/arbor` or `~/.config/arbor`
/// - macOS: `~/Library/Application Support/dev.arbor.arbor`
/// - Windows: `C:\Users\<User>\AppData\Roaming\arbor\arbor\config`
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the viewer configuration file.
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.json"))
}

/// Get the path to the latest log file.
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("latest.log"))
}
