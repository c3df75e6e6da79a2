//! Directory where the executable lives. The explorer config is read from here
//! so a standalone build carries its settings next to it.

use std::path::PathBuf;

/// Directory containing the running executable. Falls back to current directory if unavailable.
pub fn exe_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Location of the JSON explorer config.
pub fn config_path() -> PathBuf {
    exe_directory().join("complex-logistic.json")
}
