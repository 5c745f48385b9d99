// src/infra/paths.rs - Config and session file locations
//
// All paths respect the DROPSEE_HOME environment variable for isolation.
// When DROPSEE_HOME is set, config and session live under that directory.
// When unset, both live under ~/.dropsee/.

use std::path::PathBuf;

/// Returns the DROPSEE_HOME override, if set.
fn dropsee_home() -> Option<PathBuf> {
    std::env::var_os("DROPSEE_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Configuration directory: $DROPSEE_HOME/ or ~/.dropsee/
pub fn config_dir() -> PathBuf {
    if let Some(home) = dropsee_home() {
        return home;
    }
    dirs_home().join(".dropsee")
}

/// Home directory. Falls back to the working directory when the platform
/// reports none (containers without a passwd entry).
pub fn dirs_home() -> PathBuf {
    directories::BaseDirs::new()
        .map(|b| b.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Session file path (token, display name, email)
pub fn session_file_path() -> PathBuf {
    config_dir().join("session.json")
}
