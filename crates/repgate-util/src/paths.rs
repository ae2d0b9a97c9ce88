//! Default paths for repgate components
//!
//! Paths are user-writable by default:
//! - Config: `$REPGATE_CONFIG`, `$XDG_CONFIG_HOME/repgate/config.toml` or
//!   `~/.config/repgate/config.toml`

use std::path::PathBuf;

/// Environment variable for overriding the config file path
pub const REPGATE_CONFIG_ENV: &str = "REPGATE_CONFIG";

/// Config filename within the config directory
const CONFIG_FILENAME: &str = "config.toml";

/// Application subdirectory name
const APP_DIR: &str = "repgate";

/// Get the default config file path.
///
/// Order of precedence:
/// 1. `$REPGATE_CONFIG` environment variable (if set)
/// 2. `$XDG_CONFIG_HOME/repgate/config.toml` (if XDG_CONFIG_HOME is set)
/// 3. `~/.config/repgate/config.toml` (fallback)
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(REPGATE_CONFIG_ENV) {
        return PathBuf::from(path);
    }

    config_dir().join(CONFIG_FILENAME)
}

/// Get the config directory without checking `$REPGATE_CONFIG`.
pub fn config_dir() -> PathBuf {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config").join(APP_DIR);
    }

    // Last resort
    PathBuf::from("/tmp").join(APP_DIR)
}
