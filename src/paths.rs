//! XDG-style path utilities for configuration.
//!
//! XDG Base Directory conventions are preferred over OS-specific locations,
//! so the config lives in the same place on Linux and macOS.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Application directory name under the config root.
const APP_DIR: &str = "empathy-chat";

/// Returns the configuration directory.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/empathy-chat` if `XDG_CONFIG_HOME` is set and not empty
/// 2. `~/.config/empathy-chat` otherwise
pub fn config_dir() -> Result<PathBuf> {
    match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => Ok(PathBuf::from(xdg).join(APP_DIR)),
        _ => Ok(home_dir()?.join(".config").join(APP_DIR)),
    }
}

/// Returns the configuration file path.
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("Failed to determine home directory")
}
