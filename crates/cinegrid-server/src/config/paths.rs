//! Config file location.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Config file name inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Application directory name under the user config root.
const APP_DIR: &str = "cinegrid";

/// Resolves the config file path.
///
/// - If `dir` is `Some`, returns `{dir}/config.toml`.
/// - Else if `XDG_CONFIG_HOME` is set, returns `$XDG_CONFIG_HOME/cinegrid/config.toml`.
/// - Otherwise returns `~/.config/cinegrid/config.toml`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn resolve_config_path(dir: Option<&Path>) -> Result<PathBuf> {
    resolve_with(dir, |key| std::env::var(key).ok())
}

fn resolve_with<F>(dir: Option<&Path>, lookup: F) -> Result<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }

    if let Some(xdg) = lookup("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(xdg).join(APP_DIR).join(CONFIG_FILE));
    }

    let home = lookup("HOME").context("HOME environment variable is not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join(APP_DIR)
        .join(CONFIG_FILE))
}
