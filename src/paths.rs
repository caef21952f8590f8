//! Common paths for Murmur data storage
//!
//! Murmur keeps a single file, ~/.config/murmur/config.toml, on all platforms.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the Murmur config directory (~/.config/murmur/)
pub fn murmur_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let dir = home.join(".config").join("murmur");
    fs::create_dir_all(&dir).context("Failed to create murmur directory")?;
    Ok(dir)
}

/// Get the config file path (~/.config/murmur/config.toml)
pub fn config_path() -> Result<PathBuf> {
    Ok(murmur_dir()?.join("config.toml"))
}
