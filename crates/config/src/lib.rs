//! Configuration helpers for mailctl
//!
//! Provides the shared config directory (~/.config/mailctl/), JSON file
//! loading and saving, and parsing of boolean-like environment flags.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Name of the application config directory
const APP_DIR: &str = "mailctl";

/// Get the mailctl config directory (~/.config/mailctl/)
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR))
}

/// Get the path to a file within the mailctl config directory
pub fn config_path(filename: &str) -> Option<PathBuf> {
    config_dir().map(|p| p.join(filename))
}

/// Load and parse a JSON file from an arbitrary path
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON file: {}", path.display()))
}

/// Save a value as pretty JSON, creating parent directories as needed.
///
/// The file is overwritten if it already exists.
pub fn save_json_file<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    Ok(())
}

/// Create a directory (and its parents) if it doesn't exist
pub fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))
}

/// Read a boolean-like environment flag.
///
/// Only the exact value `"1"` enables the flag.
pub fn env_flag(name: &str) -> bool {
    parse_flag(std::env::var(name).ok().as_deref())
}

fn parse_flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim() == "1")
}
