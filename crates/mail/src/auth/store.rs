//! On-disk token store
//!
//! One JSON file per (API name, API version, suffix) key:
//! `<dir>/token_<name>_<version><suffix>.json`.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::Credential;

/// Directory name used next to the client secret file when no override is given
pub const DEFAULT_TOKEN_DIR: &str = "token-files";

/// Key identifying one token store entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenKey {
    pub api_name: String,
    pub api_version: String,
    pub suffix: String,
}

impl TokenKey {
    pub fn new(
        api_name: impl Into<String>,
        api_version: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            api_name: api_name.into(),
            api_version: api_version.into(),
            suffix: suffix.into(),
        }
    }

    pub fn file_name(&self) -> String {
        format!(
            "token_{}_{}{}.json",
            self.api_name, self.api_version, self.suffix
        )
    }
}

/// Directory of persisted credentials
#[derive(Debug, Clone)]
pub struct TokenStore {
    dir: PathBuf,
}

impl TokenStore {
    /// Resolve the store location.
    ///
    /// An override replaces the default entirely; otherwise tokens live in
    /// `token-files` next to the client secret file. Paths are made absolute.
    pub fn resolve(client_secret_path: &Path, override_dir: Option<&Path>) -> Result<Self> {
        let dir = match override_dir {
            Some(dir) => absolute(dir)?,
            None => {
                let secret = absolute(client_secret_path)?;
                let base = secret
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("/"));
                base.join(DEFAULT_TOKEN_DIR)
            }
        };
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the store directory if absent
    pub fn ensure_dir(&self) -> Result<()> {
        config::ensure_dir(&self.dir)
    }

    pub fn path_for(&self, key: &TokenKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Load the entry for a key, `None` if there is no file
    pub fn load(&self, key: &TokenKey) -> Result<Option<Credential>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        load_credential(&path).map(Some)
    }

    /// Overwrite the entry for a key
    pub fn save(&self, key: &TokenKey, credential: &Credential) -> Result<PathBuf> {
        let path = self.path_for(key);
        save_credential(&path, credential)?;
        Ok(path)
    }
}

pub(crate) fn load_credential(path: &Path) -> Result<Credential> {
    config::load_json_file(path)
        .with_context(|| format!("Failed to load stored token {}", path.display()))
}

pub(crate) fn save_credential(path: &Path, credential: &Credential) -> Result<()> {
    config::save_json_file(path, credential)
        .with_context(|| format!("Failed to persist token {}", path.display()))
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path)
        .with_context(|| format!("Could not resolve path {}", path.display()))
}
