//! Unified path management for ragchat files.

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for ragchat_core::ChatError {
    fn from(e: PathError) -> Self {
        ragchat_core::ChatError::config(e.to_string())
    }
}

/// Path layout of the client.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/ragchat/
/// ├── config.toml          # ClientConfig
/// ├── local_storage.toml   # Durable key/value store (credential)
/// └── history              # REPL line history
/// ```
pub struct RagChatPaths;

impl RagChatPaths {
    const APP_DIR: &'static str = "ragchat";

    /// Returns the ragchat configuration directory (e.g. `~/.config/ragchat/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(Self::APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path of the durable key/value store.
    ///
    /// # Security Note
    ///
    /// Holds the bearer token; it is written with 600 permissions on Unix.
    pub fn local_storage_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("local_storage.toml"))
    }

    pub fn history_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("history"))
    }
}
