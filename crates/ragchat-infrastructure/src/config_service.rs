//! Configuration service implementation.
//!
//! Loads [`ClientConfig`] from `~/.config/ragchat/config.toml` (or an
//! explicit path) and applies environment overrides.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use ragchat_core::config::ClientConfig;
use ragchat_core::error::{ChatError, Result};

use crate::paths::RagChatPaths;

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "RAGCHAT_CONFIG";
/// Overrides `base_url`.
pub const BASE_URL_ENV: &str = "RAGCHAT_BASE_URL";

/// Loads and caches the client configuration.
///
/// Resolution order for the file: explicit path, then `RAGCHAT_CONFIG`,
/// then the platform config directory. A missing file yields defaults; a
/// malformed one is a `Config` error.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: Option<PathBuf>,
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    pub fn new() -> Self {
        Self::with_path(None)
    }

    pub fn with_path(path: Option<PathBuf>) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<ClientConfig> {
        {
            let cached = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(ref config) = *cached {
                return Ok(config.clone());
            }
        }

        let path = self.resolve_path()?;
        let mut loaded = load_from_file(&path)?;
        apply_env_overrides(&mut loaded, |key| std::env::var(key).ok());

        tracing::debug!("[ConfigService] Loaded config from {}", path.display());

        let mut cache = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *cache = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut cache = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *cache = None;
    }

    fn resolve_path(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.path {
            return Ok(path.clone());
        }
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }
        Ok(RagChatPaths::config_file()?)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads a config file; a missing or blank file yields defaults.
pub fn load_from_file(path: &Path) -> Result<ClientConfig> {
    if !path.exists() {
        return Ok(ClientConfig::default());
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(ClientConfig::default());
    }

    toml::from_str(&content)
        .map_err(|e| ChatError::config(format!("Invalid config at {}: {}", path.display(), e)))
}

/// Applies environment overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(config: &mut ClientConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
        config.base_url = base_url;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragchat_core::config::AutoSelect;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_from_file(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_load_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "base_url = \"http://chat.internal:9000\"\nauto_select = \"off\"\n",
        )
        .unwrap();

        let service = ConfigService::with_path(Some(path));
        let config = service.get_config().unwrap();

        assert_eq!(config.auto_select, AutoSelect::Off);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "base_url = ").unwrap();

        let result = load_from_file(&path);
        assert!(matches!(result, Err(ChatError::Config(_))));
    }

    #[test]
    fn test_env_override() {
        let mut config = ClientConfig::default();
        apply_env_overrides(&mut config, |key| {
            (key == BASE_URL_ENV).then(|| "https://override.example".to_string())
        });
        assert_eq!(config.base_url, "https://override.example");

        let mut config = ClientConfig::default();
        apply_env_overrides(&mut config, |_| Some("  ".to_string()));
        assert_eq!(config.base_url, ClientConfig::default().base_url);
    }

    #[test]
    fn test_cache_invalidation_reloads() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "min_password_length = 10\n").unwrap();

        let service = ConfigService::with_path(Some(path.clone()));
        assert_eq!(service.get_config().unwrap().min_password_length, 10);

        fs::write(&path, "min_password_length = 12\n").unwrap();
        assert_eq!(service.get_config().unwrap().min_password_length, 10);

        service.invalidate_cache();
        assert_eq!(service.get_config().unwrap().min_password_length, 12);
    }
}
