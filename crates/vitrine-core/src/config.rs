use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, VitrineError};

/// Top-level configuration for the Vitrine storefront client.
///
/// Loaded from `~/.vitrine/config.toml` by default. Each section corresponds
/// to a bounded context or cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VitrineConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub chat: ChatSettings,
}

impl VitrineConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: VitrineConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| VitrineError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Storefront backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the storefront API, e.g. `http://localhost:8000/api/v1`.
    pub base_url: String,
    /// Bearer token for authenticated calls. None means guest mode.
    pub bearer_token: Option<String>,
    /// Per-request timeout in seconds. A hung call would otherwise leave the
    /// conversation stuck in its loading state forever.
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/v1".to_string(),
            bearer_token: None,
            request_timeout_secs: 30,
        }
    }
}

/// Conversation engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// How many past sessions to request when refreshing the history list.
    pub session_list_limit: u32,
    /// Maximum user message length in characters.
    pub max_message_length: usize,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            session_list_limit: 20,
            max_message_length: 2000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = VitrineConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.backend.base_url, "http://localhost:8000/api/v1");
        assert!(config.backend.bearer_token.is_none());
        assert_eq!(config.backend.request_timeout_secs, 30);
        assert_eq!(config.chat.session_list_limit, 20);
        assert_eq!(config.chat.max_message_length, 2000);
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"

[backend]
base_url = "https://shop.example.com/api/v1"
bearer_token = "token-abc"
request_timeout_secs = 10

[chat]
session_list_limit = 5
max_message_length = 500
"#;
        let file = create_temp_config(content);
        let config = VitrineConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.backend.base_url, "https://shop.example.com/api/v1");
        assert_eq!(config.backend.bearer_token.as_deref(), Some("token-abc"));
        assert_eq!(config.backend.request_timeout_secs, 10);
        assert_eq!(config.chat.session_list_limit, 5);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let content = r#"
[backend]
base_url = "https://shop.example.com/api/v1"
"#;
        let file = create_temp_config(content);
        let config = VitrineConfig::load(file.path()).unwrap();
        assert_eq!(config.backend.base_url, "https://shop.example.com/api/v1");
        // Untouched sections fall back to defaults
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.backend.request_timeout_secs, 30);
        assert_eq!(config.chat.session_list_limit, 20);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let result = VitrineConfig::load(Path::new("/nonexistent/vitrine.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let config = VitrineConfig::load_or_default(Path::new("/nonexistent/vitrine.toml"));
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_load_or_default_on_invalid_toml() {
        let file = create_temp_config("this is not [valid toml");
        let config = VitrineConfig::load_or_default(file.path());
        assert_eq!(config.backend.request_timeout_secs, 30);
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = VitrineConfig::default();
        config.general.log_level = "trace".to_string();
        config.backend.bearer_token = Some("secret".to_string());
        config.chat.session_list_limit = 50;

        config.save(&path).unwrap();
        let reloaded = VitrineConfig::load(&path).unwrap();
        assert_eq!(reloaded.general.log_level, "trace");
        assert_eq!(reloaded.backend.bearer_token.as_deref(), Some("secret"));
        assert_eq!(reloaded.chat.session_list_limit, 50);
    }
}
