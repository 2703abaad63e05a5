//! Deployment configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Serialized settings from ~/.forge/config.json
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Provider serving the priority list (OpenAI-compatible endpoint).
    pub provider: String,
    /// Chat-completions base URL.
    pub base_url: String,
    /// Model priority list, highest rank first. Read-only at runtime.
    pub models: Vec<String>,
    /// Stored API keys, exported to the environment by `hydrate_env`.
    pub api_keys: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: "openrouter".to_string(),
            base_url: "https://openrouter.ai/api/v1".to_string(),
            models: vec![
                "anthropic/claude-sonnet-4".to_string(),
                "openai/gpt-4o".to_string(),
                "meta-llama/llama-3.1-70b-instruct".to_string(),
            ],
            api_keys: HashMap::new(),
        }
    }
}

/// Helper struct for storing the location to read/write global settings
pub struct ConfigStore {
    path: PathBuf,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    pub fn new() -> Self {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".forge");
        path.push("config.json");
        Self { path }
    }

    /// Create with a custom path (for testing).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the user's saved config, or fallback to Default
    pub fn load(&self) -> Config {
        if let Ok(content) = fs::read_to_string(&self.path) {
            if let Ok(config) = serde_json::from_str(&content) {
                return config;
            }
        }
        Config::default()
    }

    /// Save the user's config back to disk
    pub fn save(&self, config: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, content)
    }

    /// Hydrate the environment with configured API keys, without
    /// overwriting keys already present in the process env.
    pub fn hydrate_env(&self) {
        let config = self.load();
        for (provider, key) in config.api_keys.iter() {
            if !key.is_empty() {
                let env_var = format!("{}_API_KEY", provider.to_uppercase());
                if std::env::var(&env_var).is_err() {
                    std::env::set_var(&env_var, key);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_backward_compatible_defaults() {
        let legacy = r#"{
            "provider":"openrouter",
            "api_keys":{"openrouter":"k"}
        }"#;

        let parsed: Config = serde_json::from_str(legacy).unwrap();
        assert_eq!(parsed.provider, "openrouter");
        assert!(!parsed.models.is_empty());
        assert_eq!(parsed.base_url, Config::default().base_url);
    }

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::with_path(dir.path().join("config.json"));

        let mut config = Config::default();
        config.models = vec!["model-x".to_string(), "model-y".to_string()];
        store.save(&config).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.models, vec!["model-x", "model-y"]);
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::with_path(dir.path().join("nope.json"));
        let loaded = store.load();
        assert_eq!(loaded.provider, Config::default().provider);
    }
}
