use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

pub fn get_config_file(share_dir: &Path) -> PathBuf {
    share_dir.join("config.toml")
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Name of the chat provider, looked up in the built-in registry.
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Print the stored transcript when a conversation is resumed.
    #[serde(default = "default_replay_on_resume")]
    pub replay_on_resume: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            prompt: default_prompt(),
            replay_on_resume: default_replay_on_resume(),
        }
    }
}

impl ChatConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.trim().is_empty() {
            return Err(ConfigError::new("provider cannot be empty"));
        }
        if self.prompt.is_empty() {
            return Err(ConfigError::new("prompt cannot be empty"));
        }
        Ok(())
    }
}

/// Loads the config file, falling back to defaults when it does not exist.
pub async fn load_config(config_file: &Path) -> Result<ChatConfig, ConfigError> {
    debug!("Loading config from file: {}", config_file.display());
    if tokio::fs::metadata(config_file).await.is_err() {
        debug!("No config file found, using defaults");
        return Ok(ChatConfig::default());
    }

    let config_text = tokio::fs::read_to_string(config_file)
        .await
        .map_err(|err| ConfigError::new(format!("Failed to read config file: {err}")))?;
    load_config_from_string(&config_text)
}

pub fn load_config_from_string(config_text: &str) -> Result<ChatConfig, ConfigError> {
    let config: ChatConfig = toml::from_str(config_text)
        .map_err(|err| ConfigError::new(format!("Invalid TOML in configuration file: {err}")))?;
    config
        .validate()
        .map_err(|err| ConfigError::new(format!("Invalid configuration file: {err}")))?;
    Ok(config)
}

fn default_provider() -> String {
    "echo".to_string()
}

fn default_prompt() -> String {
    "> ".to_string()
}

fn default_replay_on_resume() -> bool {
    true
}
