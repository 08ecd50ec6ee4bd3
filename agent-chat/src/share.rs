use std::path::PathBuf;

use crate::error::ConfigError;

pub const SHARE_DIR_ENV: &str = "OPENHANDS_SHARE_DIR";

/// Directory holding config, logs and conversations.
pub fn get_share_dir() -> Result<PathBuf, ConfigError> {
    if let Some(path) = std::env::var_os(SHARE_DIR_ENV) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".openhands"))
        .ok_or_else(|| ConfigError::new("HOME directory is not available"))
}

pub async fn ensure_share_dir() -> Result<PathBuf, ConfigError> {
    let dir = get_share_dir()?;
    tokio::fs::create_dir_all(&dir).await.map_err(|err| {
        ConfigError::new(format!("Failed to create share dir {}: {err}", dir.display()))
    })?;
    Ok(dir)
}

pub fn get_conversations_dir(share_dir: &std::path::Path) -> PathBuf {
    share_dir.join("conversations")
}

pub fn get_input_history_file(share_dir: &std::path::Path) -> PathBuf {
    share_dir.join("input_history.txt")
}
