//! Engine configuration with YAML overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VoxConfig {
    pub ai: AiConfig,
    pub browser: BrowserConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Base URL of an OpenAI-compatible chat completions API.
    pub base_url: String,
    pub model: String,
    /// Bearer token; also read from VOXDRIVE_AI_API_KEY when unset here.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key: None,
            timeout_secs: 10,
            max_tokens: 150,
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub navigation_timeout_ms: u64,
    pub click_attempts: u32,
    pub click_backoff_ms: u64,
    /// Scroll amount used when a command omits the pixel count.
    pub default_scroll_pixels: u32,
    pub screenshot_dir: PathBuf,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            navigation_timeout_ms: 30_000,
            click_attempts: 3,
            click_backoff_ms: 250,
            default_scroll_pixels: 500,
            screenshot_dir: PathBuf::from("."),
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from default locations:
    /// 1. ./voxdrive.yaml
    /// 2. ~/.voxdrive/config.yaml
    /// 3. Default configuration
    pub async fn load_default() -> Result<VoxConfig, ConfigError> {
        let local_config = PathBuf::from("./voxdrive.yaml");
        if local_config.exists() {
            return Self::load_from(&local_config).await;
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".voxdrive").join("config.yaml");
            if home_config.exists() {
                return Self::load_from(&home_config).await;
            }
        }

        Ok(VoxConfig::default())
    }

    pub async fn load_from(path: &Path) -> Result<VoxConfig, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: VoxConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}
