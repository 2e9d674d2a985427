use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Environment variable that overrides `telegram.bot_token`.
pub const TOKEN_ENV: &str = "UTPHRASE_TOKEN";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub slap: SlapConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
    /// Long-poll timeout in seconds
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

/// Roster and message templates for `/slap`.
#[derive(Debug, Deserialize, Clone)]
pub struct SlapConfig {
    #[serde(default = "default_slap_targets")]
    pub targets: Vec<String>,
    /// Each template holds at most one `{target}` placeholder
    #[serde(default = "default_slap_templates")]
    pub templates: Vec<String>,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            poll_timeout_secs: default_poll_timeout(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl Default for SlapConfig {
    fn default() -> Self {
        Self {
            targets: default_slap_targets(),
            templates: default_slap_templates(),
        }
    }
}

fn default_poll_timeout() -> u32 {
    30
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/phrases.txt")
}

fn default_slap_targets() -> Vec<String> {
    [
        "@daishi424",
        "DenDr",
        "@OceanDrive80x",
        "Dutch",
        "lord-z",
        "Systez",
        "@magic_frontier",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_slap_templates() -> Vec<String> {
    [
        "slaps {target} around a bit with a large trout",
        "slaps {target} around a bit with a big smelly trout",
        "{target} couldn't handle the pressure and took their own life.",
        "{target} was slapped into another dimension.",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl TelegramConfig {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.poll_timeout_secs))
    }
}

impl Config {
    /// Load the TOML config. A missing file yields the built-in defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;

        if config.slap.targets.is_empty() {
            anyhow::bail!("[slap] targets must not be empty");
        }
        if config.slap.templates.is_empty() {
            anyhow::bail!("[slap] templates must not be empty");
        }

        Ok(config)
    }

    /// Bot token from the environment, falling back to the config file.
    pub fn bot_token(&self) -> Result<String> {
        resolve_token(std::env::var(TOKEN_ENV).ok(), &self.telegram.bot_token)
    }
}

fn resolve_token(env_token: Option<String>, file_token: &str) -> Result<String> {
    let token = env_token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| file_token.trim().to_string());

    if token.is_empty() {
        anyhow::bail!(
            "No bot token configured: set {} or [telegram] bot_token",
            TOKEN_ENV
        );
    }

    Ok(token)
}
