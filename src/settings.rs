//! Persisted settings for the chat CLI.
//! Stored in the platform-specific config directory via `directories::ProjectDirs`.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::chat::ChatConfig;
use crate::config::{
    DEFAULT_COMPLETION_ENDPOINT, DEFAULT_MAX_ATTEMPTS, DEFAULT_MODEL, DEFAULT_MODERATION_ENDPOINT,
    DEFAULT_SYSTEM_PROMPT,
};
use crate::model::ModelConfig;
use crate::moderation::ModerationConfig;

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_API_ENDPOINT: &str = "OPENAI_API_ENDPOINT";
pub const ENV_MODERATION_ENDPOINT: &str = "OPENAI_MODERATION_ENDPOINT";
pub const ENV_MODEL: &str = "OPENAI_MODEL";
pub const ENV_MAX_ATTEMPTS: &str = "CHAT_MAX_ATTEMPTS";
pub const ENV_SYSTEM_PROMPT: &str = "CHAT_SYSTEM_PROMPT";

/// Application settings that can be saved and loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// API key used for both endpoints
    pub api_key: String,
    /// Chat completion endpoint URL
    pub api_endpoint: String,
    /// Moderation endpoint URL
    pub moderation_endpoint: String,
    /// Completion model name
    pub model_name: String,
    /// System prompt sent with every query
    pub system_prompt: String,
    /// Generation attempts before giving up on moderation
    pub max_attempts: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_endpoint: DEFAULT_COMPLETION_ENDPOINT.to_string(),
            moderation_endpoint: DEFAULT_MODERATION_ENDPOINT.to_string(),
            model_name: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl AppSettings {
    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "moderated-chat", "moderated-chat")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path.
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.json"))
    }

    /// Load settings from the config file, falling back to defaults.
    pub fn load() -> Self {
        Self::settings_path()
            .and_then(|path| fs::read_to_string(&path).ok())
            .map(|content| Self::from_json(&content))
            .unwrap_or_default()
    }

    /// Parse settings JSON, backfilling blank fields with defaults.
    pub fn from_json(content: &str) -> Self {
        let loaded: Self = serde_json::from_str(content).unwrap_or_default();
        loaded.backfill()
    }

    fn backfill(mut self) -> Self {
        let defaults = Self::default();

        if self.api_endpoint.is_empty() {
            self.api_endpoint = defaults.api_endpoint;
        }
        if self.moderation_endpoint.is_empty() {
            self.moderation_endpoint = defaults.moderation_endpoint;
        }
        if self.model_name.is_empty() {
            self.model_name = defaults.model_name;
        }
        if self.system_prompt.is_empty() {
            self.system_prompt = defaults.system_prompt;
        }
        if self.max_attempts == 0 {
            self.max_attempts = defaults.max_attempts;
        }

        self
    }

    /// Save settings to the config file.
    pub fn save(&self) -> Result<PathBuf, String> {
        let dir = Self::config_dir().ok_or("Cannot determine config directory")?;

        fs::create_dir_all(&dir)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;

        let path = dir.join("settings.json");
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        fs::write(&path, content)
            .map_err(|e| format!("Failed to write settings file: {}", e))?;

        Ok(path)
    }

    /// Apply overrides from the process environment.
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from `lookup`, keyed by the `ENV_*` names.
    /// Empty or unparsable values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_API_KEY) {
            self.api_key = v;
        }
        if let Some(v) = get(ENV_API_ENDPOINT) {
            self.api_endpoint = v;
        }
        if let Some(v) = get(ENV_MODERATION_ENDPOINT) {
            self.moderation_endpoint = v;
        }
        if let Some(v) = get(ENV_MODEL) {
            self.model_name = v;
        }
        if let Some(v) = get(ENV_SYSTEM_PROMPT) {
            self.system_prompt = v;
        }
        if let Some(n) = get(ENV_MAX_ATTEMPTS)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|n| *n > 0)
        {
            self.max_attempts = n;
        }

        self
    }

    pub fn model_config(&self) -> ModelConfig {
        ModelConfig::default()
            .with_endpoint(&self.api_endpoint)
            .with_api_key(&self.api_key)
            .with_model_name(&self.model_name)
    }

    pub fn moderation_config(&self) -> ModerationConfig {
        ModerationConfig::default()
            .with_endpoint(&self.moderation_endpoint)
            .with_api_key(&self.api_key)
    }

    pub fn chat_config(&self) -> ChatConfig {
        ChatConfig::default()
            .with_system_prompt(&self.system_prompt)
            .with_max_attempts(self.max_attempts)
    }
}
