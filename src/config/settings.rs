//! Configuration settings for Cinemood.

use crate::error::{CinemoodError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable consulted when `llm.api_key` is unset.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Environment variable consulted when `tmdb.api_key` is unset.
pub const TMDB_API_KEY_ENV: &str = "TMDB_API_KEY";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub llm: LlmSettings,
    pub tmdb: TmdbSettings,
    pub tools: ToolSettings,
    pub server: ServerSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Language model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Gemini model name.
    pub model: String,
    /// Base URL of the models endpoint.
    pub base_url: String,
    /// API key. Falls back to `GEMINI_API_KEY` when unset.
    pub api_key: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum model round trips per suggestion. Defaults to tool count + 2.
    pub max_steps: Option<usize>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            api_key: None,
            timeout_secs: 60,
            max_steps: None,
        }
    }
}

impl LlmSettings {
    /// Resolve the API key from settings or the environment.
    pub fn resolve_api_key(&self) -> Result<String> {
        resolve_key(self.api_key.as_deref(), GEMINI_API_KEY_ENV, "Gemini")
    }
}

/// The Movie Database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbSettings {
    /// Base URL of the TMDB v3 API.
    pub base_url: String,
    /// API key. Falls back to `TMDB_API_KEY` when unset.
    pub api_key: Option<String>,
    /// Response language.
    pub language: String,
    /// Minimum vote average for discovered movies.
    pub min_vote_average: f64,
    /// Minimum vote count for discovered movies.
    pub min_vote_count: u32,
    /// Number of discovery pages fetched per lookup.
    pub max_pages: u32,
    /// Number of movies handed to the model after shuffling.
    pub results_limit: usize,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for TmdbSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            api_key: None,
            language: "en-US".to_string(),
            min_vote_average: 7.0,
            min_vote_count: 100,
            max_pages: 5,
            results_limit: 50,
            timeout_secs: 30,
        }
    }
}

impl TmdbSettings {
    /// Resolve the API key from settings or the environment.
    pub fn resolve_api_key(&self) -> Result<String> {
        resolve_key(self.api_key.as_deref(), TMDB_API_KEY_ENV, "TMDB")
    }
}

/// Tool registration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct ToolSettings {
    /// Also expose `get_movie_details_by_ids` to the model.
    pub movie_details: bool,
}

/// HTTP API server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// File whose contents replace the built-in agent prompt.
    pub custom_file: Option<String>,
}

fn resolve_key(configured: Option<&str>, env_var: &str, service: &str) -> Result<String> {
    if let Some(key) = configured.filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }
    match std::env::var(env_var) {
        Ok(key) if !key.is_empty() => Ok(key),
        Ok(_) => Err(CinemoodError::Config(format!(
            "{} is empty. Set it with: export {}='...'",
            env_var, env_var
        ))),
        Err(_) => Err(CinemoodError::Config(format!(
            "{} API key is missing. Set {} or add it to the config file.",
            service, env_var
        ))),
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CinemoodError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cinemood")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Model round-trip ceiling for a registry with `tool_count` tools.
    pub fn max_steps(&self, tool_count: usize) -> usize {
        self.llm.max_steps.unwrap_or(tool_count + 2)
    }
}
