//! Configuration module for Cinemood.
//!
//! Handles loading application settings and the agent prompt template.

mod prompts;
mod settings;

pub use prompts::{format_initial_prompt, Prompts, DEFAULT_AGENT_PROMPT};
pub use settings::{
    GeneralSettings, LlmSettings, PromptSettings, ServerSettings, Settings, TmdbSettings,
    ToolSettings, GEMINI_API_KEY_ENV, TMDB_API_KEY_ENV,
};
