//! Cinemood - Movie suggestions by mood
//!
//! Recommends films for a set of moods and genres. A Gemini model drives a
//! tool-calling loop against The Movie Database and answers with a JSON
//! list of suggestions, which is parsed into [`agent::SuggestionResult`].
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `llm` - Gemini wire types and client
//! - `tmdb` - Movie database abstraction and TMDB client
//! - `agent` - Conversation history, tool registry, interaction loop, answer parsing
//! - `movie_tools` - Tools the model can call
//! - `suggest` - The end-to-end suggestion service
//!
//! # Example
//!
//! ```rust,no_run
//! use cinemood::config::Settings;
//! use cinemood::suggest::SuggestionService;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let service = SuggestionService::from_settings(&settings)?;
//!
//!     let result = service
//!         .get_suggestions(&["Happy".to_string()], &[35])
//!         .await;
//!     for movie in &result.suggestions {
//!         println!("{}", movie.title);
//!     }
//!     println!("{}", result.explanation);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod movie_tools;
pub mod suggest;
pub mod tmdb;

pub use error::{CinemoodError, Result};
