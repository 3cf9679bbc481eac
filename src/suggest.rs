//! Suggestion pipeline: prompt, agent loop, answer parsing.

use crate::agent::{parse_suggestions, Agent, ConversationHistory, SuggestionResult, ToolRegistry};
use crate::config::{Prompts, Settings};
use crate::error::Result;
use crate::llm::{describe_failure, GeminiClient, LanguageModel};
use crate::movie_tools::movie_registry;
use crate::tmdb::{MovieDatabase, TmdbClient};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Moods offered to users.
pub const MOODS: [&str; 6] = ["Happy", "Sad", "Excited", "Calm", "Tense", "Romantic"];

/// Produces movie suggestions for mood and genre selections.
pub struct SuggestionService {
    agent: Agent,
    movies: Arc<dyn MovieDatabase>,
    prompts: Prompts,
}

impl SuggestionService {
    /// Assemble a service from explicitly constructed collaborators.
    pub fn new(
        model: Arc<dyn LanguageModel>,
        movies: Arc<dyn MovieDatabase>,
        tools: Arc<ToolRegistry>,
        prompts: Prompts,
    ) -> Self {
        Self {
            agent: Agent::new(model, tools),
            movies,
            prompts,
        }
    }

    /// Build the Gemini and TMDB clients and the tool registry from settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let model: Arc<dyn LanguageModel> = Arc::new(GeminiClient::from_settings(&settings.llm)?);
        let movies: Arc<dyn MovieDatabase> = Arc::new(TmdbClient::from_settings(&settings.tmdb)?);
        let tools = movie_registry(movies.clone(), &settings.tools)?;
        let max_steps = settings.max_steps(tools.len());
        let prompts = Prompts::load(&settings.prompts)?;

        Ok(Self::new(model, movies, Arc::new(tools), prompts).with_max_steps(max_steps))
    }

    /// Override the agent's step ceiling.
    pub fn with_max_steps(mut self, max: usize) -> Self {
        self.agent = self.agent.with_max_steps(max);
        self
    }

    /// The movie database used for genre lookups.
    pub fn movies(&self) -> Arc<dyn MovieDatabase> {
        self.movies.clone()
    }

    /// Get suggestions for the selected moods and genres.
    ///
    /// Never fails: any error becomes an empty result whose explanation says
    /// what went wrong.
    #[instrument(skip(self))]
    pub async fn get_suggestions(&self, moods: &[String], genre_ids: &[u32]) -> SuggestionResult {
        match self.run(moods, genre_ids).await {
            Ok(result) => {
                info!("Suggested {} movie(s)", result.suggestions.len());
                result
            }
            Err(e) => {
                let explanation = describe_failure(&e);
                error!("Suggestion request failed: {}", explanation);
                SuggestionResult::empty(explanation)
            }
        }
    }

    async fn run(&self, moods: &[String], genre_ids: &[u32]) -> Result<SuggestionResult> {
        let genres = self.movies.genres().await?;
        let prompt = self.prompts.format_initial_prompt(moods, genre_ids, &genres);

        let mut history = ConversationHistory::new(prompt);
        let response = self.agent.run(&mut history).await?;

        Ok(parse_suggestions(&response.content))
    }
}
