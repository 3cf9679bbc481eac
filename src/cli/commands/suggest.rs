//! Suggest command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::suggest::{SuggestionService, MOODS};
use anyhow::Result;

/// Run the suggest command.
pub async fn run_suggest(
    moods: &[String],
    genres: &[u32],
    json: bool,
    model: Option<String>,
    mut settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Suggest, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    if let Some(model) = model {
        settings.llm.model = model;
    }

    for mood in moods {
        if !MOODS.iter().any(|m| m.eq_ignore_ascii_case(mood)) {
            Output::warning(&format!(
                "'{}' is not one of the built-in moods; passing it through as-is.",
                mood
            ));
        }
    }

    let service = SuggestionService::from_settings(&settings)?;

    let spinner = Output::spinner("Finding movies for your mood...");
    let result = service.get_suggestions(moods, genres).await;
    spinner.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if result.suggestions.is_empty() {
        Output::warning("No suggestions this time.");
        println!("\n{}\n", result.explanation);
        return Ok(());
    }

    Output::header(&format!("Suggestions ({})", result.suggestions.len()));
    for (i, movie) in result.suggestions.iter().enumerate() {
        Output::movie(i + 1, movie);
    }
    println!("\n{}\n", result.explanation);

    Ok(())
}
