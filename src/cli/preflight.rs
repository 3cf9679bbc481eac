//! Pre-flight checks before network operations.
//!
//! Validates that API keys are available before starting a command that
//! would otherwise fail on its first request.

use crate::config::Settings;
use crate::error::Result;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Suggestions need both Gemini and TMDB.
    Suggest,
    /// Genre listing only needs TMDB.
    Genres,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Suggest => {
            settings.llm.resolve_api_key()?;
            settings.tmdb.resolve_api_key()?;
        }
        Operation::Genres => {
            settings.tmdb.resolve_api_key()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_suggest_with_configured_keys() {
        let mut settings = Settings::default();
        settings.llm.api_key = Some("gemini".to_string());
        settings.tmdb.api_key = Some("tmdb".to_string());
        assert!(check(Operation::Suggest, &settings).is_ok());
        assert!(check(Operation::Genres, &settings).is_ok());
    }

    #[test]
    fn test_check_genres_ignores_gemini_key() {
        let mut settings = Settings::default();
        settings.tmdb.api_key = Some("tmdb".to_string());
        settings.llm.api_key = None;
        assert!(check(Operation::Genres, &settings).is_ok());
    }
}
