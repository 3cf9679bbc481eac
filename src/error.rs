//! Error types for Cinemood.

use thiserror::Error;

/// Library-level error type for Cinemood operations.
#[derive(Error, Debug)]
pub enum CinemoodError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The LLM provider answered with a non-success status.
    #[error("{}", api_error_message(.status, .message))]
    Api {
        status: u16,
        message: Option<String>,
    },

    /// The LLM response did not have the shape the interaction loop needs.
    #[error("{0}")]
    InvalidResponse(String),

    #[error("Conversation history error: {0}")]
    History(String),

    #[error("{0}")]
    Tool(String),

    #[error("Movie database error: {0}")]
    MovieDatabase(String),

    #[error("Interaction loop exceeded maximum steps ({0})")]
    LoopExceeded(usize),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

fn api_error_message(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(msg) => format!("API error ({}): {}", status, msg),
        None => format!("API error ({})", status),
    }
}

/// Result type alias for Cinemood operations.
pub type Result<T> = std::result::Result<T, CinemoodError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = CinemoodError::Api {
            status: 429,
            message: Some("Resource exhausted".to_string()),
        };
        assert_eq!(err.to_string(), "API error (429): Resource exhausted");

        let err = CinemoodError::Api {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "API error (500)");
    }
}
