//! LLM access for the suggestion agent.
//!
//! The interaction loop only sees the [`LanguageModel`] trait, so tests and
//! alternative providers can stand in for the Gemini client.

mod gemini;
mod types;

pub use gemini::GeminiClient;
pub use types::{
    Candidate, CandidateContent, FunctionCall, FunctionCallingConfig, FunctionCallingMode,
    FunctionResponse, FunctionResult, GenerateRequest, GenerateResponse, ItemsSchema,
    ParametersSchema, Part, PropertySchema, Role, ToolConfig, ToolDeclaration, ToolSet, Turn,
};

use crate::error::{CinemoodError, Result};
use async_trait::async_trait;

/// A model endpoint that can answer a `generateContent` request.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send one request and wait for the full response.
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse>;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}

/// Turn a failed suggestion run into the explanation shown to the user.
///
/// Provider messages win over bare status codes, which win over transport
/// error kinds; anything else falls back to the error's own message.
pub fn describe_failure(error: &CinemoodError) -> String {
    match error {
        CinemoodError::Api {
            message: Some(message),
            ..
        } => format!("Gemini API Error: {}", message),
        CinemoodError::Api { status, .. } => format!("HTTP Error: {}", status),
        CinemoodError::Http(e) => match e.status() {
            Some(status) => format!("HTTP Error: {}", status.as_u16()),
            None => format!("Network Error: {}", network_error_kind(e)),
        },
        other => other.to_string(),
    }
}

fn network_error_kind(error: &reqwest::Error) -> &'static str {
    if error.is_timeout() {
        "timeout"
    } else if error.is_connect() {
        "connection failed"
    } else if error.is_decode() {
        "invalid response body"
    } else if error.is_request() {
        "request failed"
    } else {
        "unknown"
    }
}
