//! Gemini `generateContent` client.

use super::{GenerateRequest, GenerateResponse, LanguageModel};
use crate::config::LlmSettings;
use crate::error::{CinemoodError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

/// Error envelope returned by the Gemini API on failure.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client for a Gemini model.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Create a client for the given endpoint with a per-request timeout.
    pub fn new(base_url: &str, model: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Create a client from settings, resolving the API key.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self> {
        let api_key = settings.resolve_api_key()?;
        Self::new(
            &settings.base_url,
            &settings.model,
            &api_key,
            Duration::from_secs(settings.timeout_secs),
        )
    }

    fn endpoint(&self) -> Result<Url> {
        let raw = format!("{}/{}:generateContent", self.base_url, self.model);
        let mut url = Url::parse(&raw)
            .map_err(|e| CinemoodError::Config(format!("Invalid LLM endpoint {}: {}", raw, e)))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    #[instrument(skip(self, request), fields(model = %self.model, turns = request.contents.len()))]
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        let response = self.http.post(self.endpoint()?).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!("Could not read Gemini error body: {}", e);
                    String::new()
                }
            };
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.message);
            warn!("Gemini request failed with status {}", status);
            return Err(CinemoodError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        debug!("Gemini returned {} candidate(s)", parsed.candidates.len());
        Ok(parsed)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
