//! HTTP API server for integration with other systems.
//!
//! Exposes suggestions, genres and moods as JSON endpoints.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::{CinemoodError, Result};
use crate::suggest::{SuggestionService, MOODS};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

/// Shared application state.
struct AppState {
    service: SuggestionService,
}

/// Run the HTTP API server.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    settings: Settings,
) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Suggest, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let service = SuggestionService::from_settings(&settings)?;
    let app = router(service);

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Cinemood API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Genres", "GET  /genres");
    Output::kv("Moods", "GET  /moods");
    Output::kv("Suggestions", "POST /suggestions");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(service: SuggestionService) -> Router {
    let state = Arc::new(AppState { service });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/genres", get(genres))
        .route("/moods", get(moods))
        .route("/suggestions", post(suggestions))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuggestionRequest {
    moods: Vec<String>,
    genre_ids: Vec<u32>,
}

impl SuggestionRequest {
    fn validate(&self) -> Result<()> {
        if self.moods.iter().all(|m| m.trim().is_empty()) {
            return Err(CinemoodError::InvalidInput(
                "Select at least one mood.".to_string(),
            ));
        }
        if self.genre_ids.is_empty() {
            return Err(CinemoodError::InvalidInput(
                "Select at least one genre.".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn moods() -> impl IntoResponse {
    Json(serde_json::json!({ "moods": MOODS }))
}

async fn genres(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.service.movies().genres().await {
        Ok(genres) => Json(serde_json::json!({ "genres": genres })).into_response(),
        Err(e) => {
            error!("Genre lookup failed: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn suggestions(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SuggestionRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response();
    }

    let result = state
        .service
        .get_suggestions(&req.moods, &req.genre_ids)
        .await;
    Json(result).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{SuggestionResult, ToolRegistry};
    use crate::config::Prompts;
    use crate::llm::{GenerateRequest, GenerateResponse, LanguageModel, Part};
    use crate::movie_tools::tests_support::CountingDatabase;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct DirectAnswerModel;

    #[async_trait]
    impl LanguageModel for DirectAnswerModel {
        async fn generate(&self, _request: &GenerateRequest) -> Result<GenerateResponse> {
            Ok(GenerateResponse::from_parts(vec![Part::text(
                r#"{"suggestions":[{"id":9,"title":"Paddington 2","reason":"Pure warmth"}],"explanation":"Cozy."}"#,
            )]))
        }

        fn model_name(&self) -> &str {
            "direct"
        }
    }

    async fn spawn() -> String {
        let service = SuggestionService::new(
            Arc::new(DirectAnswerModel),
            Arc::new(CountingDatabase::new(false)),
            Arc::new(ToolRegistry::new()),
            Prompts::default(),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(service)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_suggestions_endpoint() {
        let base = spawn().await;

        let result: SuggestionResult = reqwest::Client::new()
            .post(format!("{}/suggestions", base))
            .json(&json!({"moods": ["Happy"], "genreIds": [10751]}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(result.suggestions.len(), 1);
        assert_eq!(result.suggestions[0].reason.as_deref(), Some("Pure warmth"));
        assert_eq!(result.explanation, "Cozy.");
    }

    #[tokio::test]
    async fn test_suggestions_requires_selection() {
        let base = spawn().await;

        let response = reqwest::Client::new()
            .post(format!("{}/suggestions", base))
            .json(&json!({"moods": [], "genreIds": [35]}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Invalid input: Select at least one mood.");
    }

    #[test]
    fn test_request_validation() {
        let request = |moods: Vec<&str>, genre_ids: Vec<u32>| SuggestionRequest {
            moods: moods.iter().map(|m| m.to_string()).collect(),
            genre_ids,
        };

        assert!(request(vec!["Calm"], vec![18]).validate().is_ok());
        assert!(matches!(
            request(vec!["  "], vec![18]).validate(),
            Err(CinemoodError::InvalidInput(_))
        ));
        assert!(matches!(
            request(vec!["Calm"], vec![]).validate(),
            Err(CinemoodError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_genres_and_moods_endpoints() {
        let base = spawn().await;
        let client = reqwest::Client::new();

        let genres: Value = client
            .get(format!("{}/genres", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(genres["genres"][0]["name"], "Comedy");

        let moods: Value = client
            .get(format!("{}/moods", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(moods["moods"].as_array().unwrap().len(), 6);
    }
}
