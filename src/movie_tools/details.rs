//! `get_movie_details_by_ids` tool.

use super::id_list;
use crate::agent::ToolHandler;
use crate::error::Result;
use crate::llm::{ParametersSchema, ToolDeclaration};
use crate::tmdb::{Movie, MovieDatabase};
use async_trait::async_trait;
use futures::future::try_join_all;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, warn};

pub const GET_MOVIE_DETAILS_BY_IDS: &str = "get_movie_details_by_ids";

/// Fetches full records for movie ids, skipping ids TMDB does not know.
pub struct GetMovieDetailsByIds {
    db: Arc<dyn MovieDatabase>,
}

impl GetMovieDetailsByIds {
    pub fn new(db: Arc<dyn MovieDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ToolHandler for GetMovieDetailsByIds {
    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration {
            name: GET_MOVIE_DETAILS_BY_IDS.to_string(),
            description: "Fetches full details for a list of movie IDs from TMDB. \
                Filters out movies that are not found."
                .to_string(),
            parameters: ParametersSchema::number_array(
                "movieIds",
                "An array of TMDB movie IDs to fetch details for.",
            ),
        }
    }

    async fn call(&self, args: Value) -> Result<Value> {
        let Some(movie_ids) = id_list::<u64>(&args, "movieIds") else {
            warn!("Invalid or missing movieIds in tool arguments: {}", args);
            return Ok(Value::Array(Vec::new()));
        };

        let lookups = movie_ids.iter().map(|id| self.db.movie_details(*id));
        match try_join_all(lookups).await {
            Ok(found) => {
                let movies: Vec<Movie> = found.into_iter().flatten().collect();
                Ok(serde_json::to_value(movies)?)
            }
            Err(e) => {
                error!("Movie details lookup failed for {:?}: {}", movie_ids, e);
                Ok(Value::Array(Vec::new()))
            }
        }
    }
}
