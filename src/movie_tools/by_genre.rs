//! `get_movies_by_genre` tool.

use super::id_list;
use crate::agent::ToolHandler;
use crate::error::Result;
use crate::llm::{ParametersSchema, ToolDeclaration};
use crate::tmdb::MovieDatabase;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, warn};

pub const GET_MOVIES_BY_GENRE: &str = "get_movies_by_genre";

/// Discovers candidate movies for the selected genres.
pub struct GetMoviesByGenre {
    db: Arc<dyn MovieDatabase>,
}

impl GetMoviesByGenre {
    pub fn new(db: Arc<dyn MovieDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ToolHandler for GetMoviesByGenre {
    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration {
            name: GET_MOVIES_BY_GENRE.to_string(),
            description: "Retrieves a list of movies from TMDB matching the provided genre IDs. \
                Returns partial movie info including id, title, overview, poster_path, \
                vote_average, and genre_ids."
                .to_string(),
            parameters: ParametersSchema::number_array(
                "genreIds",
                "An array of TMDB genre IDs to filter by.",
            ),
        }
    }

    /// Invalid arguments and lookup failures both yield an empty list.
    async fn call(&self, args: Value) -> Result<Value> {
        let Some(genre_ids) = id_list::<u32>(&args, "genreIds") else {
            warn!("Invalid or missing genreIds in tool arguments: {}", args);
            return Ok(Value::Array(Vec::new()));
        };

        match self.db.discover_by_genre(&genre_ids).await {
            Ok(movies) => {
                debug!("Tool found {} movies for genres {:?}", movies.len(), genre_ids);
                Ok(serde_json::to_value(movies)?)
            }
            Err(e) => {
                error!("Movie discovery failed for genres {:?}: {}", genre_ids, e);
                Ok(Value::Array(Vec::new()))
            }
        }
    }
}
