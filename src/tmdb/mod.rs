//! Movie database abstraction for Cinemood.
//!
//! Provides a trait-based interface so the movie tools can run against TMDB
//! or a test double.

mod client;

pub use client::TmdbClient;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Base URL for w500 poster images.
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// A movie record as exchanged with the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genre_ids: Option<Vec<u32>>,
    /// Why the model picked this movie.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Movie {
    /// Minimal record with only id and title set.
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            overview: None,
            poster_path: None,
            vote_average: None,
            genre_ids: None,
            reason: None,
        }
    }

    /// Full poster URL, if the movie has a poster.
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path
            .as_ref()
            .map(|p| format!("{}{}", POSTER_BASE_URL, p))
    }

    /// Vote average formatted for display.
    pub fn rating_label(&self) -> String {
        match self.vote_average {
            Some(v) if v > 0.0 => format!("{:.1}", v),
            _ => "N/A".to_string(),
        }
    }
}

/// An official TMDB movie genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// Read access to a movie catalogue.
#[async_trait]
pub trait MovieDatabase: Send + Sync {
    /// List the official movie genres.
    async fn genres(&self) -> Result<Vec<Genre>>;

    /// Discover well-rated movies matching all of the given genres.
    async fn discover_by_genre(&self, genre_ids: &[u32]) -> Result<Vec<Movie>>;

    /// Fetch one movie, or `None` if it does not exist.
    async fn movie_details(&self, movie_id: u64) -> Result<Option<Movie>>;
}
